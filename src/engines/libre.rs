//! LibreTranslate, self-hosted or a public instance.

use crate::engines::TranslationEngine;
use crate::error::BackendError;
use crate::language::LanguageDirectory;
use crate::retry::{with_retry_if, RetryConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    code: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

/// Both success and failure bodies share this shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: Option<String>,
    error: Option<String>,
}

pub struct LibreEngine {
    client: reqwest::Client,
    instance: String,
    api_key: Option<String>,
    languages: LanguageDirectory,
}

impl LibreEngine {
    /// Connect to an instance and cache its language list.
    pub async fn connect(
        client: reqwest::Client,
        instance: &str,
        api_key: Option<String>,
    ) -> Result<Self, BackendError> {
        let instance = instance.trim_end_matches('/').to_string();

        let languages = with_retry_if(
            &RetryConfig::language_fetch(),
            "LibreTranslate language list",
            || fetch_languages(&client, &instance),
            BackendError::is_transient,
        )
        .await?;

        info!(
            "LibreTranslate at {} supports {} languages",
            instance,
            languages.len()
        );

        Ok(Self {
            client,
            instance,
            api_key,
            languages,
        })
    }
}

async fn fetch_languages(
    client: &reqwest::Client,
    instance: &str,
) -> Result<LanguageDirectory, BackendError> {
    let response = client.get(format!("{}/languages", instance)).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::Status { status, body });
    }

    let entries: Vec<LanguageEntry> = response
        .json()
        .await
        .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

    Ok(LanguageDirectory::from_pairs(
        entries.into_iter().map(|entry| (entry.name, entry.code)),
    ))
}

#[async_trait]
impl TranslationEngine for LibreEngine {
    fn name(&self) -> &str {
        "libre"
    }

    fn display_name(&self) -> &str {
        "Libre"
    }

    fn supported_languages(&self) -> &LanguageDirectory {
        &self.languages
    }

    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, BackendError> {
        debug!("LibreTranslate {} -> {} ({} chars)", from, to, text.len());

        let request = TranslateRequest {
            q: text,
            source: from,
            target: to,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/translate", self.instance))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // LibreTranslate explains most failures in a JSON `error` field
        let parsed: Option<TranslateResponse> = serde_json::from_str(&body).ok();

        if let Some(message) = parsed.as_ref().and_then(|r| r.error.clone()) {
            return Err(BackendError::Upstream(message));
        }
        if !status.is_success() {
            return Err(BackendError::Status { status, body });
        }

        parsed
            .and_then(|r| r.translated_text)
            .ok_or_else(|| BackendError::MalformedResponse("missing translatedText".to_string()))
    }
}
