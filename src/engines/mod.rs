//! Translation engines and the registry that selects between them.
//!
//! # Architecture
//!
//! - [`TranslationEngine`]: capability contract every backend implements
//! - [`EngineRegistry`]: ordered, non-empty set of enabled engines
//! - `google`: Google Translate web endpoint, built-in language directory
//! - `libre`: self-hostable LibreTranslate instance, directory fetched once
//!
//! Call sites only ever see `dyn TranslationEngine`, so adding a backend means
//! adding a module here and a branch in [`from_config`].

mod google;
mod libre;
mod registry;

pub use google::GoogleEngine;
pub use libre::LibreEngine;
pub use registry::EngineRegistry;

use crate::config::Config;
use crate::error::{BackendError, ConfigError};
use crate::language::LanguageDirectory;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// A translation backend.
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Stable lowercase identity used in paths and configuration (e.g. "google").
    fn name(&self) -> &str;

    /// Label shown in the engine switcher (e.g. "Google").
    fn display_name(&self) -> &str;

    /// Languages this engine accepts, fixed for the engine's lifetime.
    fn supported_languages(&self) -> &LanguageDirectory;

    /// Translate `text` from `from` (a code or `auto`) to `to`.
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, BackendError>;
}

/// Shared HTTP client for all engines.
pub fn http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.backend_timeout)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("Failed to build HTTP client")
}

/// Construct every engine enabled in `config`, Google first.
///
/// LibreTranslate fetches its language list here, so an unreachable instance
/// fails startup rather than the first request.
pub async fn from_config(
    config: &Config,
    client: reqwest::Client,
) -> Result<Vec<Arc<dyn TranslationEngine>>> {
    let mut engines: Vec<Arc<dyn TranslationEngine>> = Vec::new();

    if config.google_enabled {
        info!("Enabling Google engine ({})", config.google_translate_url);
        engines.push(Arc::new(GoogleEngine::new(
            client.clone(),
            &config.google_translate_url,
        )));
    }

    match (config.libretranslate_enabled, &config.libretranslate_instance) {
        (Some(true), Some(instance)) => {
            info!("Enabling LibreTranslate engine ({})", instance);
            let engine =
                LibreEngine::connect(client, instance, config.libretranslate_api_key.clone())
                    .await
                    .with_context(|| format!("Failed to initialise LibreTranslate at {}", instance))?;
            engines.push(Arc::new(engine));
        }
        (Some(true), None) => return Err(ConfigError::Missing("LIBRETRANSLATE_INSTANCE").into()),
        (Some(false), _) => {}
        (None, _) => warn!(
            "LibreTranslate is disabled by default; set LIBRETRANSLATE_ENABLED=true to enable it"
        ),
    }

    Ok(engines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> Config {
        Config {
            hostname: "localhost".to_string(),
            host: "127.0.0.1".to_string(),
            port: 1965,
            tls_cert_file: "cert.pem".into(),
            tls_key_file: "key.pem".into(),
            google_enabled: true,
            google_translate_url: "http://127.0.0.1:9".to_string(),
            libretranslate_enabled: None,
            libretranslate_instance: None,
            libretranslate_api_key: None,
            backend_timeout: Duration::from_secs(1),
        }
    }

    // ==================== from_config Tests ====================

    #[tokio::test]
    async fn test_google_only_by_default() {
        let config = config();
        let engines = from_config(&config, http_client(&config).unwrap()).await.unwrap();

        let names: Vec<&str> = engines.iter().map(|engine| engine.name()).collect();
        assert_eq!(names, vec!["google"]);
    }

    #[tokio::test]
    async fn test_libre_enabled_without_instance_fails() {
        let config = Config {
            libretranslate_enabled: Some(true),
            ..config()
        };

        let err = match from_config(&config, http_client(&config).unwrap()).await {
            Ok(_) => panic!("expected a configuration error"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("LIBRETRANSLATE_INSTANCE not set"));
    }

    #[tokio::test]
    async fn test_everything_disabled_yields_no_engines() {
        let config = Config {
            google_enabled: false,
            libretranslate_enabled: Some(false),
            ..config()
        };

        let engines = from_config(&config, http_client(&config).unwrap()).await.unwrap();
        assert!(engines.is_empty());
        assert!(EngineRegistry::new(engines).is_err());
    }
}
