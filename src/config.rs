use crate::error::ConfigError;
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Gemini server
    pub hostname: String,
    pub host: String,
    pub port: u16,
    pub tls_cert_file: PathBuf,
    pub tls_key_file: PathBuf,

    // Google
    pub google_enabled: bool,
    pub google_translate_url: String,

    // LibreTranslate (None = not configured, which means disabled)
    pub libretranslate_enabled: Option<bool>,
    pub libretranslate_instance: Option<String>,
    pub libretranslate_api_key: Option<String>,

    // Upper bound for each outbound translation call
    pub backend_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Gemini server
            hostname: optional("GEMINI_HOSTNAME").unwrap_or_else(|| "localhost".to_string()),
            host: optional("GEMINI_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed("GEMINI_PORT")?.unwrap_or(1965),
            tls_cert_file: optional("TLS_CERT_FILE")
                .unwrap_or_else(|| "cert.pem".to_string())
                .into(),
            tls_key_file: optional("TLS_KEY_FILE")
                .unwrap_or_else(|| "key.pem".to_string())
                .into(),

            // Google
            google_enabled: optional_bool("GOOGLE_ENABLED")?.unwrap_or(true),
            google_translate_url: optional("GOOGLE_TRANSLATE_URL")
                .unwrap_or_else(|| "https://translate.googleapis.com".to_string()),

            // LibreTranslate
            libretranslate_enabled: optional_bool("LIBRETRANSLATE_ENABLED")?,
            libretranslate_instance: optional("LIBRETRANSLATE_INSTANCE"),
            libretranslate_api_key: optional("LIBRETRANSLATE_API_KEY"),

            backend_timeout: Duration::from_secs(parsed("BACKEND_TIMEOUT_SECS")?.unwrap_or(10)),
        })
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Non-empty value of an environment variable.
fn optional(key: &'static str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value })
        })
        .transpose()
}

fn optional_bool(key: &'static str) -> Result<Option<bool>, ConfigError> {
    optional(key)
        .map(|value| parse_bool(&value).ok_or(ConfigError::Invalid { key, value }))
        .transpose()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "GEMINI_HOSTNAME",
        "GEMINI_HOST",
        "GEMINI_PORT",
        "TLS_CERT_FILE",
        "TLS_KEY_FILE",
        "GOOGLE_ENABLED",
        "GOOGLE_TRANSLATE_URL",
        "LIBRETRANSLATE_ENABLED",
        "LIBRETRANSLATE_INSTANCE",
        "LIBRETRANSLATE_API_KEY",
        "BACKEND_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    // ==================== parse_bool Tests ====================

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        for value in ["true", "TRUE", "1", "yes", "On"] {
            assert_eq!(parse_bool(value), Some(true), "{}", value);
        }
        for value in ["false", "False", "0", "no", "OFF"] {
            assert_eq!(parse_bool(value), Some(false), "{}", value);
        }
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    // ==================== from_env Tests ====================

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().expect("defaults should load");

        assert_eq!(config.hostname, "localhost");
        assert_eq!(config.bind_address(), "127.0.0.1:1965");
        assert_eq!(config.tls_cert_file, PathBuf::from("cert.pem"));
        assert_eq!(config.tls_key_file, PathBuf::from("key.pem"));
        assert!(config.google_enabled);
        assert_eq!(config.google_translate_url, "https://translate.googleapis.com");
        assert_eq!(config.libretranslate_enabled, None);
        assert_eq!(config.libretranslate_api_key, None);
        assert_eq!(config.backend_timeout, Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn test_libretranslate_settings() {
        clear_env();
        std::env::set_var("LIBRETRANSLATE_ENABLED", "yes");
        std::env::set_var("LIBRETRANSLATE_INSTANCE", "https://libre.example.com");
        std::env::set_var("LIBRETRANSLATE_API_KEY", "secret");
        std::env::set_var("GOOGLE_ENABLED", "false");

        let config = Config::from_env().expect("should load");
        clear_env();

        assert!(!config.google_enabled);
        assert_eq!(config.libretranslate_enabled, Some(true));
        assert_eq!(
            config.libretranslate_instance.as_deref(),
            Some("https://libre.example.com")
        );
        assert_eq!(config.libretranslate_api_key.as_deref(), Some("secret"));
    }

    #[test]
    #[serial]
    fn test_libretranslate_enabled_without_instance_loads() {
        clear_env();
        std::env::set_var("LIBRETRANSLATE_ENABLED", "true");

        // rejected later, when engines are built
        let config = Config::from_env().expect("should load");
        clear_env();

        assert_eq!(config.libretranslate_enabled, Some(true));
        assert_eq!(config.libretranslate_instance, None);
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_reported() {
        clear_env();
        std::env::set_var("GEMINI_PORT", "not-a-port");

        let err = Config::from_env().unwrap_err();
        clear_env();

        assert!(err.to_string().contains("GEMINI_PORT"));
    }

    #[test]
    #[serial]
    fn test_invalid_bool_is_reported() {
        clear_env();
        std::env::set_var("GOOGLE_ENABLED", "sometimes");

        let err = Config::from_env().unwrap_err();
        clear_env();

        assert!(err.to_string().contains("GOOGLE_ENABLED"));
    }

    #[test]
    #[serial]
    fn test_blank_values_use_defaults() {
        clear_env();
        std::env::set_var("GEMINI_HOSTNAME", "   ");
        std::env::set_var("BACKEND_TIMEOUT_SECS", "3");

        let config = Config::from_env().expect("should load");
        clear_env();

        assert_eq!(config.hostname, "localhost");
        assert_eq!(config.backend_timeout, Duration::from_secs(3));
    }
}
