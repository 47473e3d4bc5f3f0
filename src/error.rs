//! Error taxonomy shared by the engines, the gateway and startup code.
//!
//! Per-request errors (`UnresolvedLanguage`, `BackendError`) are always turned
//! into a Gemini response by the gateway. `ConfigError` is only produced at
//! startup and stops the process before it serves anything.

/// Startup configuration failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("All translation engines are disabled")]
    NoEnginesEnabled,

    #[error("{0} not set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// User input that matches nothing in the selected engine's directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Language '{0}' not found")]
pub struct UnresolvedLanguage(pub String);

/// Failure of an upstream translation call.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request to translation engine failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("translation engine timed out")]
    Timeout,

    #[error("translation engine returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed response from translation engine: {0}")]
    MalformedResponse(String),

    #[error("translation engine reported an error: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Request(error)
        }
    }
}

impl BackendError {
    /// Whether repeating the same call could plausibly succeed.
    ///
    /// Network errors, timeouts, 429 and 5xx are transient. Other 4xx statuses,
    /// upstream error messages and malformed bodies are not.
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Request(_) | BackendError::Timeout => true,
            BackendError::Status { status, .. } => {
                *status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            BackendError::MalformedResponse(_) | BackendError::Upstream(_) => false,
        }
    }
}
