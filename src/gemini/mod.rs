//! Gemini protocol plumbing: requests, responses and the TLS server.
//!
//! A request is a single absolute URL followed by CRLF. A response is a
//! `<status> <meta>\r\n` header, followed by a body for successful responses
//! only.

mod server;

pub use server::{handle_connection, load_tls_config, serve};

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use url::Url;

/// Media type of every document this capsule serves.
pub const GEMTEXT: &str = "text/gemini; charset=utf-8";

/// Longest URL a client may send, excluding the CRLF.
pub const MAX_REQUEST_LENGTH: usize = 1024;

/// Status codes used by this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Input,
    Success,
    RedirectTemporary,
    NotFound,
    ProxyRequestRefused,
    BadRequest,
}

impl Status {
    pub fn code(self) -> u8 {
        match self {
            Status::Input => 10,
            Status::Success => 20,
            Status::RedirectTemporary => 30,
            Status::NotFound => 51,
            Status::ProxyRequestRefused => 53,
            Status::BadRequest => 59,
        }
    }
}

/// A complete response: header plus optional body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub meta: String,
    pub body: Option<String>,
}

impl Response {
    /// `20` with a gemtext document.
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            meta: GEMTEXT.to_string(),
            body: Some(body.into()),
        }
    }

    /// `10`: ask the client for a line of input, then re-request with it as the query.
    pub fn input(prompt: impl Into<String>) -> Self {
        Self::header_only(Status::Input, prompt)
    }

    /// `30` to another path on this capsule.
    pub fn redirect(target: impl Into<String>) -> Self {
        Self::header_only(Status::RedirectTemporary, target)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::header_only(Status::NotFound, message)
    }

    pub fn proxy_refused() -> Self {
        Self::header_only(Status::ProxyRequestRefused, "Proxy request refused")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::header_only(Status::BadRequest, message)
    }

    fn header_only(status: Status, meta: impl Into<String>) -> Self {
        Self {
            status,
            meta: meta.into(),
            body: None,
        }
    }

    /// Wire form of the response header (with CRLF). Line breaks in `meta`
    /// are flattened so they cannot end the header early.
    pub fn header(&self) -> String {
        let meta: String = self
            .meta
            .chars()
            .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
            .collect();
        format!("{:02} {}\r\n", self.status.code(), meta)
    }
}

/// Why a request line was rejected.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Request exceeds 1024 bytes")]
    TooLong,

    #[error("Request is not terminated by CRLF")]
    MissingTerminator,

    #[error("Request is not valid UTF-8")]
    NotUtf8,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// A parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    url: Url,
}

impl Request {
    /// Parse a raw request line, CRLF included.
    pub fn parse(line: &[u8]) -> Result<Self, RequestError> {
        let line = line
            .strip_suffix(b"\r\n")
            .ok_or(RequestError::MissingTerminator)?;
        if line.len() > MAX_REQUEST_LENGTH {
            return Err(RequestError::TooLong);
        }
        let line = std::str::from_utf8(line).map_err(|_| RequestError::NotUtf8)?;
        Ok(Self {
            url: Url::parse(line)?,
        })
    }

    /// Build a request for `path` (which may include `?query`) on `host`.
    pub fn for_path(host: &str, path: &str) -> Result<Self, RequestError> {
        Ok(Self {
            url: Url::parse(&format!("gemini://{}{}", host, path))?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Path as sent, still percent-encoded.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Decoded query string, or `None` when absent or empty.
    pub fn query(&self) -> Option<String> {
        self.url
            .query()
            .filter(|query| !query.is_empty())
            .map(|query| percent_decode_str(query).decode_utf8_lossy().into_owned())
    }

    /// Whether this request is addressed to us rather than asking us to proxy.
    pub fn is_for(&self, hostname: &str) -> bool {
        self.url.scheme() == "gemini"
            && self
                .url
                .host_str()
                .is_some_and(|host| host.eq_ignore_ascii_case(hostname))
    }
}

/// Anything that can answer Gemini requests.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, request: &Request) -> Response;
}
