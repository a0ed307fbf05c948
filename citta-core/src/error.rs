//! Error types for Citta

use thiserror::Error;

use crate::config::UpstreamErrorPolicy;

/// Result type alias using Citta's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors while proxying a reformatting request
#[derive(Error, Debug)]
pub enum Error {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("originalText is required.")]
    MissingOriginalText,

    #[error("{0}")]
    ProviderNotConfigured(String),

    #[error("{0}")]
    Serialization(#[from] serde_json::Error),

    #[error("API Error: {reason}")]
    Upstream { status: u16, reason: String },

    #[error("Malformed response from model: {0}")]
    MalformedResponse(String),

    #[cfg(feature = "http-client")]
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Transport failure from a host runtime's own fetch
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Drops the request URL, which carries the API key
#[cfg(feature = "http-client")]
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network(e.without_url())
    }
}

impl Error {
    /// Build an upstream failure from a non-2xx status code.
    ///
    /// The body is logged and dropped; it never reaches the caller.
    pub fn upstream(status: u16, body: &str) -> Self {
        tracing::error!(status, body, "upstream_api_error");

        let reason = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();

        Error::Upstream { status, reason }
    }

    /// HTTP status returned to the caller for this error
    pub fn status_code(&self, policy: UpstreamErrorPolicy) -> u16 {
        match self {
            Error::MethodNotAllowed => 405,
            Error::MissingOriginalText => 400,
            Error::Upstream { status, .. } => match policy {
                UpstreamErrorPolicy::Propagate => *status,
                UpstreamErrorPolicy::Collapse => 500,
            },
            _ => 500,
        }
    }

    /// Whether the caller can fix this by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::MethodNotAllowed | Error::MissingOriginalText)
    }
}
