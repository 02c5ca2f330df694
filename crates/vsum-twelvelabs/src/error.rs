//! Indexing client error types.

use serde::Deserialize;
use thiserror::Error;

/// Result type for indexing client operations.
pub type IndexerResult<T> = Result<T, IndexerError>;

/// Errors that can occur while talking to the indexing vendor.
#[derive(Debug, Error)]
pub enum IndexerError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, reset).
    #[error("Connection error: {0}")]
    Connection(String),

    /// The vendor answered with an error status.
    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// The vendor answered 2xx but the body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error body returned by the vendor.
#[derive(Debug, Deserialize)]
struct VendorErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl IndexerError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a service error from a non-success HTTP status and its body.
    ///
    /// The vendor's `{code, message}` body is used when present, otherwise the
    /// raw body text.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<VendorErrorBody>(body) {
            Ok(VendorErrorBody {
                code: Some(code),
                message: Some(message),
            }) => format!("{}: {}", code, message),
            Ok(VendorErrorBody {
                message: Some(message),
                ..
            }) => message,
            _ if body.trim().is_empty() => "empty response body".to_string(),
            _ => body.trim().to_string(),
        };
        Self::Service { status, message }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            IndexerError::Connection(_) => "connection",
            IndexerError::Service { .. } => "service",
            IndexerError::InvalidResponse(_) => "invalid_response",
            IndexerError::Config(_) => "config",
            IndexerError::Io(_) => "io",
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, IndexerError::Connection(_))
    }

    /// HTTP status returned by the vendor, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            IndexerError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for IndexerError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            IndexerError::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            IndexerError::Service {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            IndexerError::Connection(e.to_string())
        }
    }
}
