//! REST error types

use chat_core::DomainError;
use thiserror::Error;

/// REST call error type
#[derive(Debug, Error)]
pub enum HttpError {
    /// No token has been stored yet; no request was made
    #[error("The client is not logged in")]
    Unauthenticated,

    /// Request rejected before sending
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl HttpError {
    /// Status code of the failed response, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the failure was the missing-token guard
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }
}

/// REST result type
pub type HttpResult<T> = Result<T, HttpError>;
