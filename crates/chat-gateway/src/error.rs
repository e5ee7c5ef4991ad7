//! Gateway error types

use thiserror::Error;

/// Frame or event payload could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Text is not a well-formed frame
    #[error("Malformed frame: {0}")]
    Frame(#[source] serde_json::Error),

    /// Frame is well-formed but its payload does not match the expected shape
    #[error("Invalid {context} payload: {source}")]
    Payload {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be serialized
    #[error("Failed to encode frame: {0}")]
    Encode(#[source] serde_json::Error),
}

impl DecodeError {
    pub(crate) fn payload(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Payload {
            context: context.into(),
            source,
        }
    }
}

/// Socket-level failure
#[derive(Debug, Error)]
pub enum TransportError {
    /// No connection is open
    #[error("Transport is not connected")]
    NotConnected,

    /// Opening the connection failed
    #[error("Failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// Writing to the connection failed
    #[error("Failed to send frame: {0}")]
    Send(String),
}

/// Errors surfaced by the client handle
#[derive(Debug, Error)]
pub enum ClientError {
    /// The session task has ended (after `close`)
    #[error("Gateway session is closed")]
    Closed,

    /// Login was called with an empty token
    #[error("Token must not be empty")]
    EmptyToken,

    /// The REST client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] chat_http::HttpError),
}

/// Client result type
pub type ClientResult<T> = Result<T, ClientError>;
