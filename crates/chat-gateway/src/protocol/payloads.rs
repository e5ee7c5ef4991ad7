//! Handshake payload definitions
//!
//! Payloads the client reads from Hello and writes in Identify.

use chat_common::ClientProperties;
use chat_core::Intents;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds, never zero
    #[serde(alias = "heartbeat_interval_ms", deserialize_with = "non_zero_interval")]
    pub heartbeat_interval: u64,
}

fn non_zero_interval<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match u64::deserialize(deserializer)? {
        0 => Err(D::Error::custom("heartbeat_interval must be non-zero")),
        interval => Ok(interval),
    }
}

impl HelloPayload {
    /// Create a Hello payload with the given interval
    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }

    /// Heartbeat interval as a duration
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval)
    }
}

/// Payload for op 2 (Identify)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Bot token
    pub token: String,

    /// Client metadata
    pub properties: IdentifyProperties,

    /// Event categories the client wants to receive
    pub intents: Intents,
}

impl IdentifyPayload {
    /// Create an Identify payload
    pub fn new(token: impl Into<String>, intents: Intents, properties: IdentifyProperties) -> Self {
        Self {
            token: token.into(),
            properties,
            intents,
        }
    }
}

/// Client connection properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyProperties {
    /// Operating system
    #[serde(rename = "$os")]
    pub os: String,

    /// Library name
    #[serde(rename = "$browser")]
    pub browser: String,

    /// Library name
    #[serde(rename = "$device")]
    pub device: String,
}

impl From<&ClientProperties> for IdentifyProperties {
    fn from(props: &ClientProperties) -> Self {
        Self {
            os: props.os.clone(),
            browser: props.browser.clone(),
            device: props.device.clone(),
        }
    }
}
