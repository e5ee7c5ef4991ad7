//! Gateway frame format
//!
//! Every message on the socket is one JSON frame `{op, d, s, t}`.

use super::{HelloPayload, IdentifyPayload, OpCode};
use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayFrame {
    /// Operation code
    pub op: OpCode,

    /// Payload, `null` when the op carries none
    #[serde(default)]
    pub d: Value,

    /// Sequence number (dispatch frames only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event name (dispatch frames only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewayFrame {
    /// Create a frame with a payload and no sequence or event name
    #[must_use]
    pub fn new(op: OpCode, d: Value) -> Self {
        Self { op, d, s: None, t: None }
    }

    /// Decode a frame from socket text
    ///
    /// Unknown op codes and event names decode successfully.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(text).map_err(DecodeError::Frame)
    }

    /// Encode to socket text
    pub fn encode(&self) -> Result<String, DecodeError> {
        serde_json::to_string(self).map_err(DecodeError::Encode)
    }

    // === Client Frames ===

    /// Heartbeat (op 1) carrying the last seen sequence, or `null`
    #[must_use]
    pub fn heartbeat(last_sequence: Option<u64>) -> Self {
        Self::new(OpCode::Heartbeat, last_sequence.map_or(Value::Null, Value::from))
    }

    /// Identify (op 2)
    pub fn identify(payload: &IdentifyPayload) -> Result<Self, DecodeError> {
        let d = serde_json::to_value(payload).map_err(DecodeError::Encode)?;
        Ok(Self::new(OpCode::Identify, d))
    }

    // === Server Frames ===

    /// Hello (op 10) with the given heartbeat interval
    #[must_use]
    pub fn hello(heartbeat_interval: u64) -> Self {
        Self::new(
            OpCode::Hello,
            serde_json::json!({ "heartbeat_interval": heartbeat_interval }),
        )
    }

    /// Heartbeat ACK (op 11)
    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self::new(OpCode::HeartbeatAck, Value::Null)
    }

    /// Dispatch (op 0)
    #[must_use]
    pub fn dispatch(event_name: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            d: data,
            s: Some(sequence),
            t: Some(event_name.into()),
        }
    }

    // === Payload Access ===

    /// Parse the Hello payload
    pub fn hello_payload(&self) -> Result<HelloPayload, DecodeError> {
        HelloPayload::deserialize(&self.d).map_err(|e| DecodeError::payload("Hello", e))
    }

    /// Sequence number, only honored on dispatch frames
    #[must_use]
    pub fn dispatch_sequence(&self) -> Option<u64> {
        match self.op {
            OpCode::Dispatch => self.s,
            _ => None,
        }
    }
}

impl std::fmt::Display for GatewayFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayFrame(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayFrame(op={})", self.op)
        }
    }
}
