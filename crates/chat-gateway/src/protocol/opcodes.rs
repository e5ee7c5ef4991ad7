//! Gateway operation codes
//!
//! Maps the wire integer to a named op code. The mapping is total: values the
//! client does not know become [`OpCode::Unknown`] instead of a decode failure.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Gateway operation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// Server dispatches an event to the client
    Dispatch,
    /// Heartbeat carrying the last sequence number (client/server)
    Heartbeat,
    /// Identify - authenticate a new session (client only)
    Identify,
    /// Presence Update (client only, not sent by this client)
    PresenceUpdate,
    /// Voice State Update (client only, not sent by this client)
    VoiceStateUpdate,
    /// Resume a dropped session (client only, not sent by this client)
    Resume,
    /// Server asks the client to reconnect
    Reconnect,
    /// Request Guild Members (client only, not sent by this client)
    RequestGuildMembers,
    /// Session is invalid
    InvalidSession,
    /// Hello - first frame after connect, carries the heartbeat interval
    Hello,
    /// Heartbeat acknowledged
    HeartbeatAck,
    /// Any value outside the known set
    Unknown(u8),
}

impl OpCode {
    /// Create an `OpCode` from a raw integer value
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            3 => Self::PresenceUpdate,
            4 => Self::VoiceStateUpdate,
            6 => Self::Resume,
            7 => Self::Reconnect,
            8 => Self::RequestGuildMembers,
            9 => Self::InvalidSession,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            other => Self::Unknown(other),
        }
    }

    /// Get the raw integer value
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Dispatch => 0,
            Self::Heartbeat => 1,
            Self::Identify => 2,
            Self::PresenceUpdate => 3,
            Self::VoiceStateUpdate => 4,
            Self::Resume => 6,
            Self::Reconnect => 7,
            Self::RequestGuildMembers => 8,
            Self::InvalidSession => 9,
            Self::Hello => 10,
            Self::HeartbeatAck => 11,
            Self::Unknown(value) => value,
        }
    }

    /// Check if this op code belongs to the set the client sends or reacts to
    ///
    /// Inbound frames outside the set are logged and ignored.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(
            self,
            Self::Dispatch | Self::Heartbeat | Self::Identify | Self::Hello | Self::HeartbeatAck
        )
    }

    /// Get the name of this op code
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dispatch => "Dispatch",
            Self::Heartbeat => "Heartbeat",
            Self::Identify => "Identify",
            Self::PresenceUpdate => "PresenceUpdate",
            Self::VoiceStateUpdate => "VoiceStateUpdate",
            Self::Resume => "Resume",
            Self::Reconnect => "Reconnect",
            Self::RequestGuildMembers => "RequestGuildMembers",
            Self::InvalidSession => "InvalidSession",
            Self::Hello => "Hello",
            Self::HeartbeatAck => "HeartbeatAck",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl From<u8> for OpCode {
    fn from(value: u8) -> Self {
        Self::from_u8(value)
    }
}

impl Serialize for OpCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for OpCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u8::deserialize(deserializer).map(Self::from_u8)
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u8())
    }
}
