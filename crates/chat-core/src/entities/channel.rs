//! Channel entity - represents a guild channel, DM, or category

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Channel type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "u8", into = "u8")]
pub enum ChannelType {
    /// Guild text channel
    #[default]
    GuildText,
    /// Direct message between users
    Dm,
    /// Guild voice channel
    GuildVoice,
    /// Direct message between multiple users
    GroupDm,
    /// Guild category for organizing channels
    GuildCategory,
    /// Announcement channel
    GuildNews,
    /// Store channel
    GuildStore,
    /// A type this client does not know about
    Unknown(u8),
}

impl ChannelType {
    /// Get the numeric value
    #[inline]
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::GuildText => 0,
            Self::Dm => 1,
            Self::GuildVoice => 2,
            Self::GroupDm => 3,
            Self::GuildCategory => 4,
            Self::GuildNews => 5,
            Self::GuildStore => 6,
            Self::Unknown(value) => value,
        }
    }

    /// Check if this is a private (non-guild) channel type
    #[inline]
    pub fn is_private(self) -> bool {
        matches!(self, Self::Dm | Self::GroupDm)
    }
}

impl From<u8> for ChannelType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::GuildText,
            1 => Self::Dm,
            2 => Self::GuildVoice,
            3 => Self::GroupDm,
            4 => Self::GuildCategory,
            5 => Self::GuildNews,
            6 => Self::GuildStore,
            other => Self::Unknown(other),
        }
    }
}

impl From<ChannelType> for u8 {
    fn from(ct: ChannelType) -> Self {
        ct.as_u8()
    }
}

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub channel_type: ChannelType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Snowflake>,
}

impl Channel {
    /// Create a channel known only by id
    #[must_use]
    pub fn new(id: Snowflake) -> Self {
        Self {
            id,
            guild_id: None,
            name: None,
            channel_type: ChannelType::GuildText,
            topic: None,
            position: 0,
            parent_id: None,
        }
    }

    /// Create a new guild text channel
    #[must_use]
    pub fn new_text(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            guild_id: Some(guild_id),
            name: Some(name.into()),
            ..Self::new(id)
        }
    }

    /// Create a new DM channel
    #[must_use]
    pub fn new_dm(id: Snowflake) -> Self {
        Self {
            channel_type: ChannelType::Dm,
            ..Self::new(id)
        }
    }

    /// Check if this channel belongs to a guild
    #[inline]
    pub fn is_guild_channel(&self) -> bool {
        self.guild_id.is_some()
    }

    /// Get the mention markup for message content
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}
