//! Message entity - represents a chat message and outbound message requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Maximum message content length accepted by the REST API
pub const MAX_CONTENT_LENGTH: usize = 2000;

/// Message type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "u8", into = "u8")]
pub enum MessageType {
    #[default]
    Default,
    RecipientAdd,
    RecipientRemove,
    Call,
    ChannelNameChange,
    ChannelIconChange,
    ChannelPinnedMessage,
    GuildMemberJoin,
    UserPremiumGuildSubscription,
    UserPremiumGuildSubscriptionTier1,
    UserPremiumGuildSubscriptionTier2,
    UserPremiumGuildSubscriptionTier3,
    ChannelFollowAdd,
    GuildDiscoveryDisqualified,
    GuildDiscoveryRequalified,
    Reply,
    ApplicationCommand,
    /// A type this client does not know about
    Unknown(u8),
}

impl From<u8> for MessageType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Default,
            1 => Self::RecipientAdd,
            2 => Self::RecipientRemove,
            3 => Self::Call,
            4 => Self::ChannelNameChange,
            5 => Self::ChannelIconChange,
            6 => Self::ChannelPinnedMessage,
            7 => Self::GuildMemberJoin,
            8 => Self::UserPremiumGuildSubscription,
            9 => Self::UserPremiumGuildSubscriptionTier1,
            10 => Self::UserPremiumGuildSubscriptionTier2,
            11 => Self::UserPremiumGuildSubscriptionTier3,
            12 => Self::ChannelFollowAdd,
            14 => Self::GuildDiscoveryDisqualified,
            15 => Self::GuildDiscoveryRequalified,
            19 => Self::Reply,
            20 => Self::ApplicationCommand,
            other => Self::Unknown(other),
        }
    }
}

impl From<MessageType> for u8 {
    fn from(kind: MessageType) -> Self {
        match kind {
            MessageType::Default => 0,
            MessageType::RecipientAdd => 1,
            MessageType::RecipientRemove => 2,
            MessageType::Call => 3,
            MessageType::ChannelNameChange => 4,
            MessageType::ChannelIconChange => 5,
            MessageType::ChannelPinnedMessage => 6,
            MessageType::GuildMemberJoin => 7,
            MessageType::UserPremiumGuildSubscription => 8,
            MessageType::UserPremiumGuildSubscriptionTier1 => 9,
            MessageType::UserPremiumGuildSubscriptionTier2 => 10,
            MessageType::UserPremiumGuildSubscriptionTier3 => 11,
            MessageType::ChannelFollowAdd => 12,
            MessageType::GuildDiscoveryDisqualified => 14,
            MessageType::GuildDiscoveryRequalified => 15,
            MessageType::Reply => 19,
            MessageType::ApplicationCommand => 20,
            MessageType::Unknown(value) => value,
        }
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    pub author: User,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tts: bool,
    #[serde(rename = "type", default)]
    pub kind: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReference>,
}

impl Message {
    /// Check if message has been edited
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited_timestamp.is_some()
    }

    /// Check if the message was sent by a bot account
    #[inline]
    pub fn is_from_bot(&self) -> bool {
        self.author.bot
    }

    /// Reference pointing at this message, used when replying
    pub fn reference(&self) -> MessageReference {
        MessageReference {
            message_id: Some(self.id),
            channel_id: Some(self.channel_id),
            guild_id: self.guild_id,
        }
    }

    /// Build a reply request; multiple lines are joined with newlines
    pub fn reply_request<I, S>(&self, lines: I) -> MessageRequest
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let content = lines
            .into_iter()
            .map(|line| line.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("\n");

        MessageRequest {
            message_reference: Some(self.reference()),
            ..MessageRequest::new(content)
        }
    }
}

/// Message reference for replies
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
}

/// Controls which mentions in the content actually notify
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllowedMentions {
    /// Mention types to parse: "roles", "users", "everyone"
    #[serde(default)]
    pub parse: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Snowflake>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replied_user: Option<bool>,
}

impl AllowedMentions {
    /// Suppress every mention
    pub fn none() -> Self {
        Self::default()
    }
}

/// Outbound message body for `POST /channels/{id}/messages`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessageRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReference>,
}

impl MessageRequest {
    /// Create a plain text request
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Set text-to-speech
    #[must_use]
    pub fn with_tts(mut self, tts: bool) -> Self {
        self.tts = Some(tts);
        self
    }

    /// Set the embed object
    #[must_use]
    pub fn with_embed(mut self, embed: serde_json::Value) -> Self {
        self.embed = Some(embed);
        self
    }

    /// Set allowed mentions
    #[must_use]
    pub fn with_allowed_mentions(mut self, allowed_mentions: AllowedMentions) -> Self {
        self.allowed_mentions = Some(allowed_mentions);
        self
    }

    /// Validate the request before it is sent
    ///
    /// Content may be empty only when an embed carries the message.
    pub fn validate(&self) -> Result<(), DomainError> {
        let length = self.content.chars().count();
        if length > MAX_CONTENT_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: MAX_CONTENT_LENGTH,
            });
        }
        if length == 0 && self.embed.is_none() {
            return Err(DomainError::EmptyMessage);
        }
        Ok(())
    }
}

impl From<&str> for MessageRequest {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for MessageRequest {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

/// Fragments are concatenated without a separator
impl From<Vec<String>> for MessageRequest {
    fn from(parts: Vec<String>) -> Self {
        Self::new(parts.concat())
    }
}
