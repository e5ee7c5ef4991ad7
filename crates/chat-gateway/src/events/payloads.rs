//! Event payload definitions
//!
//! Shapes of dispatch payloads that have no direct domain entity. Missing
//! required fields fail deserialization instead of producing empty values.

use chat_core::{Channel, Guild, Role, Snowflake, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// === Connection Events ===

/// READY event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ready {
    /// Gateway protocol version
    #[serde(default)]
    pub v: u8,

    /// The user the token belongs to
    pub user: User,

    /// Guilds the user is in; they arrive later through GUILD_CREATE
    #[serde(default)]
    pub guilds: Vec<UnavailableGuild>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// VOICE_SERVER_UPDATE event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceServerUpdate {
    pub token: String,
    pub guild_id: Snowflake,
    /// `None` while the voice server is being reallocated
    #[serde(default)]
    pub endpoint: Option<String>,
}

// === Guild Events ===

/// Guild reference carried by READY and GUILD_DELETE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableGuild {
    pub id: Snowflake,
    /// `true` for an outage; absent when the user left or was removed
    #[serde(default)]
    pub unavailable: bool,
}

/// GUILD_CREATE event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildCreate {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub owner_id: Snowflake,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub unavailable: bool,
}

impl From<GuildCreate> for Guild {
    fn from(payload: GuildCreate) -> Self {
        let mut guild = Guild::new(payload.id, payload.name, payload.owner_id);
        guild.icon = payload.icon;
        guild.description = payload.description;
        guild.roles = payload.roles;
        guild.unavailable = payload.unavailable;
        for channel in payload.channels {
            guild.insert_channel(channel);
        }
        guild
    }
}

/// GUILD_ROLE_CREATE / GUILD_ROLE_UPDATE event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRole {
    pub guild_id: Snowflake,
    pub role: Role,
}

/// GUILD_ROLE_DELETE event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRoleDelete {
    pub guild_id: Snowflake,
    pub role_id: Snowflake,
}

// === Channel Events ===

/// CHANNEL_PINS_UPDATE event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPinsUpdate {
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub last_pin_timestamp: Option<DateTime<Utc>>,
}

// === Message Events ===

/// MESSAGE_UPDATE event payload
///
/// Updates are partial: only `id` and `channel_id` are guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUpdate {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub edited_timestamp: Option<DateTime<Utc>>,
}

/// MESSAGE_DELETE event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDelete {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
}

/// MESSAGE_DELETE_BULK event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDeleteBulk {
    pub ids: Vec<Snowflake>,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
}

/// Emoji used in a reaction; custom emoji carry an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEmoji {
    #[serde(default)]
    pub id: Option<Snowflake>,
    #[serde(default)]
    pub name: Option<String>,
}

/// MESSAGE_REACTION_ADD / MESSAGE_REACTION_REMOVE event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub emoji: ReactionEmoji,
}

// === Typing Events ===

/// TYPING_START event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingStart {
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub user_id: Snowflake,
    /// Unix time in seconds
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_guild_create_into_guild() {
        let payload: GuildCreate = serde_json::from_value(json!({
            "id": "10",
            "name": "Rustaceans",
            "owner_id": "1",
            "channels": [
                { "id": "100", "type": 0, "name": "general" },
                { "id": "101", "type": 2, "name": "voice" }
            ],
            "roles": [{ "id": "10", "name": "@everyone", "permissions": "0" }]
        }))
        .unwrap();

        let guild = Guild::from(payload);
        assert_eq!(guild.name, "Rustaceans");
        assert!(guild.is_owner(Snowflake::new(1)));
        assert_eq!(guild.channels.len(), 2);
        assert_eq!(
            guild.channel(Snowflake::new(101)).unwrap().guild_id,
            Some(Snowflake::new(10))
        );
        assert_eq!(guild.roles.len(), 1);
    }

    #[test]
    fn test_guild_create_requires_owner() {
        let result = serde_json::from_value::<GuildCreate>(json!({ "id": "10", "name": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_reaction_payload() {
        let reaction: Reaction = serde_json::from_value(json!({
            "user_id": "1",
            "channel_id": "2",
            "message_id": "3",
            "emoji": { "id": null, "name": "🔥" }
        }))
        .unwrap();
        assert_eq!(reaction.emoji.name.as_deref(), Some("🔥"));
        assert!(reaction.guild_id.is_none());
    }

    #[test]
    fn test_unavailable_guild_defaults() {
        let guild: UnavailableGuild = serde_json::from_value(json!({ "id": "5" })).unwrap();
        assert!(!guild.unavailable);
    }
}
