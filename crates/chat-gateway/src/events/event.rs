//! Typed dispatch events
//!
//! [`Event::decode`] turns a dispatch frame's name and payload into a tagged
//! variant. Payloads that do not match their kind's shape are rejected.

use chat_core::{Channel, Guild, Message, Role, Snowflake, User};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::payloads::{
    ChannelPinsUpdate, GuildCreate, GuildRole, GuildRoleDelete, MessageDelete, MessageDeleteBulk,
    MessageUpdate, Reaction, Ready, TypingStart, UnavailableGuild, VoiceServerUpdate,
};
use super::EventKind;
use crate::error::DecodeError;

/// A decoded dispatch event
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Ready(Box<Ready>),
    Resumed,
    VoiceServerUpdate(VoiceServerUpdate),
    UserUpdate(User),
    GuildCreate(Box<Guild>),
    /// The removed guild as last known; only the id when it was never cached
    GuildDelete {
        guild: Box<Guild>,
        unavailable: bool,
    },
    GuildRoleCreate {
        guild_id: Snowflake,
        role: Role,
    },
    GuildRoleUpdate {
        guild_id: Snowflake,
        role: Role,
    },
    GuildRoleDelete {
        guild_id: Snowflake,
        role_id: Snowflake,
    },
    ChannelCreate(Channel),
    ChannelUpdate(Channel),
    ChannelDelete(Channel),
    ChannelPinsUpdate(ChannelPinsUpdate),
    MessageCreate(Box<Message>),
    MessageUpdate(Box<MessageUpdate>),
    MessageDelete(MessageDelete),
    MessageDeleteBulk(MessageDeleteBulk),
    MessageReactionAdd(Reaction),
    MessageReactionRemove(Reaction),
    TypingStart(TypingStart),
    /// An event the client has no type for, passed through as raw JSON
    Unknown {
        name: String,
        data: Value,
    },
}

impl Event {
    /// Decode a dispatch payload
    ///
    /// Unknown names never fail; they produce [`Event::Unknown`].
    pub fn decode(name: &str, data: Value) -> Result<Self, DecodeError> {
        let kind = EventKind::from_name(name);

        let event = match kind {
            EventKind::Ready => Self::Ready(Box::new(parse(kind, data)?)),
            EventKind::Resumed => Self::Resumed,
            EventKind::VoiceServerUpdate => Self::VoiceServerUpdate(parse(kind, data)?),
            EventKind::UserUpdate => Self::UserUpdate(parse(kind, data)?),
            EventKind::GuildCreate => {
                let payload: GuildCreate = parse(kind, data)?;
                Self::GuildCreate(Box::new(payload.into()))
            }
            EventKind::GuildDelete => {
                let payload: UnavailableGuild = parse(kind, data)?;
                Self::GuildDelete {
                    guild: Box::new(Guild::from_id(payload.id)),
                    unavailable: payload.unavailable,
                }
            }
            EventKind::GuildRoleCreate => {
                let GuildRole { guild_id, role } = parse(kind, data)?;
                Self::GuildRoleCreate { guild_id, role }
            }
            EventKind::GuildRoleUpdate => {
                let GuildRole { guild_id, role } = parse(kind, data)?;
                Self::GuildRoleUpdate { guild_id, role }
            }
            EventKind::GuildRoleDelete => {
                let GuildRoleDelete { guild_id, role_id } = parse(kind, data)?;
                Self::GuildRoleDelete { guild_id, role_id }
            }
            EventKind::ChannelCreate => Self::ChannelCreate(parse(kind, data)?),
            EventKind::ChannelUpdate => Self::ChannelUpdate(parse(kind, data)?),
            EventKind::ChannelDelete => Self::ChannelDelete(parse(kind, data)?),
            EventKind::ChannelPinsUpdate => Self::ChannelPinsUpdate(parse(kind, data)?),
            EventKind::MessageCreate => Self::MessageCreate(Box::new(parse(kind, data)?)),
            EventKind::MessageUpdate => Self::MessageUpdate(Box::new(parse(kind, data)?)),
            EventKind::MessageDelete => Self::MessageDelete(parse(kind, data)?),
            EventKind::MessageDeleteBulk => Self::MessageDeleteBulk(parse(kind, data)?),
            EventKind::MessageReactionAdd => Self::MessageReactionAdd(parse(kind, data)?),
            EventKind::MessageReactionRemove => Self::MessageReactionRemove(parse(kind, data)?),
            EventKind::TypingStart => Self::TypingStart(parse(kind, data)?),
            EventKind::Unknown => Self::Unknown {
                name: name.to_string(),
                data,
            },
        };

        Ok(event)
    }

    /// Kind this event is registered under
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready(_) => EventKind::Ready,
            Self::Resumed => EventKind::Resumed,
            Self::VoiceServerUpdate(_) => EventKind::VoiceServerUpdate,
            Self::UserUpdate(_) => EventKind::UserUpdate,
            Self::GuildCreate(_) => EventKind::GuildCreate,
            Self::GuildDelete { .. } => EventKind::GuildDelete,
            Self::GuildRoleCreate { .. } => EventKind::GuildRoleCreate,
            Self::GuildRoleUpdate { .. } => EventKind::GuildRoleUpdate,
            Self::GuildRoleDelete { .. } => EventKind::GuildRoleDelete,
            Self::ChannelCreate(_) => EventKind::ChannelCreate,
            Self::ChannelUpdate(_) => EventKind::ChannelUpdate,
            Self::ChannelDelete(_) => EventKind::ChannelDelete,
            Self::ChannelPinsUpdate(_) => EventKind::ChannelPinsUpdate,
            Self::MessageCreate(_) => EventKind::MessageCreate,
            Self::MessageUpdate(_) => EventKind::MessageUpdate,
            Self::MessageDelete(_) => EventKind::MessageDelete,
            Self::MessageDeleteBulk(_) => EventKind::MessageDeleteBulk,
            Self::MessageReactionAdd(_) => EventKind::MessageReactionAdd,
            Self::MessageReactionRemove(_) => EventKind::MessageReactionRemove,
            Self::TypingStart(_) => EventKind::TypingStart,
            Self::Unknown { .. } => EventKind::Unknown,
        }
    }

    /// The message carried by MESSAGE_CREATE
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::MessageCreate(message) => Some(&**message),
            _ => None,
        }
    }
}

fn parse<T: DeserializeOwned>(kind: EventKind, data: Value) -> Result<T, DecodeError> {
    serde_json::from_value(data).map_err(|e| DecodeError::payload(kind.as_str(), e))
}
