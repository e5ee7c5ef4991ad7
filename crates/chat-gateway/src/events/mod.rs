//! Gateway events
//!
//! Dispatch event kinds, their payloads, and the decoder producing [`Event`].

mod event;
mod event_types;
mod payloads;

pub use event::Event;
pub use event_types::EventKind;
pub use payloads::{
    ChannelPinsUpdate, GuildCreate, GuildRole, GuildRoleDelete, MessageDelete, MessageDeleteBulk,
    MessageUpdate, Reaction, ReactionEmoji, Ready, TypingStart, UnavailableGuild,
    VoiceServerUpdate,
};
