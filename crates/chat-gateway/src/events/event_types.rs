//! Dispatch event kinds
//!
//! Names carried in the `t` field of dispatch frames.

use std::fmt;

/// Dispatch event kinds known to the client
///
/// Names outside the set map to [`EventKind::Unknown`], which handlers can
/// register for to receive them generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // Connection events
    /// Sent after successful Identify
    Ready,
    /// Sent after successful Resume
    Resumed,
    /// Voice server assigned for a guild
    VoiceServerUpdate,
    /// Current user updated
    UserUpdate,

    // Guild events
    /// Guild available, joined, or created
    GuildCreate,
    /// Left guild, kicked, or guild unavailable
    GuildDelete,
    GuildRoleCreate,
    GuildRoleUpdate,
    GuildRoleDelete,

    // Channel events
    ChannelCreate,
    ChannelUpdate,
    ChannelDelete,
    /// Message pinned or unpinned
    ChannelPinsUpdate,

    // Message events
    MessageCreate,
    MessageUpdate,
    MessageDelete,
    MessageDeleteBulk,
    MessageReactionAdd,
    MessageReactionRemove,

    /// User started typing
    TypingStart,

    /// Any event name the client does not know
    Unknown,
}

impl EventKind {
    /// Every named kind, excluding `Unknown`
    pub const ALL: [Self; 20] = [
        Self::Ready,
        Self::Resumed,
        Self::VoiceServerUpdate,
        Self::UserUpdate,
        Self::GuildCreate,
        Self::GuildDelete,
        Self::GuildRoleCreate,
        Self::GuildRoleUpdate,
        Self::GuildRoleDelete,
        Self::ChannelCreate,
        Self::ChannelUpdate,
        Self::ChannelDelete,
        Self::ChannelPinsUpdate,
        Self::MessageCreate,
        Self::MessageUpdate,
        Self::MessageDelete,
        Self::MessageDeleteBulk,
        Self::MessageReactionAdd,
        Self::MessageReactionRemove,
        Self::TypingStart,
    ];

    /// Get the wire name of the event kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Resumed => "RESUMED",
            Self::VoiceServerUpdate => "VOICE_SERVER_UPDATE",
            Self::UserUpdate => "USER_UPDATE",
            Self::GuildCreate => "GUILD_CREATE",
            Self::GuildDelete => "GUILD_DELETE",
            Self::GuildRoleCreate => "GUILD_ROLE_CREATE",
            Self::GuildRoleUpdate => "GUILD_ROLE_UPDATE",
            Self::GuildRoleDelete => "GUILD_ROLE_DELETE",
            Self::ChannelCreate => "CHANNEL_CREATE",
            Self::ChannelUpdate => "CHANNEL_UPDATE",
            Self::ChannelDelete => "CHANNEL_DELETE",
            Self::ChannelPinsUpdate => "CHANNEL_PINS_UPDATE",
            Self::MessageCreate => "MESSAGE_CREATE",
            Self::MessageUpdate => "MESSAGE_UPDATE",
            Self::MessageDelete => "MESSAGE_DELETE",
            Self::MessageDeleteBulk => "MESSAGE_DELETE_BULK",
            Self::MessageReactionAdd => "MESSAGE_REACTION_ADD",
            Self::MessageReactionRemove => "MESSAGE_REACTION_REMOVE",
            Self::TypingStart => "TYPING_START",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Map a wire name to its kind
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .unwrap_or(Self::Unknown)
    }

    /// Check if events of this kind change the guild/channel registry
    #[must_use]
    pub const fn mutates_registry(self) -> bool {
        matches!(
            self,
            Self::GuildCreate
                | Self::GuildDelete
                | Self::GuildRoleCreate
                | Self::GuildRoleUpdate
                | Self::GuildRoleDelete
                | Self::ChannelCreate
                | Self::ChannelUpdate
                | Self::ChannelDelete
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
