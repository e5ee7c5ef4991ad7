//! Gateway intents bitflags
//!
//! Declares which event categories a client wants the gateway to send.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Gateway intent flags sent in the Identify payload
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u64 {
        /// Guild create/update/delete, role and channel events
        const GUILDS                   = 1 << 0;
        /// Member add/update/remove (privileged)
        const GUILD_MEMBERS            = 1 << 1;
        /// Ban add/remove
        const GUILD_BANS               = 1 << 2;
        /// Emoji updates
        const GUILD_EMOJIS             = 1 << 3;
        /// Integration updates
        const GUILD_INTEGRATIONS       = 1 << 4;
        /// Webhook updates
        const GUILD_WEBHOOKS           = 1 << 5;
        /// Invite create/delete
        const GUILD_INVITES            = 1 << 6;
        /// Voice state updates
        const GUILD_VOICE_STATES       = 1 << 7;
        /// Presence updates (privileged)
        const GUILD_PRESENCES          = 1 << 8;
        /// Messages in guild channels
        const GUILD_MESSAGES           = 1 << 9;
        /// Reactions in guild channels
        const GUILD_MESSAGE_REACTIONS  = 1 << 10;
        /// Typing in guild channels
        const GUILD_MESSAGE_TYPING     = 1 << 11;
        /// Direct messages
        const DIRECT_MESSAGES          = 1 << 12;
        /// Reactions in direct messages
        const DIRECT_MESSAGE_REACTIONS = 1 << 13;
        /// Typing in direct messages
        const DIRECT_MESSAGE_TYPING    = 1 << 14;

        /// Client default: guilds, guild messages and direct messages (4609)
        const DEFAULT = Self::GUILDS.bits()
            | Self::GUILD_MESSAGES.bits()
            | Self::DIRECT_MESSAGES.bits();

        /// Intents that must be enabled for the application before use
        const PRIVILEGED = Self::GUILD_MEMBERS.bits() | Self::GUILD_PRESENCES.bits();
    }
}

impl Intents {
    /// Parse from a decimal string, dropping unknown bits
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        s.trim().parse::<u64>().map(Intents::from_bits_truncate)
    }

    /// Check whether any privileged intent is requested
    #[inline]
    pub fn is_privileged(&self) -> bool {
        self.intersects(Self::PRIVILEGED)
    }
}

impl Default for Intents {
    fn default() -> Self {
        Intents::DEFAULT
    }
}

impl fmt::Display for Intents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// The gateway expects intents as a plain integer
impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for Intents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Intents::from_bits_truncate)
    }
}

impl From<u64> for Intents {
    fn from(bits: u64) -> Self {
        Intents::from_bits_truncate(bits)
    }
}

impl From<Intents> for u64 {
    fn from(intents: Intents) -> Self {
        intents.bits()
    }
}
