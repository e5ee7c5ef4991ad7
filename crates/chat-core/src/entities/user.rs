//! User entity - represents an account seen through the gateway

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Snowflake;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Snowflake,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: Snowflake, username: impl Into<String>, discriminator: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            discriminator: discriminator.into(),
            avatar: None,
            bot: false,
        }
    }

    /// Create a user known only by id (e.g. a guild owner reference)
    pub fn from_id(id: Snowflake) -> Self {
        Self::new(id, String::new(), String::new())
    }

    /// Get the full tag: username#discriminator
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }

    /// Get the mention markup for message content
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    /// Get avatar URL or default avatar URL
    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(hash) => format!("https://cdn.discordapp.com/avatars/{}/{}.png", self.id, hash),
            None => format!(
                "https://cdn.discordapp.com/embed/avatars/{}.png",
                self.default_avatar_index()
            ),
        }
    }

    /// Get default avatar index (0-4) based on discriminator
    fn default_avatar_index(&self) -> u8 {
        (self.discriminator.parse::<u16>().unwrap_or(0) % 5) as u8
    }

    /// Check if user is a bot account
    #[inline]
    pub fn is_bot(&self) -> bool {
        self.bot
    }
}

/// Displays as a mention so users can be interpolated into message content
impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<@{}>", self.id)
    }
}
