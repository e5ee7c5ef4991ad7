//! Guild entity - represents a server and the channels known to belong to it

use std::collections::HashMap;

use super::{Channel, Role};
use crate::value_objects::Snowflake;

/// Guild (server) entity
///
/// Built from GUILD_CREATE payloads and kept up to date by channel and role events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: Snowflake,
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub owner_id: Option<Snowflake>,
    pub roles: Vec<Role>,
    pub channels: HashMap<Snowflake, Channel>,
    pub unavailable: bool,
}

impl Guild {
    /// Create a new Guild
    pub fn new(id: Snowflake, name: impl Into<String>, owner_id: Snowflake) -> Self {
        Self {
            id,
            name: name.into(),
            icon: None,
            description: None,
            owner_id: Some(owner_id),
            roles: Vec::new(),
            channels: HashMap::new(),
            unavailable: false,
        }
    }

    /// Create a guild known only by id (e.g. the guild of a message)
    pub fn from_id(id: Snowflake) -> Self {
        Self {
            id,
            name: String::new(),
            icon: None,
            description: None,
            owner_id: None,
            roles: Vec::new(),
            channels: HashMap::new(),
            unavailable: false,
        }
    }

    /// Check if a user is the guild owner
    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == Some(user_id)
    }

    /// Get the guild icon URL if set
    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_ref()
            .map(|hash| format!("https://cdn.discordapp.com/icons/{}/{}.png", self.id, hash))
    }

    /// Insert or replace a channel, stamping it with this guild's id
    pub fn insert_channel(&mut self, mut channel: Channel) {
        channel.guild_id = Some(self.id);
        self.channels.insert(channel.id, channel);
    }

    /// Remove a channel, returning it if it was known
    pub fn remove_channel(&mut self, channel_id: Snowflake) -> Option<Channel> {
        self.channels.remove(&channel_id)
    }

    /// Look up a channel by id
    pub fn channel(&self, channel_id: Snowflake) -> Option<&Channel> {
        self.channels.get(&channel_id)
    }

    /// Insert or replace a role
    pub fn upsert_role(&mut self, role: Role) {
        match self.roles.iter_mut().find(|r| r.id == role.id) {
            Some(existing) => *existing = role,
            None => self.roles.push(role),
        }
    }

    /// Remove a role by id
    pub fn remove_role(&mut self, role_id: Snowflake) -> Option<Role> {
        let index = self.roles.iter().position(|r| r.id == role_id)?;
        Some(self.roles.remove(index))
    }
}
