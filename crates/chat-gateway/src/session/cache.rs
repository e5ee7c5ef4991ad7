//! Session cache
//!
//! The only state kept across events: the current user and the guild/channel
//! registry. The session task is the single writer; handles read through
//! cheap clones.

use std::collections::HashMap;
use std::sync::Arc;

use chat_core::{Channel, DomainError, Guild, Snowflake, User};
use parking_lot::RwLock;

use crate::events::Event;

#[derive(Debug, Default)]
struct CacheInner {
    current_user: Option<User>,
    guilds: HashMap<Snowflake, Guild>,
}

/// Shared view of the session's user and guild registry
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    inner: Arc<RwLock<CacheInner>>,
}

impl SessionCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The logged-in user, once READY has been seen
    pub fn current_user(&self) -> Option<User> {
        self.inner.read().current_user.clone()
    }

    #[cfg(test)]
    pub(crate) fn set_current_user(&self, user: User) {
        self.inner.write().current_user = Some(user);
    }

    /// Look up a guild by id
    pub fn guild(&self, guild_id: Snowflake) -> Option<Guild> {
        self.inner.read().guilds.get(&guild_id).cloned()
    }

    /// All known guilds
    pub fn guilds(&self) -> Vec<Guild> {
        self.inner.read().guilds.values().cloned().collect()
    }

    /// Number of known guilds
    pub fn guild_count(&self) -> usize {
        self.inner.read().guilds.len()
    }

    /// Look up a channel inside a known guild
    pub fn channel(&self, guild_id: Snowflake, channel_id: Snowflake) -> Result<Channel, DomainError> {
        let inner = self.inner.read();
        let guild = inner
            .guilds
            .get(&guild_id)
            .ok_or(DomainError::GuildNotFound(guild_id))?;
        guild
            .channel(channel_id)
            .cloned()
            .ok_or(DomainError::ChannelNotFound(channel_id))
    }

    /// Apply an event's effect on the registry
    ///
    /// Returns the event to hand to user code; GUILD_DELETE is filled in with
    /// the guild as it was known before removal.
    pub(crate) fn apply(&self, event: Event) -> Event {
        let mut inner = self.inner.write();

        match event {
            Event::Ready(ready) => {
                inner.current_user = Some(ready.user.clone());
                Event::Ready(ready)
            }
            Event::UserUpdate(user) => {
                if inner.current_user.as_ref().is_some_and(|u| u.id == user.id) {
                    inner.current_user = Some(user.clone());
                }
                Event::UserUpdate(user)
            }
            Event::GuildCreate(guild) => {
                inner.guilds.insert(guild.id, (*guild).clone());
                Event::GuildCreate(guild)
            }
            Event::GuildDelete { guild, unavailable } => {
                let guild = inner
                    .guilds
                    .remove(&guild.id)
                    .map_or(guild, Box::new);
                Event::GuildDelete { guild, unavailable }
            }
            Event::GuildRoleCreate { guild_id, role } => {
                if let Some(guild) = inner.guilds.get_mut(&guild_id) {
                    guild.upsert_role(role.clone());
                }
                Event::GuildRoleCreate { guild_id, role }
            }
            Event::GuildRoleUpdate { guild_id, role } => {
                if let Some(guild) = inner.guilds.get_mut(&guild_id) {
                    guild.upsert_role(role.clone());
                }
                Event::GuildRoleUpdate { guild_id, role }
            }
            Event::GuildRoleDelete { guild_id, role_id } => {
                if let Some(guild) = inner.guilds.get_mut(&guild_id) {
                    guild.remove_role(role_id);
                }
                Event::GuildRoleDelete { guild_id, role_id }
            }
            Event::ChannelCreate(channel) => {
                upsert_channel(&mut inner, &channel);
                Event::ChannelCreate(channel)
            }
            Event::ChannelUpdate(channel) => {
                upsert_channel(&mut inner, &channel);
                Event::ChannelUpdate(channel)
            }
            Event::ChannelDelete(channel) => {
                if let Some(guild) = channel.guild_id.and_then(|id| inner.guilds.get_mut(&id)) {
                    guild.remove_channel(channel.id);
                }
                Event::ChannelDelete(channel)
            }
            other => other,
        }
    }
}

fn upsert_channel(inner: &mut CacheInner, channel: &Channel) {
    if let Some(guild) = channel.guild_id.and_then(|id| inner.guilds.get_mut(&id)) {
        guild.insert_channel(channel.clone());
    }
}
