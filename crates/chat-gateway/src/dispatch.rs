//! Dispatch registry
//!
//! Maps each event kind to at most one handler. Registering a kind again
//! replaces the previous handler.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use chat_core::{Channel, Guild, Snowflake, User};
use chat_http::HttpClient;
use dashmap::DashMap;

use crate::events::{Event, EventKind};
use crate::session::SessionCache;

/// Registered event callback
pub type Handler = Arc<dyn Fn(Context, Event) + Send + Sync>;

/// What a handler gets besides the event: the REST client and the session cache
#[derive(Debug, Clone)]
pub struct Context {
    http: HttpClient,
    cache: SessionCache,
}

impl Context {
    pub(crate) fn new(http: HttpClient, cache: SessionCache) -> Self {
        Self { http, cache }
    }

    /// REST client authorized with the session's token
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Read access to the session cache
    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// The logged-in user
    pub fn current_user(&self) -> Option<User> {
        self.cache.current_user()
    }

    /// Look up a cached guild
    pub fn guild(&self, guild_id: Snowflake) -> Option<Guild> {
        self.cache.guild(guild_id)
    }

    /// Look up a cached guild channel
    pub fn channel(&self, guild_id: Snowflake, channel_id: Snowflake) -> Option<Channel> {
        self.cache.channel(guild_id, channel_id).ok()
    }
}

/// Event kind to handler table
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: DashMap<EventKind, Handler>,
}

impl HandlerRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one for the kind
    pub fn register<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(Context, Event) + Send + Sync + 'static,
    {
        if self.handlers.insert(kind, Arc::new(handler)).is_some() {
            tracing::debug!(event = %kind, "Replaced event handler");
        }
    }

    /// Check if a handler is registered for the kind
    pub fn contains(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke the handler registered for the event's kind
    ///
    /// Returns `false` if none is registered. A panicking handler is logged and
    /// reported as having run.
    pub fn dispatch(&self, ctx: Context, event: Event) -> bool {
        let kind = event.kind();

        // Clone out of the map so a handler can register without deadlocking
        let Some(handler) = self.handlers.get(&kind).map(|h| Arc::clone(h.value())) else {
            return false;
        };

        if catch_unwind(AssertUnwindSafe(|| handler(ctx, event))).is_err() {
            tracing::error!(event = %kind, "Event handler panicked");
        }

        true
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&'static str> = self.handlers.iter().map(|e| e.key().as_str()).collect();
        kinds.sort_unstable();
        f.debug_struct("HandlerRegistry").field("kinds", &kinds).finish()
    }
}
