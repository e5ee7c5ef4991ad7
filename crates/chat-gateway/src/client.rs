//! Gateway client handle
//!
//! [`GatewayClient`] is the entry point: register handlers, log in, and read
//! the session cache. Every clone talks to the same session task.

use std::sync::Arc;

use chat_common::ClientConfig;
use chat_core::{Guild, Snowflake, User};
use chat_http::{HttpClient, TokenStore};
use tokio::sync::{mpsc, oneshot, watch};

use crate::dispatch::{Context, HandlerRegistry};
use crate::error::{ClientError, ClientResult};
use crate::events::{Event, EventKind};
use crate::session::{Command, SessionCache, SessionPhase, SessionRunner, Shared};
use crate::transport::{Transport, WebSocketTransport};

const COMMAND_BUFFER: usize = 32;

/// Handle to a gateway session
#[derive(Debug, Clone)]
pub struct GatewayClient {
    commands: mpsc::Sender<Command>,
    registry: Arc<HandlerRegistry>,
    cache: SessionCache,
    http: HttpClient,
    token: TokenStore,
    phase: watch::Receiver<SessionPhase>,
}

impl GatewayClient {
    /// Create a client that connects over WebSocket
    ///
    /// Spawns the session task, so it must be called inside a Tokio runtime.
    /// Nothing is opened until [`connect`](Self::connect) or [`login`](Self::login).
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = WebSocketTransport::with_connect_timeout(config.gateway.connect_timeout());
        Self::with_transport(config, transport)
    }

    /// Create a client over a custom transport
    pub fn with_transport<T: Transport>(config: ClientConfig, transport: T) -> ClientResult<Self> {
        let token = TokenStore::new();
        let http = HttpClient::new(&config, token.clone())?;
        let registry = Arc::new(HandlerRegistry::new());
        let cache = SessionCache::new();
        let (phase_tx, phase_rx) = watch::channel(SessionPhase::Disconnected);
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);

        let shared = Shared {
            config: Arc::new(config),
            registry: Arc::clone(&registry),
            cache: cache.clone(),
            http: http.clone(),
            token: token.clone(),
            phase: phase_tx,
        };
        tokio::spawn(SessionRunner::new(shared, transport, commands_rx).run());

        Ok(Self {
            commands: commands_tx,
            registry,
            cache,
            http,
            token,
            phase: phase_rx,
        })
    }

    /// Register the handler for an event kind, replacing any previous one
    ///
    /// Handlers run on the session task in frame order; long work should be
    /// spawned rather than done inline.
    pub fn register<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(Context, Event) + Send + Sync + 'static,
    {
        self.registry.register(kind, handler);
    }

    /// Open the gateway connection without identifying
    pub async fn connect(&self) -> ClientResult<()> {
        self.send(Command::Connect).await
    }

    /// Log in with a bot token
    ///
    /// Opens the connection if needed. Identify is sent once the server's Hello
    /// has arrived, and again after every reconnect. The first token stored
    /// wins; a different token passed later is ignored.
    pub async fn login(&self, token: impl Into<String>) -> ClientResult<()> {
        let token = token.into();
        if token.is_empty() {
            return Err(ClientError::EmptyToken);
        }

        if !self.token.set(token.as_str()) && self.token.get() != Some(token.as_str()) {
            tracing::warn!("Already logged in with a different token; keeping the first one");
        }

        self.send(Command::Login).await
    }

    /// Stop the heartbeat and the transport and end the session task
    ///
    /// Calling it again, or on a clone, is a no-op.
    pub async fn close(&self) -> ClientResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.commands.send(Command::Close(ack_tx)).await.is_err() {
            return Ok(());
        }
        let _ = ack_rx.await;
        Ok(())
    }

    /// The logged-in user, once READY has been received
    pub fn current_user(&self) -> Option<User> {
        self.cache.current_user()
    }

    /// All known guilds
    pub fn guilds(&self) -> Vec<Guild> {
        self.cache.guilds()
    }

    /// Look up a known guild
    pub fn guild(&self, guild_id: Snowflake) -> Option<Guild> {
        self.cache.guild(guild_id)
    }

    /// Session cache shared with handlers
    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// REST client authorized with this session's token
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Current lifecycle phase
    pub fn state(&self) -> SessionPhase {
        *self.phase.borrow()
    }

    /// Watch lifecycle phase changes
    pub fn subscribe(&self) -> watch::Receiver<SessionPhase> {
        self.phase.clone()
    }

    /// Wait until the session reaches `phase`
    ///
    /// Fails with [`ClientError::Closed`] if the session ends first.
    pub async fn wait_for(&self, phase: SessionPhase) -> ClientResult<()> {
        let mut rx = self.phase.clone();
        let reached = rx
            .wait_for(|current| *current == phase || current.is_closed())
            .await
            .map_err(|_| ClientError::Closed)?;

        if *reached == phase {
            Ok(())
        } else {
            Err(ClientError::Closed)
        }
    }

    async fn send(&self, command: Command) -> ClientResult<()> {
        self.commands.send(command).await.map_err(|_| ClientError::Closed)
    }
}
