//! Session task
//!
//! A single task owns the transport, the heartbeat monitor and the protocol
//! state. Commands from handles, transport events and heartbeat ticks are
//! processed one at a time in one `select!` loop, so sequence updates and
//! heartbeat reads can never race.

use std::future::pending;
use std::pin::Pin;
use std::sync::Arc;

use chat_common::ClientConfig;
use chat_http::{HttpClient, TokenStore};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep, Sleep};

use super::{SessionCache, SessionPhase, SessionState};
use crate::dispatch::{Context, HandlerRegistry};
use crate::events::{Event, EventKind};
use crate::heartbeat::HeartbeatAction;
use crate::protocol::{GatewayFrame, IdentifyPayload, IdentifyProperties, OpCode};
use crate::transport::{EventSink, TaggedEvent, Transport, TransportEvent};

/// Requests from client handles to the session task
#[derive(Debug)]
pub(crate) enum Command {
    /// Open a transport if none is open
    Connect,
    /// Identify with the stored token, now or once Hello arrives
    Login,
    /// Stop everything and end the task
    Close(oneshot::Sender<()>),
}

/// Everything the session task shares with client handles
pub(crate) struct Shared {
    pub config: Arc<ClientConfig>,
    pub registry: Arc<HandlerRegistry>,
    pub cache: SessionCache,
    pub http: HttpClient,
    pub token: TokenStore,
    pub phase: watch::Sender<SessionPhase>,
}

/// The session task
pub(crate) struct SessionRunner<T: Transport> {
    shared: Shared,
    transport: T,
    state: SessionState,
    generation: u64,
    commands: mpsc::Receiver<Command>,
    events_tx: mpsc::UnboundedSender<TaggedEvent>,
    events_rx: mpsc::UnboundedReceiver<TaggedEvent>,
    retry: Option<Pin<Box<Sleep>>>,
}

impl<T: Transport> SessionRunner<T> {
    pub(crate) fn new(shared: Shared, transport: T, commands: mpsc::Receiver<Command>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            shared,
            transport,
            state: SessionState::new(),
            generation: 0,
            commands,
            events_tx,
            events_rx,
            retry: None,
        }
    }

    /// Run until closed or every handle is dropped
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(Command::Connect) => self.connect().await,
                    Some(Command::Login) => self.login().await,
                    Some(Command::Close(ack)) => {
                        self.shutdown().await;
                        let _ = ack.send(());
                        break;
                    }
                    None => {
                        self.shutdown().await;
                        break;
                    }
                },
                Some(tagged) = self.events_rx.recv() => self.on_transport_event(tagged).await,
                () = self.state.heartbeat.tick() => self.on_heartbeat_tick().await,
                () = retry_elapsed(&mut self.retry) => {
                    self.retry = None;
                    self.open_transport().await;
                }
            }
        }

        tracing::debug!("Session task ended");
    }

    fn debug(&self) -> bool {
        self.shared.config.debug
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if self.state.phase != phase {
            tracing::debug!(from = %self.state.phase, to = %phase, "Session phase changed");
            self.state.phase = phase;
            self.shared.phase.send_replace(phase);
        }
    }

    // === Commands ===

    async fn connect(&mut self) {
        if self.transport.is_open() || self.retry.is_some() {
            return;
        }
        self.open_transport().await;
    }

    async fn login(&mut self) {
        if self.state.logged_in {
            tracing::debug!("Login ignored, session is already logged in");
            return;
        }
        self.state.logged_in = true;

        if !self.transport.is_open() && self.retry.is_none() {
            self.open_transport().await;
        } else if self.state.should_identify() {
            self.identify().await;
        }
    }

    async fn shutdown(&mut self) {
        self.state.heartbeat.stop();
        self.retry = None;
        self.transport.close().await;
        self.set_phase(SessionPhase::Closed);
        tracing::info!("Gateway session closed");
    }

    // === Connection lifecycle ===

    async fn open_transport(&mut self) {
        // Bumping the generation first makes any late event from the old connection stale
        self.generation += 1;
        self.state.reset_connection();
        if self.transport.is_open() {
            self.transport.close().await;
        }

        self.set_phase(SessionPhase::Connecting);

        let url = self.shared.config.gateway.connect_url();
        let sink = EventSink::new(self.generation, self.events_tx.clone());

        match self.transport.open(&url, sink).await {
            Ok(()) => {
                tracing::info!(url = %url, generation = self.generation, "Gateway transport opened");
            }
            Err(e) => {
                let delay = self.shared.config.gateway.reconnect_delay();
                tracing::warn!(
                    error = %e,
                    retry_in_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Failed to open gateway transport"
                );
                self.set_phase(SessionPhase::Reconnecting);
                self.retry = Some(Box::pin(sleep(delay)));
            }
        }
    }

    async fn reconnect(&mut self) {
        self.state.heartbeat.stop();
        self.set_phase(SessionPhase::Reconnecting);
        self.open_transport().await;
    }

    async fn send_frame(&mut self, frame: &GatewayFrame) -> bool {
        let text = match frame.encode() {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, op = %frame.op, "Failed to encode frame");
                return false;
            }
        };

        if self.debug() {
            tracing::debug!(op = %frame.op, "Sending frame");
        }

        match self.transport.send(text).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, op = %frame.op, "Failed to send frame");
                false
            }
        }
    }

    async fn identify(&mut self) {
        let Some(token) = self.shared.token.get().map(str::to_owned) else {
            tracing::warn!("Identify skipped, no token stored");
            return;
        };

        let config = &self.shared.config;
        let payload = IdentifyPayload::new(
            token,
            config.intents,
            IdentifyProperties::from(&config.gateway.properties),
        );

        let frame = match GatewayFrame::identify(&payload) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build Identify frame");
                return;
            }
        };

        if self.send_frame(&frame).await {
            self.state.identified = true;
            self.set_phase(SessionPhase::AwaitingIdentifyAck);
            tracing::info!(intents = %self.shared.config.intents, "Identify sent");
        }
    }

    // === Inbound ===

    async fn on_transport_event(&mut self, tagged: TaggedEvent) {
        if tagged.generation != self.generation {
            if self.debug() {
                tracing::debug!(
                    generation = tagged.generation,
                    current = self.generation,
                    "Ignoring event from a discarded connection"
                );
            }
            return;
        }

        match tagged.event {
            TransportEvent::Frame(text) => self.on_frame(&text).await,
            TransportEvent::Closed(reason) => {
                match &reason {
                    Some(reason) => tracing::warn!(reason = %reason, "Gateway connection closed"),
                    None => tracing::warn!("Gateway connection closed"),
                }
                if let Some(code) = reason.as_ref().and_then(|r| r.close_code()) {
                    if !code.is_reconnectable() {
                        tracing::error!(code = %code, "Server rejected the session; reconnecting anyway");
                    }
                }
                self.reconnect().await;
            }
            TransportEvent::Error(detail) => {
                tracing::warn!(error = %detail, "Gateway connection failed");
                self.reconnect().await;
            }
        }
    }

    async fn on_frame(&mut self, text: &str) {
        let frame = match GatewayFrame::decode(text) {
            Ok(frame) => frame,
            Err(e) => {
                if self.debug() {
                    tracing::debug!(error = %e, "Dropping malformed frame");
                }
                return;
            }
        };

        if self.debug() {
            tracing::debug!(op = %frame.op, t = ?frame.t, s = ?frame.s, "Frame received");
        }

        match frame.op {
            OpCode::Dispatch => self.on_dispatch(frame),
            OpCode::Hello => self.on_hello(&frame).await,
            OpCode::HeartbeatAck => self.state.heartbeat.ack(),
            op => {
                if self.debug() {
                    tracing::debug!(op = %op, "Opcode is not implemented");
                }
            }
        }
    }

    async fn on_hello(&mut self, frame: &GatewayFrame) {
        let hello = match frame.hello_payload() {
            Ok(hello) => hello,
            Err(e) => {
                if self.debug() {
                    tracing::debug!(error = %e, "Dropping Hello with invalid payload");
                }
                return;
            }
        };

        self.state.heartbeat.arm(hello.interval());
        self.state.hello_received = true;
        tracing::debug!(interval_ms = hello.heartbeat_interval, "Heartbeat armed");

        if self.state.should_identify() {
            self.identify().await;
        }
    }

    fn on_dispatch(&mut self, frame: GatewayFrame) {
        if let Some(sequence) = frame.dispatch_sequence() {
            self.state.observe_sequence(sequence);
        }

        let Some(name) = frame.t else {
            if self.debug() {
                tracing::debug!("Dropping dispatch without event name");
            }
            return;
        };

        let event = match Event::decode(&name, frame.d) {
            Ok(event) => event,
            Err(e) => {
                if self.debug() {
                    tracing::debug!(event = %name, error = %e, "Dropping undecodable event");
                }
                return;
            }
        };

        let event = self.shared.cache.apply(event);
        let kind = event.kind();
        if kind == EventKind::Ready {
            self.set_phase(SessionPhase::Ready);
            if let Some(user) = self.shared.cache.current_user() {
                tracing::info!(user = %user.tag(), "Session ready");
            }
        }

        let ctx = Context::new(self.shared.http.clone(), self.shared.cache.clone());
        if !self.shared.registry.dispatch(ctx, event) && self.debug() {
            tracing::debug!(event = %name, "Handler for event was not found");
        }
    }

    async fn on_heartbeat_tick(&mut self) {
        match self.state.heartbeat.on_tick(self.state.last_sequence) {
            HeartbeatAction::Beat(sequence) => {
                self.send_frame(&GatewayFrame::heartbeat(sequence)).await;
            }
            HeartbeatAction::LivenessFailure => {
                tracing::warn!("Heartbeat was not acknowledged, reconnecting");
                self.reconnect().await;
            }
        }
    }
}

async fn retry_elapsed(retry: &mut Option<Pin<Box<Sleep>>>) {
    match retry {
        Some(sleep) => sleep.as_mut().await,
        None => pending::<()>().await,
    }
}
