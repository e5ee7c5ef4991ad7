//! Test helpers for integration tests
//!
//! [`MockTransport`] records opens, sent frames and closes, and lets a test
//! inject inbound frames or a remote close on the current connection.

use std::sync::Arc;

use async_trait::async_trait;
use chat_common::ClientConfig;
use chat_gateway::protocol::{GatewayFrame, OpCode};
use chat_gateway::transport::{CloseReason, EventSink, Transport};
use chat_gateway::{Context, Event, GatewayClient, TransportError};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct MockState {
    opens: Vec<String>,
    sent: Vec<String>,
    closes: usize,
    sinks: Vec<EventSink>,
    open: bool,
    failing_opens: usize,
}

/// Scripted transport shared between the session and the test
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` opens fail
    pub fn fail_next_opens(&self, count: usize) {
        self.state.lock().failing_opens = count;
    }

    /// Number of `open` calls, including failed ones
    pub fn open_count(&self) -> usize {
        self.state.lock().opens.len()
    }

    /// URLs passed to `open`
    pub fn opened_urls(&self) -> Vec<String> {
        self.state.lock().opens.clone()
    }

    /// Number of connections closed by the session
    pub fn close_count(&self) -> usize {
        self.state.lock().closes
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().open
    }

    /// Every frame the session sent, decoded
    pub fn sent(&self) -> Vec<GatewayFrame> {
        self.state
            .lock()
            .sent
            .iter()
            .filter_map(|text| GatewayFrame::decode(text).ok())
            .collect()
    }

    /// Sent frames with the given op code
    pub fn sent_with_op(&self, op: OpCode) -> Vec<GatewayFrame> {
        self.sent().into_iter().filter(|frame| frame.op == op).collect()
    }

    pub fn clear_sent(&self) {
        self.state.lock().sent.clear();
    }

    /// Sink of the most recent successful open
    pub fn current_sink(&self) -> Option<EventSink> {
        let state = self.state.lock();
        if state.open {
            state.sinks.last().cloned()
        } else {
            None
        }
    }

    /// Sink of the n-th successful open (0-based), even if discarded since
    pub fn sink_at(&self, index: usize) -> Option<EventSink> {
        self.state.lock().sinks.get(index).cloned()
    }

    /// Deliver a frame on the current connection
    pub fn inject(&self, frame: &GatewayFrame) -> bool {
        match (self.current_sink(), frame.encode()) {
            (Some(sink), Ok(text)) => sink.frame(text),
            _ => false,
        }
    }

    /// Deliver raw text on the current connection
    pub fn inject_text(&self, text: &str) -> bool {
        self.current_sink().is_some_and(|sink| sink.frame(text))
    }

    /// Simulate the remote side closing the current connection
    pub fn inject_close(&self, reason: Option<CloseReason>) -> bool {
        let sink = {
            let mut state = self.state.lock();
            if !state.open {
                return false;
            }
            state.open = false;
            state.sinks.last().cloned()
        };
        sink.is_some_and(|sink| sink.closed(reason))
    }

    /// Simulate a read failure on the current connection
    pub fn inject_error(&self, detail: &str) -> bool {
        let sink = {
            let mut state = self.state.lock();
            if !state.open {
                return false;
            }
            state.open = false;
            state.sinks.last().cloned()
        };
        sink.is_some_and(|sink| sink.error(detail))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn open(&mut self, url: &str, sink: EventSink) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if state.open {
            state.open = false;
            state.closes += 1;
        }
        state.opens.push(url.to_string());

        if state.failing_opens > 0 {
            state.failing_opens -= 1;
            return Err(TransportError::Connect {
                url: url.to_string(),
                reason: "scripted failure".to_string(),
            });
        }

        state.sinks.push(sink);
        state.open = true;
        Ok(())
    }

    async fn send(&mut self, text: String) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(TransportError::NotConnected);
        }
        state.sent.push(text);
        Ok(())
    }

    async fn close(&mut self) {
        let mut state = self.state.lock();
        if state.open {
            state.open = false;
            state.closes += 1;
        }
    }

    fn is_open(&self) -> bool {
        self.state.lock().open
    }
}

/// Collects the events a handler receives
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that records every event it is given
    pub fn handler(&self) -> impl Fn(Context, Event) + Send + Sync + 'static {
        let events = Arc::clone(&self.events);
        move |_, event| events.lock().push(event)
    }

    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn last(&self) -> Option<Event> {
        self.events.lock().last().cloned()
    }
}

/// Client wired to a mock transport
pub struct TestSession {
    pub client: GatewayClient,
    pub transport: MockTransport,
}

impl TestSession {
    /// Start a session with debug logging and default intents
    ///
    /// # Panics
    /// Panics if the client cannot be built.
    pub fn start() -> Self {
        Self::start_with_config(ClientConfig::default().with_debug(true))
    }

    /// # Panics
    /// Panics if the client cannot be built.
    pub fn start_with_config(config: ClientConfig) -> Self {
        let transport = MockTransport::new();
        let client = GatewayClient::with_transport(config, transport.clone())
            .expect("client should build");
        Self { client, transport }
    }

    /// Inject a frame and let the session process it
    pub async fn inject(&self, frame: &GatewayFrame) {
        assert!(self.transport.inject(frame), "no open connection to inject into");
        settle().await;
    }

    /// Connect and complete the Hello/Identify handshake
    ///
    /// # Panics
    /// Panics if the session does not open a connection.
    pub async fn handshake(&self, token: &str, heartbeat_interval: u64) {
        self.client.login(token).await.expect("login should be accepted");
        settle().await;
        self.inject(&GatewayFrame::hello(heartbeat_interval)).await;
    }
}

/// Let spawned tasks run without moving paused time forward
pub async fn settle() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}

/// Move paused time forward and let the session react
pub async fn advance(duration: std::time::Duration) {
    tokio::time::advance(duration).await;
    settle().await;
}
