//! Session transport
//!
//! A transport owns at most one socket connection and reports what happens on it
//! through an [`EventSink`]. It never looks inside the frames it carries.

mod websocket;

pub use websocket::WebSocketTransport;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::protocol::CloseCode;

/// Why the remote side closed the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReason {
    pub code: u16,
    pub reason: String,
}

impl CloseReason {
    /// Create a close reason
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// Gateway-specific close code, if the code is one
    pub fn close_code(&self) -> Option<CloseCode> {
        CloseCode::from_u16(self.code)
    }
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.close_code() {
            Some(code) => write!(f, "{code}"),
            None if self.reason.is_empty() => write!(f, "code {}", self.code),
            None => write!(f, "code {}: {}", self.code, self.reason),
        }
    }
}

/// Events a transport reports to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text frame arrived
    Frame(String),
    /// The connection was closed by the remote side or the stream ended
    Closed(Option<CloseReason>),
    /// The connection failed
    Error(String),
}

/// A transport event tagged with the connection it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEvent {
    pub generation: u64,
    pub event: TransportEvent,
}

/// Handle a transport uses to report events for one connection
///
/// Each `open` gets a sink with a new generation, so the owner can drop
/// late events from a connection it has already discarded.
#[derive(Debug, Clone)]
pub struct EventSink {
    generation: u64,
    tx: mpsc::UnboundedSender<TaggedEvent>,
}

impl EventSink {
    /// Create a sink for the given connection generation
    pub fn new(generation: u64, tx: mpsc::UnboundedSender<TaggedEvent>) -> Self {
        Self { generation, tx }
    }

    /// Connection generation this sink reports for
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Report an inbound text frame
    ///
    /// Returns `false` once the owner has gone away.
    pub fn frame(&self, text: impl Into<String>) -> bool {
        self.emit(TransportEvent::Frame(text.into()))
    }

    /// Report that the connection closed
    pub fn closed(&self, reason: Option<CloseReason>) -> bool {
        self.emit(TransportEvent::Closed(reason))
    }

    /// Report a connection failure
    pub fn error(&self, detail: impl Into<String>) -> bool {
        self.emit(TransportEvent::Error(detail.into()))
    }

    fn emit(&self, event: TransportEvent) -> bool {
        self.tx
            .send(TaggedEvent {
                generation: self.generation,
                event,
            })
            .is_ok()
    }
}

/// Socket connection used by the gateway session
#[async_trait]
pub trait Transport: Send + 'static {
    /// Open a connection to `url`, closing any connection already open
    ///
    /// Inbound frames and the eventual close are reported through `sink`.
    async fn open(&mut self, url: &str, sink: EventSink) -> Result<(), TransportError>;

    /// Send one text frame
    ///
    /// Fails with [`TransportError::NotConnected`] if no connection is open.
    async fn send(&mut self, text: String) -> Result<(), TransportError>;

    /// Close the connection and stop reading from it
    async fn close(&mut self);

    /// Check if a connection is open
    fn is_open(&self) -> bool;
}
