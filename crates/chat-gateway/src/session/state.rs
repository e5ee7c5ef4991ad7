//! Session state
//!
//! Owned exclusively by the session task; nothing here is shared.

use std::fmt;

use crate::heartbeat::HeartbeatMonitor;

/// Connection lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No transport has been opened yet
    Disconnected,
    /// Transport open, waiting for Hello
    Connecting,
    /// Hello received and Identify sent, waiting for READY
    AwaitingIdentifyAck,
    /// READY received
    Ready,
    /// Transport lost, opening a new one
    Reconnecting,
    /// `close` was called; terminal
    Closed,
}

impl SessionPhase {
    /// Get the name of this phase
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::AwaitingIdentifyAck => "awaiting-identify-ack",
            Self::Ready => "ready",
            Self::Reconnecting => "reconnecting",
            Self::Closed => "closed",
        }
    }

    /// Check if this phase is terminal
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable per-session protocol state
#[derive(Debug)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// Highest dispatch sequence seen on the current connection
    pub last_sequence: Option<u64>,
    /// Hello has arrived on the current connection
    pub hello_received: bool,
    /// `login` was called; every new connection identifies after Hello
    pub logged_in: bool,
    /// Identify has been sent on the current connection
    pub identified: bool,
    pub heartbeat: HeartbeatMonitor,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Fresh state for a session that has never connected
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Disconnected,
            last_sequence: None,
            hello_received: false,
            logged_in: false,
            identified: false,
            heartbeat: HeartbeatMonitor::new(),
        }
    }

    /// Forget everything tied to the previous connection
    ///
    /// The login flag survives, so the new connection identifies again.
    pub fn reset_connection(&mut self) {
        self.last_sequence = None;
        self.hello_received = false;
        self.identified = false;
        self.heartbeat.stop();
    }

    /// Record a dispatch sequence number; the stored value never decreases
    pub fn observe_sequence(&mut self, sequence: u64) {
        self.last_sequence = self.last_sequence.max(Some(sequence));
    }

    /// Identify should be sent now
    pub fn should_identify(&self) -> bool {
        self.logged_in && self.hello_received && !self.identified
    }
}
