//! Heartbeat monitor
//!
//! Keeps the connection alive with the interval the server announces in Hello.
//! The monitor only decides; the session sends the frames and reconnects.
//!
//! ```text
//! idle --arm--> armed --tick--> awaiting-ack --ack--> armed
//!                                    |
//!                                  tick
//!                                    v
//!                             liveness failure (back to idle)
//! ```

use std::future::pending;
use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Observable monitor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatState {
    /// No interval known, no timer running
    Idle,
    /// Timer running, last heartbeat acknowledged
    Armed,
    /// Heartbeat sent, acknowledgment pending
    AwaitingAck,
}

/// What the session should do on a timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatAction {
    /// Send a heartbeat carrying this sequence
    Beat(Option<u64>),
    /// The previous heartbeat was never acknowledged; reconnect
    LivenessFailure,
}

/// Heartbeat state machine with its timer
#[derive(Debug)]
pub struct HeartbeatMonitor {
    interval: Option<Interval>,
    period: Option<Duration>,
    acked: bool,
}

impl Default for HeartbeatMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeartbeatMonitor {
    /// Create an idle monitor
    #[must_use]
    pub fn new() -> Self {
        Self {
            interval: None,
            period: None,
            acked: true,
        }
    }

    /// Start the timer with the server's interval
    ///
    /// The first tick fires one full period from now. Re-arming replaces the
    /// running timer and forgets any pending acknowledgment. A zero period
    /// leaves the monitor idle.
    pub fn arm(&mut self, period: Duration) {
        if period.is_zero() {
            self.stop();
            return;
        }

        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.interval = Some(interval);
        self.period = Some(period);
        self.acked = true;
    }

    /// Stop the timer and return to idle
    pub fn stop(&mut self) {
        self.interval = None;
        self.period = None;
    }

    /// Record an acknowledgment from the server
    pub fn ack(&mut self) {
        self.acked = true;
    }

    /// Current state
    pub fn state(&self) -> HeartbeatState {
        match (&self.interval, self.acked) {
            (None, _) => HeartbeatState::Idle,
            (Some(_), true) => HeartbeatState::Armed,
            (Some(_), false) => HeartbeatState::AwaitingAck,
        }
    }

    /// Interval the monitor was armed with
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Wait for the next tick
    ///
    /// Never completes while idle, so it can sit in a `select!` unconditionally.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => pending::<()>().await,
        }
    }

    /// Decide what a tick means
    ///
    /// A liveness failure disarms the monitor, so it is reported once per connection.
    pub fn on_tick(&mut self, last_sequence: Option<u64>) -> HeartbeatAction {
        if self.acked {
            self.acked = false;
            HeartbeatAction::Beat(last_sequence)
        } else {
            self.stop();
            HeartbeatAction::LivenessFailure
        }
    }
}
