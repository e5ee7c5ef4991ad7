//! Gateway session
//!
//! The session task, its private state and the cache it shares with handles.

mod cache;
mod runner;
mod state;

pub use cache::SessionCache;
pub(crate) use runner::{Command, SessionRunner, Shared};
pub use state::{SessionPhase, SessionState};
