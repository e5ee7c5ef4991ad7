//! # chat-gateway
//!
//! Client for the real-time gateway: frame codec, transport, heartbeat,
//! event decoding and handler dispatch, driven by one session task per client.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod heartbeat;
pub mod protocol;
pub mod session;
pub mod transport;

pub use client::GatewayClient;
pub use dispatch::{Context, Handler, HandlerRegistry};
pub use error::{ClientError, ClientResult, DecodeError, TransportError};
pub use events::{Event, EventKind};
pub use session::{SessionCache, SessionPhase};
