//! Gateway protocol definitions
//!
//! Frame codec, op codes, handshake payloads and close codes.

mod close_codes;
mod frame;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use frame::GatewayFrame;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, IdentifyProperties};
