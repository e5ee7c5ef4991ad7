//! # chat-core
//!
//! Domain layer containing the value objects and entities that gateway events carry.
//! This crate has zero dependencies on infrastructure (sockets, HTTP, runtime).

pub mod entities;
pub mod error;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AllowedMentions, Channel, ChannelType, Guild, Message, MessageReference, MessageRequest,
    MessageType, Role, User,
};
pub use error::DomainError;
pub use value_objects::{Intents, Snowflake, SnowflakeParseError};
