//! Domain entities - objects carried by gateway events and REST responses

mod channel;
mod guild;
mod message;
mod role;
mod user;

pub use channel::{Channel, ChannelType};
pub use guild::Guild;
pub use message::{AllowedMentions, Message, MessageReference, MessageRequest, MessageType};
pub use role::Role;
pub use user::User;
