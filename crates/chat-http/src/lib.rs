//! # chat-http
//!
//! Stateless REST collaborator: one call is one independent request authorized
//! with the token the gateway session logged in with.

mod client;
mod error;
mod files;
mod token;

pub use client::{HttpClient, Method};
pub use error::{HttpError, HttpResult};
pub use files::FileContent;
pub use token::TokenStore;
