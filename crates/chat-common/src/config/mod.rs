//! Configuration module
//!
//! Client options with documented defaults, loadable from environment variables.

mod client_config;

pub use client_config::{ClientConfig, ConfigError, GatewayConfig, HttpConfig, ClientProperties};
