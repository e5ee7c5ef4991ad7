//! Integration test utilities for the gateway client
//!
//! A scripted transport stands in for the socket so tests can drive the
//! session frame by frame and inspect everything it sends.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
