//! Set-once authentication token shared by the REST client and the gateway session

use std::sync::{Arc, OnceLock};

/// Shared token slot
///
/// The first stored token wins; later logins reuse it.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<OnceLock<String>>,
}

impl TokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the token if none is set yet
    ///
    /// Returns `false` when a token was already present; an empty token is never stored.
    pub fn set(&self, token: impl Into<String>) -> bool {
        let token = token.into();
        if token.is_empty() {
            return false;
        }
        self.inner.set(token).is_ok()
    }

    /// Get the stored token
    pub fn get(&self) -> Option<&str> {
        self.inner.get().map(String::as_str)
    }

    /// Check if a token is present
    pub fn is_set(&self) -> bool {
        self.inner.get().is_some()
    }
}
