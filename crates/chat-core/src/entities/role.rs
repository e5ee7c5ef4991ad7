//! Role entity - represents a guild role

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Role entity
///
/// Permissions are kept as the raw decimal string the gateway sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub permissions: String,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
}

impl Role {
    /// Create a new Role
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: 0,
            hoist: false,
            position: 0,
            permissions: "0".to_string(),
            managed: false,
            mentionable: false,
        }
    }

    /// Compare role positions for hierarchy (higher position = more authority)
    #[inline]
    pub fn is_higher_than(&self, other: &Role) -> bool {
        self.position > other.position
    }

    /// Get the mention markup for message content
    pub fn mention(&self) -> String {
        format!("<@&{}>", self.id)
    }
}
