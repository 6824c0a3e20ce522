//! User identity.

use serde::{Deserialize, Serialize};

/// Identifier for a monitored user.
///
/// Users are keyed by the name they give at startup; there is no separate
/// account system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new user ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Fallback ID used when no name was given.
    pub fn default_user() -> Self {
        Self("default_user".to_string())
    }

    /// Borrow the underlying name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
