//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the HTTP cookie carrying the opaque session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Session lifetime in minutes; each save pushes `expires_at` forward
    /// by this amount.
    #[serde(default = "default_timeout_minutes")]
    pub timeout_minutes: u64,
    /// Whether the session cookie is marked `Secure`.
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            timeout_minutes: default_timeout_minutes(),
            cookie_secure: false,
        }
    }
}

impl SessionConfig {
    /// Session time-to-live as a chrono-free number of seconds.
    pub fn ttl_seconds(&self) -> i64 {
        (self.timeout_minutes * 60) as i64
    }
}

fn default_cookie_name() -> String {
    "portal_session".to_string()
}

fn default_timeout_minutes() -> u64 {
    30
}
