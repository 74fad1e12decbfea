//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted server-side session row.
///
/// The token is the sole lookup key; at most one live (active, unexpired)
/// row exists per token. Rows are tombstoned (`active=false`,
/// `expires_at=now`) rather than deleted so stale cookies cannot be replayed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionRecord {
    /// Opaque unguessable session token (128-bit random hex).
    pub token: String,
    /// The authenticated account, if any. Anonymous sessions are never
    /// persisted, but the column stays nullable for tombstoned rows.
    pub account_id: Option<Uuid>,
    /// Opaque key-value attribute bag (JSONB object).
    pub data: serde_json::Value,
    /// Client IP at last save.
    pub client_ip: Option<String>,
    /// Client User-Agent at last save.
    pub user_agent: Option<String>,
    /// Absolute UTC expiry.
    pub expires_at: DateTime<Utc>,
    /// Whether the session is live. Deactivation is idempotent.
    pub active: bool,
    /// When the row was first written.
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Whether the row is live at the given instant.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(active: bool, expires_in: Duration) -> SessionRecord {
        SessionRecord {
            token: "deadbeef".into(),
            account_id: None,
            data: serde_json::json!({}),
            client_ip: None,
            user_agent: None,
            expires_at: Utc::now() + expires_in,
            active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_live() {
        let now = Utc::now();
        assert!(record(true, Duration::minutes(5)).is_live(now));
        assert!(!record(false, Duration::minutes(5)).is_live(now));
        assert!(!record(true, Duration::minutes(-5)).is_live(now));
    }
}
