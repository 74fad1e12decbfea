//! Auth log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable auth log entry recording a login/logout attempt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthLogEntry {
    /// Unique log entry identifier.
    pub id: Uuid,
    /// The account the attempt resolved to, if any. Nullable so entries
    /// outlive hard-deleted accounts.
    pub account_id: Option<Uuid>,
    /// The username as submitted, if known.
    pub username: Option<String>,
    /// The action attempted (`"login"`, `"logout"`, or a logout reason).
    pub action: String,
    /// Whether the attempt succeeded.
    pub success: bool,
    /// Failure detail (internal only, never shown to clients).
    pub error: Option<String>,
    /// Client IP address.
    pub client_ip: Option<String>,
    /// Client User-Agent.
    pub user_agent: Option<String>,
    /// When the attempt occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new auth log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuthLogEntry {
    /// Resolved account id (optional).
    pub account_id: Option<Uuid>,
    /// Submitted username (optional).
    pub username: Option<String>,
    /// The action attempted.
    pub action: String,
    /// Whether the attempt succeeded.
    pub success: bool,
    /// Failure detail (optional).
    pub error: Option<String>,
    /// Client IP address (optional).
    pub client_ip: Option<String>,
    /// Client User-Agent (optional).
    pub user_agent: Option<String>,
}
