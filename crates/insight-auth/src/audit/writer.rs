//! Best-effort audit writer.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use insight_entity::audit::CreateAuthLogEntry;

use crate::context::ClientContext;

use super::sink::AuthLogSink;

/// Recorded auth event kinds. Stored as plain strings so ad-hoc reasons
/// (session expiry, admin-forced logout) fit the same column.
pub mod actions {
    /// Credential check, successful or not.
    pub const LOGIN: &str = "login";
    /// User-initiated logout.
    pub const LOGOUT: &str = "logout";
    /// Session tombstoned because its expiry passed.
    pub const SESSION_EXPIRED: &str = "session_expired";
}

/// Writes audit entries through a sink, swallowing sink failures.
///
/// An unauditable login is still a login; the failure is surfaced in the
/// process log instead.
#[derive(Debug, Clone)]
pub struct AuthLogWriter {
    sink: Arc<dyn AuthLogSink>,
}

impl AuthLogWriter {
    /// Creates a writer over the given sink.
    pub fn new(sink: Arc<dyn AuthLogSink>) -> Self {
        Self { sink }
    }

    /// Records one auth event.
    pub async fn record(
        &self,
        account_id: Option<Uuid>,
        username: Option<&str>,
        action: &str,
        success: bool,
        error: Option<&str>,
        client: &ClientContext,
    ) {
        let entry = CreateAuthLogEntry {
            account_id,
            username: username.map(String::from),
            action: action.to_string(),
            success,
            error: error.map(String::from),
            client_ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
        };
        if let Err(e) = self.sink.append(entry).await {
            warn!(action, success, error = %e, "failed to write auth log entry");
        }
    }
}
