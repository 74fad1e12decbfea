//! Read access to the authentication audit log.

use std::sync::Arc;

use uuid::Uuid;

use insight_core::error::AppError;
use insight_database::repositories::auth_log::AuthLogRepository;
use insight_entity::audit::AuthLogEntry;

/// Queries over the auth log for the admin surface.
#[derive(Debug, Clone)]
pub struct AuditService {
    /// Auth log repository.
    log: Arc<AuthLogRepository>,
}

impl AuditService {
    /// Creates a new audit query service.
    pub fn new(log: Arc<AuthLogRepository>) -> Self {
        Self { log }
    }

    /// Most recent entries across all accounts, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<AuthLogEntry>, AppError> {
        self.log.recent(limit.clamp(1, 500)).await
    }

    /// Most recent entries for one account, newest first.
    pub async fn for_account(&self, account_id: Uuid, limit: i64) -> Result<Vec<AuthLogEntry>, AppError> {
        self.log.for_account(account_id, limit.clamp(1, 500)).await
    }
}
