//! Auth log sink trait and the SQL-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;

use insight_core::error::AppError;
use insight_database::repositories::auth_log::AuthLogRepository;
use insight_entity::audit::CreateAuthLogEntry;

/// Destination for authentication audit events.
#[async_trait]
pub trait AuthLogSink: Send + Sync + std::fmt::Debug {
    /// Appends one audit entry.
    async fn append(&self, entry: CreateAuthLogEntry) -> Result<(), AppError>;
}

/// Sink writing audit entries to the `auth_log` table.
#[derive(Debug, Clone)]
pub struct SqlAuthLogSink {
    repo: Arc<AuthLogRepository>,
}

impl SqlAuthLogSink {
    /// Creates a sink over the given repository.
    pub fn new(repo: Arc<AuthLogRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AuthLogSink for SqlAuthLogSink {
    async fn append(&self, entry: CreateAuthLogEntry) -> Result<(), AppError> {
        self.repo.append(&entry).await.map(|_| ())
    }
}
