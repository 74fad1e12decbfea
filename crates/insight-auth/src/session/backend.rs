//! Session persistence trait and the SQL-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use insight_core::error::AppError;
use insight_database::repositories::session::SessionRepository;
use insight_entity::session::SessionRecord;

/// Storage operations for session rows.
///
/// Three operations cover the whole lifecycle; there is deliberately no
/// delete, because stale rows are tombstoned via [`expire_now`].
///
/// [`expire_now`]: SessionBackend::expire_now
#[async_trait]
pub trait SessionBackend: Send + Sync + std::fmt::Debug {
    /// Looks up a row by token.
    async fn find_by_token(&self, token: &str) -> Result<Option<SessionRecord>, AppError>;

    /// Inserts or fully refreshes the row for the record's token.
    async fn upsert(&self, record: &SessionRecord) -> Result<(), AppError>;

    /// Tombstones a row: `active=false`, `expires_at=now`. Idempotent, and
    /// a no-op for tokens with no row. Returns whether a row was touched.
    async fn expire_now(&self, token: &str, now: DateTime<Utc>) -> Result<bool, AppError>;
}

/// Backend writing to the `sessions` table.
#[derive(Debug, Clone)]
pub struct SqlSessionBackend {
    repo: Arc<SessionRepository>,
}

impl SqlSessionBackend {
    /// Creates a backend over the given repository.
    pub fn new(repo: Arc<SessionRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl SessionBackend for SqlSessionBackend {
    async fn find_by_token(&self, token: &str) -> Result<Option<SessionRecord>, AppError> {
        self.repo.find_by_token(token).await
    }

    async fn upsert(&self, record: &SessionRecord) -> Result<(), AppError> {
        self.repo.upsert(record).await
    }

    async fn expire_now(&self, token: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        self.repo.expire_now(token, now).await
    }
}
