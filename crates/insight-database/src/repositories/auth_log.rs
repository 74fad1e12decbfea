//! Auth log repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use insight_core::error::{AppError, ErrorKind};
use insight_core::result::AppResult;
use insight_entity::audit::{AuthLogEntry, CreateAuthLogEntry};

/// Repository for the append-only auth log.
#[derive(Debug, Clone)]
pub struct AuthLogRepository {
    pool: PgPool,
}

impl AuthLogRepository {
    /// Create a new auth log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a new entry. Entries are never updated or deleted.
    pub async fn append(&self, entry: &CreateAuthLogEntry) -> AppResult<AuthLogEntry> {
        sqlx::query_as::<_, AuthLogEntry>(
            "INSERT INTO auth_log (id, account_id, username, action, success, error, client_ip, user_agent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(entry.account_id)
        .bind(&entry.username)
        .bind(&entry.action)
        .bind(entry.success)
        .bind(&entry.error)
        .bind(&entry.client_ip)
        .bind(&entry.user_agent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append auth log", e))
    }

    /// Most recent entries, newest first.
    pub async fn recent(&self, limit: i64) -> AppResult<Vec<AuthLogEntry>> {
        sqlx::query_as::<_, AuthLogEntry>(
            "SELECT * FROM auth_log ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list auth log", e))
    }

    /// Entries for one account, newest first.
    pub async fn for_account(&self, account_id: Uuid, limit: i64) -> AppResult<Vec<AuthLogEntry>> {
        sqlx::query_as::<_, AuthLogEntry>(
            "SELECT * FROM auth_log WHERE account_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(account_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list account auth log", e)
        })
    }
}
