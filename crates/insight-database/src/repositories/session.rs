//! Session repository implementation.
//!
//! Each operation runs in its own short-lived statement. There is no
//! version column: concurrent saves for the same token are last-write-wins
//! on `data`, while deactivation is safe to apply redundantly.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use insight_core::error::{AppError, ErrorKind};
use insight_core::result::AppResult;
use insight_entity::session::SessionRecord;

/// Repository for session rows keyed by opaque token.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a session row by token, live or not.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<SessionRecord>> {
        sqlx::query_as::<_, SessionRecord>("SELECT * FROM sessions WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find session by token", e)
            })
    }

    /// Insert or refresh the row for a token.
    pub async fn upsert(&self, record: &SessionRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sessions (token, account_id, data, client_ip, user_agent, expires_at, active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (token) DO UPDATE SET \
                account_id = EXCLUDED.account_id, \
                data = EXCLUDED.data, \
                client_ip = EXCLUDED.client_ip, \
                user_agent = EXCLUDED.user_agent, \
                expires_at = EXCLUDED.expires_at, \
                active = EXCLUDED.active",
        )
        .bind(&record.token)
        .bind(record.account_id)
        .bind(&record.data)
        .bind(&record.client_ip)
        .bind(&record.user_agent)
        .bind(record.expires_at)
        .bind(record.active)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert session", e))?;
        Ok(())
    }

    /// Tombstone the row for a token: `active=false`, `expires_at=now`.
    /// Idempotent; a missing row is a no-op. Shared by the read path
    /// (stale-row tombstoning) and the write path (logout/anonymous save).
    /// Returns whether a row was touched.
    pub async fn expire_now(&self, token: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE sessions SET active = FALSE, expires_at = $2 WHERE token = $1")
                .bind(token)
                .bind(now)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to expire session", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete tombstoned rows whose expiry is older than the cutoff.
    /// Returns the number of rows removed.
    pub async fn purge_expired(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM sessions WHERE active = FALSE AND expires_at < $1")
                .bind(cutoff)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to purge sessions", e)
                })?;
        Ok(result.rows_affected())
    }
}
