//! In-memory session backend for tests and single-process setups.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use insight_core::error::AppError;
use insight_entity::session::SessionRecord;

use super::backend::SessionBackend;

/// Backend holding session rows in a mutex-guarded map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionBackend {
    rows: Arc<Mutex<HashMap<String, SessionRecord>>>,
}

impl MemorySessionBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, live or tombstoned.
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    /// Whether no rows are stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }

    /// Snapshot of one row, if present.
    pub async fn get(&self, token: &str) -> Option<SessionRecord> {
        self.rows.lock().await.get(token).cloned()
    }

    /// Seeds a row directly, bypassing the lifecycle.
    pub async fn put(&self, record: SessionRecord) {
        self.rows.lock().await.insert(record.token.clone(), record);
    }
}

#[async_trait]
impl SessionBackend for MemorySessionBackend {
    async fn find_by_token(&self, token: &str) -> Result<Option<SessionRecord>, AppError> {
        Ok(self.rows.lock().await.get(token).cloned())
    }

    async fn upsert(&self, record: &SessionRecord) -> Result<(), AppError> {
        let mut rows = self.rows.lock().await;
        match rows.get_mut(&record.token) {
            Some(existing) => {
                // created_at survives refreshes, everything else is replaced.
                let created_at = existing.created_at;
                *existing = record.clone();
                existing.created_at = created_at;
            }
            None => {
                rows.insert(record.token.clone(), record.clone());
            }
        }
        Ok(())
    }

    async fn expire_now(&self, token: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        if let Some(row) = self.rows.lock().await.get_mut(token) {
            row.active = false;
            row.expires_at = now;
            return Ok(true);
        }
        Ok(false)
    }
}
