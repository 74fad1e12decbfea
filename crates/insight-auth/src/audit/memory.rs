//! In-memory auth log sink for tests and single-process setups.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use insight_core::error::AppError;
use insight_entity::audit::CreateAuthLogEntry;

use super::sink::AuthLogSink;

/// Sink collecting audit entries in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuthLogSink {
    entries: Arc<Mutex<Vec<CreateAuthLogEntry>>>,
}

impl MemoryAuthLogSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything appended so far.
    pub async fn entries(&self) -> Vec<CreateAuthLogEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl AuthLogSink for MemoryAuthLogSink {
    async fn append(&self, entry: CreateAuthLogEntry) -> Result<(), AppError> {
        self.entries.lock().await.push(entry);
        Ok(())
    }
}
