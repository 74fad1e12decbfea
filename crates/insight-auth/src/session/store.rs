//! Session load/save lifecycle over a [`SessionBackend`].

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use insight_core::config::SessionConfig;
use insight_core::error::AppError;
use insight_entity::session::SessionRecord;

use crate::context::ClientContext;

use super::backend::SessionBackend;
use super::handle::SessionHandle;

/// Result of loading a session from an incoming token.
#[derive(Debug)]
pub struct LoadedSession {
    /// The handle to use for the rest of the request. Fresh when the
    /// token was missing, unknown, or stale.
    pub handle: SessionHandle,
    /// A stale row that was tombstoned during this load, if any.
    pub expired: Option<SessionRecord>,
}

/// What a save did, and what the caller should do with the cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No live row remains; clear any session cookie.
    Cleared,
    /// The row was written; set the cookie to the handle's token with
    /// this expiry.
    Persisted {
        /// The refreshed absolute expiry.
        expires_at: DateTime<Utc>,
    },
}

/// Owns the session lifecycle rules: what counts as live, when rows are
/// tombstoned, and how saves refresh the expiry.
#[derive(Debug, Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    config: SessionConfig,
}

impl SessionStore {
    /// Creates a store over the given backend.
    pub fn new(backend: Arc<dyn SessionBackend>, config: SessionConfig) -> Self {
        Self { backend, config }
    }

    /// The configured cookie name.
    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// Whether session cookies should be marked `Secure`.
    pub fn cookie_secure(&self) -> bool {
        self.config.cookie_secure
    }

    /// Loads the session named by an incoming cookie token.
    ///
    /// An unknown token yields a fresh anonymous handle. A known but
    /// stale row (inactive or past expiry) is tombstoned on the spot so
    /// later writes cannot revive it, and also yields a fresh handle.
    pub async fn load(&self, token: Option<&str>) -> Result<LoadedSession, AppError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(LoadedSession {
                handle: SessionHandle::new(),
                expired: None,
            });
        };

        let Some(record) = self.backend.find_by_token(token).await? else {
            return Ok(LoadedSession {
                handle: SessionHandle::new(),
                expired: None,
            });
        };

        let now = Utc::now();
        if !record.is_live(now) {
            self.backend.expire_now(token, now).await?;
            debug!(token = %token, "tombstoned stale session on read");
            return Ok(LoadedSession {
                handle: SessionHandle::new(),
                expired: Some(record),
            });
        }

        let data = match record.data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(LoadedSession {
            handle: SessionHandle::resumed(record.token, record.account_id, data),
            expired: None,
        })
    }

    /// Persists a handle.
    ///
    /// An anonymous handle tombstones any stored row for its token and
    /// reports [`SaveOutcome::Cleared`]. An authenticated handle is
    /// upserted with its expiry pushed one TTL past now, so every save
    /// extends the session; a handle carrying an explicit expiry keeps
    /// that instead.
    pub async fn save(
        &self,
        handle: &SessionHandle,
        client: &ClientContext,
    ) -> Result<SaveOutcome, AppError> {
        let now = Utc::now();

        let Some(account_id) = handle.account_id else {
            self.backend.expire_now(&handle.token, now).await?;
            return Ok(SaveOutcome::Cleared);
        };

        let expires_at = handle
            .expires_at
            .unwrap_or_else(|| now + Duration::seconds(self.config.ttl_seconds()));
        let record = SessionRecord {
            token: handle.token.clone(),
            account_id: Some(account_id),
            data: Value::Object(handle.data.clone()),
            client_ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
            expires_at,
            active: true,
            created_at: now,
        };
        self.backend.upsert(&record).await?;
        Ok(SaveOutcome::Persisted { expires_at })
    }

    /// Tombstones the row for a token. Idempotent; returns whether a row
    /// was touched.
    pub async fn deactivate(&self, token: &str) -> Result<bool, AppError> {
        self.backend.expire_now(token, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::memory::MemorySessionBackend;
    use serde_json::json;
    use uuid::Uuid;

    fn store(backend: MemorySessionBackend) -> SessionStore {
        SessionStore::new(Arc::new(backend), SessionConfig::default())
    }

    fn live_record(token: &str, account_id: Uuid) -> SessionRecord {
        SessionRecord {
            token: token.to_string(),
            account_id: Some(account_id),
            data: json!({"theme": "dark"}),
            client_ip: None,
            user_agent: None,
            expires_at: Utc::now() + Duration::minutes(10),
            active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_load_without_token_yields_fresh_handle() {
        let s = store(MemorySessionBackend::new());
        let loaded = s.load(None).await.unwrap();
        assert!(loaded.handle.is_new);
        assert!(loaded.expired.is_none());
    }

    #[tokio::test]
    async fn test_load_unknown_token_yields_fresh_handle() {
        let s = store(MemorySessionBackend::new());
        let loaded = s.load(Some("0123456789abcdef0123456789abcdef")).await.unwrap();
        assert!(loaded.handle.is_new);
        assert_ne!(loaded.handle.token, "0123456789abcdef0123456789abcdef");
    }

    #[tokio::test]
    async fn test_load_live_session_resumes_data() {
        let backend = MemorySessionBackend::new();
        let account_id = Uuid::new_v4();
        backend.put(live_record("tok-live", account_id)).await;
        let s = store(backend);

        let loaded = s.load(Some("tok-live")).await.unwrap();
        assert!(!loaded.handle.is_new);
        assert_eq!(loaded.handle.account_id, Some(account_id));
        assert_eq!(loaded.handle.get("theme"), Some(&json!("dark")));
    }

    #[tokio::test]
    async fn test_load_expired_session_tombstones_row() {
        let backend = MemorySessionBackend::new();
        let mut record = live_record("tok-old", Uuid::new_v4());
        record.expires_at = Utc::now() - Duration::minutes(1);
        backend.put(record).await;
        let s = store(backend.clone());

        let loaded = s.load(Some("tok-old")).await.unwrap();
        assert!(loaded.handle.is_new);
        assert!(loaded.expired.is_some());

        let row = backend.get("tok-old").await.unwrap();
        assert!(!row.active);
        assert!(row.expires_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_load_inactive_session_yields_fresh_handle() {
        let backend = MemorySessionBackend::new();
        let mut record = live_record("tok-dead", Uuid::new_v4());
        record.active = false;
        backend.put(record).await;
        let s = store(backend);

        let loaded = s.load(Some("tok-dead")).await.unwrap();
        assert!(loaded.handle.is_new);
    }

    #[tokio::test]
    async fn test_save_authenticated_handle_refreshes_expiry() {
        let backend = MemorySessionBackend::new();
        let s = store(backend.clone());
        let mut handle = SessionHandle::new();
        handle.account_id = Some(Uuid::new_v4());
        handle.insert("theme", json!("dark"));

        let before = Utc::now();
        let outcome = s.save(&handle, &ClientContext::default()).await.unwrap();
        let SaveOutcome::Persisted { expires_at } = outcome else {
            panic!("expected a persisted session");
        };
        assert!(expires_at > before + Duration::minutes(29));

        let row = backend.get(&handle.token).await.unwrap();
        assert!(row.active);
        assert_eq!(row.data["theme"], json!("dark"));
    }

    #[tokio::test]
    async fn test_save_keeps_explicit_handle_expiry() {
        let backend = MemorySessionBackend::new();
        let s = store(backend.clone());
        let mut handle = SessionHandle::new();
        handle.account_id = Some(Uuid::new_v4());
        let pinned = Utc::now() + Duration::hours(6);
        handle.expires_at = Some(pinned);

        let outcome = s.save(&handle, &ClientContext::default()).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Persisted { expires_at: pinned });
        assert_eq!(backend.get(&handle.token).await.unwrap().expires_at, pinned);
    }

    #[tokio::test]
    async fn test_save_anonymous_handle_clears_row() {
        let backend = MemorySessionBackend::new();
        let account_id = Uuid::new_v4();
        backend.put(live_record("tok-gone", account_id)).await;
        let s = store(backend.clone());

        let handle = SessionHandle::resumed("tok-gone".into(), None, Map::new());
        let outcome = s.save(&handle, &ClientContext::default()).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Cleared);

        let row = backend.get("tok-gone").await.unwrap();
        assert!(!row.active);
    }

    #[tokio::test]
    async fn test_save_anonymous_handle_without_row_is_noop() {
        let backend = MemorySessionBackend::new();
        let s = store(backend.clone());
        let handle = SessionHandle::new();
        let outcome = s.save(&handle, &ClientContext::default()).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Cleared);
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_deactivate_is_idempotent() {
        let backend = MemorySessionBackend::new();
        backend.put(live_record("tok-bye", Uuid::new_v4())).await;
        let s = store(backend.clone());

        assert!(s.deactivate("tok-bye").await.unwrap());
        assert!(s.deactivate("tok-bye").await.unwrap());
        assert!(!s.deactivate("never-existed").await.unwrap());

        assert!(!backend.get("tok-bye").await.unwrap().active);
    }

    #[tokio::test]
    async fn test_tombstoned_row_cannot_be_resumed() {
        let backend = MemorySessionBackend::new();
        let mut record = live_record("tok-replay", Uuid::new_v4());
        record.expires_at = Utc::now() - Duration::minutes(1);
        backend.put(record).await;
        let s = store(backend);

        // First read tombstones, second read sees the tombstone.
        let first = s.load(Some("tok-replay")).await.unwrap();
        assert!(first.expired.is_some());
        let second = s.load(Some("tok-replay")).await.unwrap();
        assert!(second.handle.is_new);
        assert!(second.expired.is_none());
    }
}
