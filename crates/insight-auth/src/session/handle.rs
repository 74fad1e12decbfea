//! In-flight session state.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::{Map, Value};
use uuid::Uuid;

/// A session as seen by request handling code: a token, the authenticated
/// account (if any), and a mutable attribute bag. Nothing here touches the
/// database; persistence happens when the store saves the handle.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    /// Opaque session token, 32 lowercase hex characters.
    pub token: String,
    /// The authenticated account. `None` marks the session for clearing
    /// on the next save.
    pub account_id: Option<Uuid>,
    /// Arbitrary JSON attributes persisted with the session.
    pub data: Map<String, Value>,
    /// Explicit absolute expiry. When `None`, the store applies its
    /// rolling TTL on save.
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether this handle was created fresh rather than resumed from a
    /// stored row.
    pub is_new: bool,
}

impl SessionHandle {
    /// Creates a fresh anonymous session with a newly generated token.
    pub fn new() -> Self {
        Self {
            token: generate_token(),
            account_id: None,
            data: Map::new(),
            expires_at: None,
            is_new: true,
        }
    }

    /// Reconstructs a handle from a stored row's fields.
    pub fn resumed(token: String, account_id: Option<Uuid>, data: Map<String, Value>) -> Self {
        Self {
            token,
            account_id,
            data,
            expires_at: None,
            is_new: false,
        }
    }

    /// Replaces the token with a freshly generated one. Called on login so
    /// a token handed out before authentication never names an
    /// authenticated session.
    pub fn rotate_token(&mut self) {
        self.token = generate_token();
        self.is_new = true;
    }

    /// Reads one attribute.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Sets one attribute.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// Removes one attribute, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Drops the account binding and all attributes. The next save
    /// tombstones the stored row.
    pub fn clear(&mut self) {
        self.account_id = None;
        self.data.clear();
        self.expires_at = None;
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a 128-bit random token as lowercase hex.
fn generate_token() -> String {
    let bits: u128 = rand::rng().random();
    format!("{bits:032x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_handle_is_anonymous() {
        let handle = SessionHandle::new();
        assert!(handle.is_new);
        assert!(handle.account_id.is_none());
        assert!(handle.data.is_empty());
        assert!(handle.expires_at.is_none());
        assert_eq!(handle.token.len(), 32);
        assert!(handle.token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_rotate_token_changes_token() {
        let mut handle = SessionHandle::resumed("a".repeat(32), None, Map::new());
        assert!(!handle.is_new);
        let before = handle.token.clone();
        handle.rotate_token();
        assert_ne!(handle.token, before);
        assert!(handle.is_new);
    }

    #[test]
    fn test_clear_drops_account_and_data() {
        let mut handle = SessionHandle::new();
        handle.account_id = Some(Uuid::new_v4());
        handle.expires_at = Some(Utc::now());
        handle.insert("theme", Value::String("dark".into()));
        handle.clear();
        assert!(handle.account_id.is_none());
        assert!(handle.data.is_empty());
        assert!(handle.expires_at.is_none());
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = SessionHandle::new();
        let b = SessionHandle::new();
        assert_ne!(a.token, b.token);
    }
}
