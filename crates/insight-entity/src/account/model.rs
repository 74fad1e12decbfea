//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A login-capable identity in the portal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// bcrypt password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// First name (optional).
    pub first_name: Option<String>,
    /// Last name (optional).
    pub last_name: Option<String>,
    /// Whether the account may log in. Inactive accounts are denied with
    /// the same generic message as a bad password.
    pub active: bool,
    /// Number of consecutive failed login attempts.
    pub failed_login_count: i32,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// First and last name joined with a space, or `None` when both are empty.
    pub fn full_name(&self) -> Option<String> {
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() { None } else { Some(joined) }
    }
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// First name (optional).
    pub first_name: Option<String>,
    /// Last name (optional).
    pub last_name: Option<String>,
    /// Initial active flag.
    pub active: bool,
}

/// Data for updating an existing account. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAccount {
    /// New email address.
    pub email: Option<String>,
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New active flag.
    pub active: Option<bool>,
    /// New pre-hashed password.
    pub password_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(first: Option<&str>, last: Option<&str>) -> Account {
        Account {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: String::new(),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            active: true,
            failed_login_count: 0,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_name_joins_parts() {
        assert_eq!(
            account(Some("Alice"), Some("Smith")).full_name().as_deref(),
            Some("Alice Smith")
        );
        assert_eq!(
            account(Some("Alice"), None).full_name().as_deref(),
            Some("Alice")
        );
        assert_eq!(account(None, None).full_name(), None);
        assert_eq!(account(Some(""), Some("")).full_name(), None);
    }
}
