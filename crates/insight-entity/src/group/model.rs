//! Group entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named bundle of roles applied to all member accounts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    /// Unique group identifier.
    pub id: Uuid,
    /// Unique group name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Whether the group's roles are inherited by its members. An inactive
    /// group keeps its memberships but confers nothing.
    pub active: bool,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
    /// When the group was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroup {
    /// Unique group name.
    pub name: String,
    /// Description (optional).
    pub description: Option<String>,
    /// Initial active flag.
    pub active: bool,
}

/// Data for updating an existing group. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGroup {
    /// New group name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New active flag.
    pub active: Option<bool>,
}
