//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::permissions::PermissionMap;

/// A named bundle of resource/action permissions and report-view grants.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Unique role name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Whether the role contributes to permission resolution. Inactive
    /// roles stay attached but are functionally inert.
    pub active: bool,
    /// When set, accounts holding this role see every active report in the
    /// system regardless of explicit grants. Seeded onto the admin role;
    /// the resolver never compares role names.
    pub grants_all_reports: bool,
    /// Resource→actions permission map (JSONB).
    pub permissions: Json<PermissionMap>,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    /// Unique role name.
    pub name: String,
    /// Description (optional).
    pub description: Option<String>,
    /// Normalized permission map.
    pub permissions: PermissionMap,
    /// All-reports capability flag.
    pub grants_all_reports: bool,
    /// Initial active flag.
    pub active: bool,
}

/// Data for updating an existing role. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRole {
    /// New role name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New active flag.
    pub active: Option<bool>,
    /// Replacement permission map.
    pub permissions: Option<PermissionMap>,
    /// New all-reports capability flag.
    pub grants_all_reports: Option<bool>,
}
