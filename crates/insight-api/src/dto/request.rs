//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Query parameters for admin listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    /// Include inactive records (default: false).
    #[serde(default)]
    pub include_inactive: bool,
}

/// Role assignment body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRoleRequest {
    /// Role to assign.
    pub role_id: Uuid,
}

/// Group membership body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignGroupRequest {
    /// Group to join.
    pub group_id: Uuid,
}

/// Report grant body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignReportRequest {
    /// Report to grant.
    pub report_id: Uuid,
    /// Whether the grant confers visibility (default: true).
    #[serde(default = "default_can_view")]
    pub can_view: bool,
}

fn default_can_view() -> bool {
    true
}

/// Full replacement of a role's permission map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePermissionsRequest {
    /// Resource to allowed-actions mapping.
    pub permissions: std::collections::HashMap<String, Vec<String>>,
}

/// Query parameters for the audit log listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogParams {
    /// Maximum number of entries to return (default: 100).
    #[serde(default = "default_audit_limit")]
    pub limit: i64,
}

fn default_audit_limit() -> i64 {
    100
}
