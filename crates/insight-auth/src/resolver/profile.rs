//! Resolved access profile types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use insight_core::error::{AppError, ErrorKind};
use insight_entity::role::WILDCARD_RESOURCE;

/// A report the profile holder may open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAccess {
    /// Stable report code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Frontend route serving the report.
    pub route: String,
}

/// The flattened, resolved view of what an account may do and see.
///
/// Produced once at login and cached in the session payload; it is a
/// snapshot, not a live view of the role graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthProfile {
    /// The authenticated account.
    pub account_id: Uuid,
    /// Account username.
    pub username: String,
    /// Account email.
    pub email: String,
    /// Display name assembled from first/last name, if either is set.
    pub full_name: Option<String>,
    /// Active role names, sorted, deduplicated across direct and
    /// group-conferred assignment.
    pub roles: Vec<String>,
    /// Active group names, sorted.
    pub groups: Vec<String>,
    /// Merged resource→actions map; action lists are sorted and
    /// deduplicated.
    pub permissions: BTreeMap<String, Vec<String>>,
    /// Visible reports, sorted by display name (code where the name is
    /// empty).
    pub reports: Vec<ReportAccess>,
}

impl AuthProfile {
    /// Whether the profile allows `action` on `resource`, either directly
    /// or through the `"*"` wildcard resource.
    pub fn permits(&self, resource: &str, action: &str) -> bool {
        let allowed = |res: &str| {
            self.permissions
                .get(res)
                .is_some_and(|actions| actions.iter().any(|a| a == action))
        };
        allowed(resource) || allowed(WILDCARD_RESOURCE)
    }

    /// Whether the profile grants visibility of the report with `code`.
    pub fn can_view_report(&self, code: &str) -> bool {
        self.reports.iter().any(|r| r.code == code)
    }

    /// Serializes the profile into a session payload object.
    pub fn to_session_data(&self) -> Result<serde_json::Value, AppError> {
        serde_json::to_value(self).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                "Failed to serialize access profile",
                e,
            )
        })
    }

    /// Restores a profile from a session payload, if one was stored.
    pub fn from_session_data(data: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(data.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with(permissions: BTreeMap<String, Vec<String>>) -> AuthProfile {
        AuthProfile {
            account_id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            full_name: None,
            roles: vec![],
            groups: vec![],
            permissions,
            reports: vec![],
        }
    }

    #[test]
    fn test_permits_direct_resource() {
        let mut perms = BTreeMap::new();
        perms.insert("dashboard".to_string(), vec!["read".to_string()]);
        let profile = profile_with(perms);
        assert!(profile.permits("dashboard", "read"));
        assert!(!profile.permits("dashboard", "write"));
        assert!(!profile.permits("reports", "read"));
    }

    #[test]
    fn test_permits_wildcard_resource() {
        let mut perms = BTreeMap::new();
        perms.insert("*".to_string(), vec!["read".to_string()]);
        let profile = profile_with(perms);
        assert!(profile.permits("anything", "read"));
        assert!(!profile.permits("anything", "write"));
    }

    #[test]
    fn test_session_data_roundtrip() {
        let mut perms = BTreeMap::new();
        perms.insert("reports".to_string(), vec!["read".to_string()]);
        let mut profile = profile_with(perms);
        profile.reports.push(ReportAccess {
            code: "sales".into(),
            name: "Sales".into(),
            route: "/reports/sales".into(),
        });

        let data = profile.to_session_data().unwrap();
        assert_eq!(data["username"], "alice");
        let restored = AuthProfile::from_session_data(&data).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn test_from_session_data_rejects_foreign_payload() {
        let data = serde_json::json!({"theme": "dark"});
        assert!(AuthProfile::from_session_data(&data).is_none());
    }
}
