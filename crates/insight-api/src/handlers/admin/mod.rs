//! Admin-only handlers.

use insight_auth::AuthProfile;
use insight_core::error::AppError;

pub mod audit;
pub mod groups;
pub mod reports;
pub mod roles;
pub mod users;

/// Rejects callers whose resolved profile lacks the `admin:read`
/// permission.
pub fn require_admin(profile: &AuthProfile) -> Result<(), AppError> {
    if profile.permits("admin", "read") {
        Ok(())
    } else {
        Err(AppError::forbidden("Administrator access required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn profile_with(permissions: BTreeMap<String, Vec<String>>) -> AuthProfile {
        AuthProfile {
            account_id: Uuid::new_v4(),
            username: "probe".to_string(),
            email: "probe@example.com".to_string(),
            full_name: None,
            roles: vec![],
            groups: vec![],
            permissions,
            reports: vec![],
        }
    }

    #[test]
    fn test_admin_permission_passes_guard() {
        let mut perms = BTreeMap::new();
        perms.insert("admin".to_string(), vec!["read".to_string()]);
        assert!(require_admin(&profile_with(perms)).is_ok());
    }

    #[test]
    fn test_wildcard_resource_passes_guard() {
        let mut perms = BTreeMap::new();
        perms.insert("*".to_string(), vec!["read".to_string()]);
        assert!(require_admin(&profile_with(perms)).is_ok());
    }

    #[test]
    fn test_unrelated_permissions_rejected() {
        let mut perms = BTreeMap::new();
        perms.insert("reports".to_string(), vec!["read".to_string()]);
        let err = require_admin(&profile_with(perms)).unwrap_err();
        assert!(err.is_kind(insight_core::error::ErrorKind::Forbidden));
    }
}
