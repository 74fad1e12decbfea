//! Resource/action permission maps.
//!
//! A permission is "may perform ACTION on RESOURCE". Each role carries a
//! JSONB map from resource name to a set of allowed actions. The resource
//! `"*"` is a wildcard matching any resource name for the listed actions.

use std::collections::{BTreeMap, BTreeSet};

/// The wildcard resource name matching every resource.
pub const WILDCARD_RESOURCE: &str = "*";

/// Mapping from resource name to the set of allowed actions.
///
/// Ordered containers so serialized output is deterministic and action
/// lists come out sorted.
pub type PermissionMap = BTreeMap<String, BTreeSet<String>>;

/// Normalize a raw resource→actions mapping: empty action names and
/// resources left with no actions are dropped, duplicates collapse.
pub fn normalize_permissions<R, A, I>(raw: I) -> PermissionMap
where
    I: IntoIterator<Item = (R, Vec<A>)>,
    R: Into<String>,
    A: Into<String>,
{
    let mut normalized = PermissionMap::new();
    for (resource, actions) in raw {
        let actions: BTreeSet<String> = actions
            .into_iter()
            .map(Into::into)
            .filter(|a| !a.is_empty())
            .collect();
        if !actions.is_empty() {
            normalized.insert(resource.into(), actions);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_empty_actions_and_resources() {
        let normalized = normalize_permissions(vec![
            ("dashboard", vec!["read", "", "read"]),
            ("reports", Vec::<&str>::new()),
        ]);
        assert_eq!(normalized.len(), 1);
        assert_eq!(
            normalized["dashboard"].iter().collect::<Vec<_>>(),
            vec!["read"]
        );
    }

    #[test]
    fn test_normalize_dedupes_and_sorts() {
        let normalized = normalize_permissions(vec![("reports", vec!["write", "read", "write"])]);
        let actions: Vec<_> = normalized["reports"].iter().cloned().collect();
        assert_eq!(actions, vec!["read".to_string(), "write".to_string()]);
    }
}
