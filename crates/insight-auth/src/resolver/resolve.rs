//! Pure resolution of an account graph into an [`AuthProfile`].

use std::collections::{BTreeMap, BTreeSet};

use insight_entity::account::{AccountGraph, RoleGrants};
use insight_entity::report::Report;
use insight_entity::role::PermissionMap;

use super::profile::{AuthProfile, ReportAccess};

/// Merges permission maps from every contributing role into a single
/// deduplicated map with sorted action lists. Empty action names and
/// resources left with no actions are dropped.
pub fn merge_permission_maps<'a, I>(maps: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = &'a PermissionMap>,
{
    let mut combined: BTreeMap<String, BTreeSet<&'a str>> = BTreeMap::new();
    for map in maps {
        for (resource, actions) in map {
            let live: Vec<&str> = actions
                .iter()
                .map(String::as_str)
                .filter(|a| !a.is_empty())
                .collect();
            if live.is_empty() {
                continue;
            }
            combined.entry(resource.clone()).or_default().extend(live);
        }
    }
    combined
        .into_iter()
        .map(|(resource, actions)| {
            (resource, actions.into_iter().map(String::from).collect())
        })
        .collect()
}

/// Resolves an account graph into the flattened access profile.
///
/// Inactive roles and groups contribute nothing; an inactive group also
/// silences its roles even when those roles are active. Visibility is
/// additive only, so nothing in one role can revoke what another grants.
/// `all_active_reports` is consulted only when some active role carries
/// the all-reports capability.
pub fn resolve_profile(graph: &AccountGraph, all_active_reports: &[Report]) -> AuthProfile {
    let mut role_names: BTreeSet<&str> = BTreeSet::new();
    let mut group_names: BTreeSet<&str> = BTreeSet::new();
    let mut permission_sources: Vec<&PermissionMap> = Vec::new();
    let mut report_map: BTreeMap<&str, ReportAccess> = BTreeMap::new();
    let mut grants_all = false;

    for grants in &graph.roles {
        grants_all |= absorb_role(
            grants,
            &mut role_names,
            &mut permission_sources,
            &mut report_map,
        );
    }

    for membership in &graph.groups {
        if !membership.group.active {
            continue;
        }
        group_names.insert(membership.group.name.as_str());
        for grants in &membership.roles {
            grants_all |= absorb_role(
                grants,
                &mut role_names,
                &mut permission_sources,
                &mut report_map,
            );
        }
    }

    let permissions = merge_permission_maps(permission_sources);

    if grants_all {
        for report in all_active_reports {
            if !report.active {
                continue;
            }
            report_map
                .entry(report.code.as_str())
                .or_insert_with(|| access_entry(report));
        }
    }

    let mut reports: Vec<ReportAccess> = report_map.into_values().collect();
    reports.sort_by(|a, b| sort_key(a).cmp(sort_key(b)));

    AuthProfile {
        account_id: graph.account.id,
        username: graph.account.username.clone(),
        email: graph.account.email.clone(),
        full_name: graph.account.full_name(),
        roles: role_names.into_iter().map(String::from).collect(),
        groups: group_names.into_iter().map(String::from).collect(),
        permissions,
        reports,
    }
}

/// Folds one active role into the accumulating profile state. Returns
/// whether the role carries the all-reports capability.
fn absorb_role<'a>(
    grants: &'a RoleGrants,
    names: &mut BTreeSet<&'a str>,
    sources: &mut Vec<&'a PermissionMap>,
    reports: &mut BTreeMap<&'a str, ReportAccess>,
) -> bool {
    if !grants.role.active {
        return false;
    }
    names.insert(grants.role.name.as_str());
    sources.push(&grants.role.permissions.0);
    for grant in &grants.reports {
        if !grant.can_view || !grant.report.active {
            continue;
        }
        reports
            .entry(grant.report.code.as_str())
            .or_insert_with(|| access_entry(&grant.report));
    }
    grants.role.grants_all_reports
}

fn access_entry(report: &Report) -> ReportAccess {
    ReportAccess {
        code: report.code.clone(),
        name: report.name.clone(),
        route: report.route.clone(),
    }
}

fn sort_key(access: &ReportAccess) -> &str {
    if access.name.is_empty() {
        &access.code
    } else {
        &access.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use insight_entity::account::{Account, GroupRoles, ReportGrant};
    use insight_entity::group::Group;
    use insight_entity::role::Role;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn account(username: &str) -> Account {
        Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: String::new(),
            first_name: None,
            last_name: None,
            active: true,
            failed_login_count: 0,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn role(name: &str, perms: &[(&str, &[&str])], active: bool) -> Role {
        let mut map = PermissionMap::new();
        for (resource, actions) in perms {
            map.insert(
                resource.to_string(),
                actions.iter().map(|a| a.to_string()).collect(),
            );
        }
        Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            permissions: Json(map),
            grants_all_reports: false,
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn report(code: &str, name: &str, active: bool) -> Report {
        Report {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            description: None,
            route: format!("/reports/{code}"),
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn group(name: &str, active: bool) -> Group {
        Group {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn grants(role: Role, reports: Vec<(bool, Report)>) -> RoleGrants {
        RoleGrants {
            role,
            reports: reports
                .into_iter()
                .map(|(can_view, report)| ReportGrant { can_view, report })
                .collect(),
        }
    }

    fn graph(roles: Vec<RoleGrants>, groups: Vec<GroupRoles>) -> AccountGraph {
        AccountGraph {
            account: account("alice"),
            roles,
            groups,
        }
    }

    #[test]
    fn test_merge_is_additive_and_sorted() {
        let mut a = PermissionMap::new();
        a.insert("reports".into(), ["read"].iter().map(|s| s.to_string()).collect());
        let mut b = PermissionMap::new();
        b.insert(
            "reports".into(),
            ["write", "read"].iter().map(|s| s.to_string()).collect(),
        );
        b.insert("admin".into(), ["manage"].iter().map(|s| s.to_string()).collect());

        let merged = merge_permission_maps([&a, &b]);
        assert_eq!(merged["reports"], vec!["read", "write"]);
        assert_eq!(merged["admin"], vec!["manage"]);
    }

    #[test]
    fn test_merge_drops_empty_entries() {
        let mut a = PermissionMap::new();
        a.insert("empty".into(), BTreeSet::new());
        a.insert("blank".into(), ["".to_string()].into_iter().collect());
        let merged = merge_permission_maps([&a]);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_direct_and_group_roles_combine() {
        let sales = report("sales", "Sales", true);
        let ops = report("ops", "Operations", true);
        let direct = grants(
            role("viewer", &[("reports", &["read"])], true),
            vec![(true, sales)],
        );
        let via_group = grants(
            role("analyst", &[("reports", &["export"])], true),
            vec![(true, ops)],
        );
        let g = graph(
            vec![direct],
            vec![GroupRoles {
                group: group("analysts", true),
                roles: vec![via_group],
            }],
        );

        let profile = resolve_profile(&g, &[]);
        assert_eq!(profile.roles, vec!["analyst", "viewer"]);
        assert_eq!(profile.groups, vec!["analysts"]);
        assert_eq!(profile.permissions["reports"], vec!["export", "read"]);
        let codes: Vec<_> = profile.reports.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["ops", "sales"]);
    }

    #[test]
    fn test_role_reachable_twice_appears_once() {
        let viewer = grants(role("viewer", &[("reports", &["read"])], true), vec![]);
        let same_again = RoleGrants {
            role: viewer.role.clone(),
            reports: vec![],
        };
        let g = graph(
            vec![viewer],
            vec![GroupRoles {
                group: group("analysts", true),
                roles: vec![same_again],
            }],
        );

        let profile = resolve_profile(&g, &[]);
        assert_eq!(profile.roles, vec!["viewer"]);
        assert_eq!(profile.permissions["reports"], vec!["read"]);
    }

    #[test]
    fn test_inactive_role_contributes_nothing() {
        let sales = report("sales", "Sales", true);
        let g = graph(
            vec![grants(
                role("viewer", &[("reports", &["read"])], false),
                vec![(true, sales)],
            )],
            vec![],
        );

        let profile = resolve_profile(&g, &[]);
        assert!(profile.roles.is_empty());
        assert!(profile.permissions.is_empty());
        assert!(profile.reports.is_empty());
    }

    #[test]
    fn test_inactive_group_silences_its_active_roles() {
        let g = graph(
            vec![],
            vec![GroupRoles {
                group: group("analysts", false),
                roles: vec![grants(role("analyst", &[("reports", &["read"])], true), vec![])],
            }],
        );

        let profile = resolve_profile(&g, &[]);
        assert!(profile.groups.is_empty());
        assert!(profile.roles.is_empty());
        assert!(profile.permissions.is_empty());
    }

    #[test]
    fn test_revoked_or_inactive_report_grants_hidden() {
        let revoked = report("sales", "Sales", true);
        let retired = report("legacy", "Legacy", false);
        let g = graph(
            vec![grants(
                role("viewer", &[], true),
                vec![(false, revoked), (true, retired)],
            )],
            vec![],
        );

        let profile = resolve_profile(&g, &[]);
        assert!(profile.reports.is_empty());
    }

    #[test]
    fn test_visibility_is_additive_across_roles() {
        // One role revokes what another grants; the grant wins.
        let sales_a = report("sales", "Sales", true);
        let sales_b = sales_a.clone();
        let g = graph(
            vec![
                grants(role("restricted", &[], true), vec![(false, sales_a)]),
                grants(role("viewer", &[], true), vec![(true, sales_b)]),
            ],
            vec![],
        );

        let profile = resolve_profile(&g, &[]);
        assert!(profile.can_view_report("sales"));
    }

    #[test]
    fn test_all_reports_capability_unions_active_catalog() {
        let mut admin = role("admin", &[("*", &["manage"])], true);
        admin.grants_all_reports = true;
        let catalog = vec![
            report("sales", "Sales", true),
            report("ops", "Operations", true),
            report("legacy", "Legacy", false),
        ];
        let g = graph(vec![grants(admin, vec![])], vec![]);

        let profile = resolve_profile(&g, &catalog);
        let codes: Vec<_> = profile.reports.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["ops", "sales"]);
    }

    #[test]
    fn test_all_reports_capability_on_inactive_role_is_ignored() {
        let mut admin = role("admin", &[], false);
        admin.grants_all_reports = true;
        let catalog = vec![report("sales", "Sales", true)];
        let g = graph(vec![grants(admin, vec![])], vec![]);

        let profile = resolve_profile(&g, &catalog);
        assert!(profile.reports.is_empty());
    }

    #[test]
    fn test_reports_sorted_by_name_falling_back_to_code() {
        let named = report("zz", "Alpha", true);
        let unnamed = report("beta", "", true);
        let g = graph(
            vec![grants(role("viewer", &[], true), vec![(true, unnamed), (true, named)])],
            vec![],
        );

        let profile = resolve_profile(&g, &[]);
        let codes: Vec<_> = profile.reports.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["zz", "beta"]);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let sales = report("sales", "Sales", true);
        let g = graph(
            vec![grants(
                role("viewer", &[("reports", &["read", "export"])], true),
                vec![(true, sales)],
            )],
            vec![],
        );

        let first = resolve_profile(&g, &[]);
        let second = resolve_profile(&g, &[]);
        assert_eq!(first, second);
    }
}
