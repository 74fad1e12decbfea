//! Flattened summary views returned by the admin services.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use insight_entity::account::{Account, ReportGrant};
use insight_entity::group::Group;
use insight_entity::report::Report;
use insight_entity::role::{PermissionMap, Role};

/// An account with its resolved role and group memberships.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// Account id.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Display name, if any name parts are set.
    pub full_name: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Whether the account may log in.
    pub active: bool,
    /// Active role names, sorted.
    pub roles: Vec<String>,
    /// Active group names, sorted.
    pub groups: Vec<String>,
    /// All attached role ids, active or not.
    pub role_ids: Vec<Uuid>,
    /// All attached group ids, active or not.
    pub group_ids: Vec<Uuid>,
}

impl UserSummary {
    /// Builds a summary from an account and its attached roles/groups.
    pub fn build(account: &Account, roles: &[Role], groups: &[Group]) -> Self {
        let mut role_names: Vec<String> = roles
            .iter()
            .filter(|r| r.active)
            .map(|r| r.name.clone())
            .collect();
        role_names.sort();
        role_names.dedup();
        let mut group_names: Vec<String> = groups
            .iter()
            .filter(|g| g.active)
            .map(|g| g.name.clone())
            .collect();
        group_names.sort();
        group_names.dedup();
        let mut role_ids: Vec<Uuid> = roles.iter().map(|r| r.id).collect();
        role_ids.sort();
        let mut group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
        group_ids.sort();

        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            full_name: account.full_name(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            active: account.active,
            roles: role_names,
            groups: group_names,
            role_ids,
            group_ids,
        }
    }
}

/// A role with its permission map and visible report codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleSummary {
    /// Role id.
    pub id: Uuid,
    /// Role name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Whether the role contributes to resolution.
    pub active: bool,
    /// Whether the role sees every active report.
    pub grants_all_reports: bool,
    /// Resource→actions permission map.
    pub permissions: PermissionMap,
    /// Codes of reports the role can currently see, sorted.
    pub reports: Vec<String>,
    /// Ids of those reports, sorted.
    pub report_ids: Vec<Uuid>,
}

impl RoleSummary {
    /// Builds a summary from a role and its report grants. Revoked grants
    /// and inactive reports are hidden; when the role carries the
    /// all-reports capability, `catalog` contributes every active report
    /// as well.
    pub fn build(role: &Role, grants: &[ReportGrant], catalog: &[Report]) -> Self {
        let mut codes: Vec<String> = Vec::new();
        let mut ids: Vec<Uuid> = Vec::new();
        for grant in grants {
            if grant.can_view && grant.report.active {
                codes.push(grant.report.code.clone());
                ids.push(grant.report.id);
            }
        }
        if role.grants_all_reports {
            for report in catalog {
                if report.active {
                    codes.push(report.code.clone());
                    ids.push(report.id);
                }
            }
        }
        codes.sort();
        codes.dedup();
        ids.sort();
        ids.dedup();

        Self {
            id: role.id,
            name: role.name.clone(),
            description: role.description.clone(),
            active: role.active,
            grants_all_reports: role.grants_all_reports,
            permissions: role.permissions.0.clone(),
            reports: codes,
            report_ids: ids,
        }
    }
}

/// A group with the roles it confers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group id.
    pub id: Uuid,
    /// Group name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Whether membership contributes to resolution.
    pub active: bool,
    /// Active role names, sorted.
    pub roles: Vec<String>,
    /// All attached role ids.
    pub role_ids: Vec<Uuid>,
}

impl GroupSummary {
    /// Builds a summary from a group and its attached roles.
    pub fn build(group: &Group, roles: &[Role]) -> Self {
        let mut role_names: Vec<String> = roles
            .iter()
            .filter(|r| r.active)
            .map(|r| r.name.clone())
            .collect();
        role_names.sort();
        role_names.dedup();
        let mut role_ids: Vec<Uuid> = roles.iter().map(|r| r.id).collect();
        role_ids.sort();

        Self {
            id: group.id,
            name: group.name.clone(),
            description: group.description.clone(),
            active: group.active,
            roles: role_names,
            role_ids,
        }
    }
}

/// A report catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Report id.
    pub id: Uuid,
    /// Stable code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Frontend route.
    pub route: String,
    /// Whether the report is visible anywhere.
    pub active: bool,
}

impl From<&Report> for ReportSummary {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id,
            code: report.code.clone(),
            name: report.name.clone(),
            description: report.description.clone(),
            route: report.route.clone(),
            active: report.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;

    fn role(name: &str, active: bool) -> Role {
        Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            permissions: Json(PermissionMap::new()),
            grants_all_reports: false,
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn report(code: &str, active: bool) -> Report {
        Report {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: code.to_uppercase(),
            description: None,
            route: format!("/reports/{code}"),
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn grant(can_view: bool, report: Report) -> ReportGrant {
        ReportGrant { can_view, report }
    }

    #[test]
    fn test_role_summary_filters_revoked_and_inactive() {
        let r = role("viewer", true);
        let grants = vec![
            grant(true, report("sales", true)),
            grant(false, report("ops", true)),
            grant(true, report("legacy", false)),
        ];
        let summary = RoleSummary::build(&r, &grants, &[]);
        assert_eq!(summary.reports, vec!["sales"]);
    }

    #[test]
    fn test_role_summary_all_reports_capability() {
        let mut r = role("admin", true);
        r.grants_all_reports = true;
        let catalog = vec![report("sales", true), report("legacy", false)];
        let summary = RoleSummary::build(&r, &[], &catalog);
        assert_eq!(summary.reports, vec!["sales"]);
    }

    #[test]
    fn test_group_summary_hides_inactive_role_names_keeps_ids() {
        let g = Group {
            id: Uuid::new_v4(),
            name: "analysts".into(),
            description: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let roles = vec![role("analyst", true), role("retired", false)];
        let summary = GroupSummary::build(&g, &roles);
        assert_eq!(summary.roles, vec!["analyst"]);
        assert_eq!(summary.role_ids.len(), 2);
    }
}
