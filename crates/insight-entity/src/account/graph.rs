//! Eagerly-loaded account graph used as resolver input.
//!
//! The graph is fully materialized before resolution so the permission
//! resolver never touches the database: an account, its directly attached
//! roles (each with its report grants), and its groups (each with their own
//! roles and report grants).

use serde::{Deserialize, Serialize};

use crate::group::Group;
use crate::report::Report;
use crate::role::Role;

use super::model::Account;

/// A role together with its report-view grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleGrants {
    /// The role itself.
    pub role: Role,
    /// Report grants attached to the role. Carries revoked (`can_view=false`)
    /// grants too; the resolver filters them out.
    pub reports: Vec<ReportGrant>,
}

/// A single role→report grant row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportGrant {
    /// Whether the grant is currently in force. `false` revokes visibility
    /// without losing the grant row.
    pub can_view: bool,
    /// The granted report.
    pub report: Report,
}

/// A group together with the roles it confers on its members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRoles {
    /// The group itself.
    pub group: Group,
    /// Roles granted by the group.
    pub roles: Vec<RoleGrants>,
}

/// An account with its complete role/group/report graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountGraph {
    /// The account row.
    pub account: Account,
    /// Roles directly attached to the account.
    pub roles: Vec<RoleGrants>,
    /// Groups the account belongs to, with their roles.
    pub groups: Vec<GroupRoles>,
}
