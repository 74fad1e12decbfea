//! # insight-admin
//!
//! Administrative management of accounts, roles, groups, and reports.
//! Services here compose the database repositories into the operations
//! the admin API exposes; all of them return flattened summary views
//! rather than raw entity rows.

pub mod audit;
pub mod group;
pub mod report;
pub mod role;
pub mod summary;
pub mod user;

pub use audit::AuditService;
pub use group::{CreateGroupRequest, GroupAdminService, UpdateGroupRequest};
pub use report::{CreateReportRequest, ReportAdminService};
pub use role::{CreateRoleRequest, RoleAdminService, UpdateRoleRequest};
pub use summary::{GroupSummary, ReportSummary, RoleSummary, UserSummary};
pub use user::{CreateUserRequest, UpdateUserRequest, UserAdminService};
