//! Admin role management — CRUD, permission maps, and report grants.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use insight_core::error::AppError;
use insight_database::repositories::report::ReportRepository;
use insight_database::repositories::role::RoleRepository;
use insight_entity::report::Report;
use insight_entity::role::{CreateRole, PermissionMap, UpdateRole, normalize_permissions};

use crate::summary::RoleSummary;

/// Request to create a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoleRequest {
    /// Role name (unique).
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Raw resource→actions map; normalized before storage.
    #[serde(default)]
    pub permissions: HashMap<String, Vec<String>>,
    /// Whether the role sees every active report.
    #[serde(default)]
    pub grants_all_reports: bool,
    /// Whether the role contributes to resolution.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Request to update a role. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    /// New role name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New active flag.
    pub active: Option<bool>,
    /// Replacement permission map.
    pub permissions: Option<HashMap<String, Vec<String>>>,
    /// New all-reports flag.
    pub grants_all_reports: Option<bool>,
}

/// Handles administrative role operations.
#[derive(Debug, Clone)]
pub struct RoleAdminService {
    /// Role repository.
    roles: Arc<RoleRepository>,
    /// Report repository, for catalog summaries.
    reports: Arc<ReportRepository>,
}

impl RoleAdminService {
    /// Creates a new admin role service.
    pub fn new(roles: Arc<RoleRepository>, reports: Arc<ReportRepository>) -> Self {
        Self { roles, reports }
    }

    /// Lists roles with their report grants.
    pub async fn list_roles(&self, include_inactive: bool) -> Result<Vec<RoleSummary>, AppError> {
        let roles = self.roles.find_all(include_inactive).await?;
        let catalog = self.reports.find_active().await?;
        let mut summaries = Vec::with_capacity(roles.len());
        for role in &roles {
            let grants = self.roles.report_grants(role.id).await?;
            summaries.push(RoleSummary::build(role, &grants, &catalog));
        }
        Ok(summaries)
    }

    /// Fetches one role summary.
    pub async fn get_role(&self, id: Uuid) -> Result<RoleSummary, AppError> {
        self.summarize(id).await
    }

    /// Creates a role with a normalized permission map.
    pub async fn create_role(&self, req: CreateRoleRequest) -> Result<RoleSummary, AppError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Role name must not be empty"));
        }

        let role = self
            .roles
            .create(&CreateRole {
                name: name.to_string(),
                description: req.description,
                permissions: normalize(req.permissions),
                grants_all_reports: req.grants_all_reports,
                active: req.active,
            })
            .await?;

        info!(role = name, "created role");
        self.summarize(role.id).await
    }

    /// Applies a partial update.
    pub async fn update_role(&self, id: Uuid, req: UpdateRoleRequest) -> Result<RoleSummary, AppError> {
        self.roles
            .update(
                id,
                &UpdateRole {
                    name: req.name.map(|n| n.trim().to_string()),
                    description: req.description,
                    active: req.active,
                    permissions: req.permissions.map(normalize),
                    grants_all_reports: req.grants_all_reports,
                },
            )
            .await?;
        info!(role_id = %id, "updated role");
        self.summarize(id).await
    }

    /// Replaces a role's permission map.
    pub async fn update_permissions(
        &self,
        id: Uuid,
        permissions: HashMap<String, Vec<String>>,
    ) -> Result<RoleSummary, AppError> {
        self.roles.set_permissions(id, &normalize(permissions)).await?;
        info!(role_id = %id, "replaced role permissions");
        self.summarize(id).await
    }

    /// Hard-deletes a role; grant rows cascade.
    pub async fn delete_role(&self, id: Uuid) -> Result<(), AppError> {
        if !self.roles.delete(id).await? {
            return Err(AppError::not_found("Role not found"));
        }
        info!(role_id = %id, "deleted role");
        Ok(())
    }

    /// Grants a report to a role, or flips `can_view` on an existing
    /// grant row.
    pub async fn assign_report(
        &self,
        role_id: Uuid,
        report_id: Uuid,
        can_view: bool,
    ) -> Result<RoleSummary, AppError> {
        self.require_report(report_id).await?;
        self.roles.assign_report(role_id, report_id, can_view).await?;
        self.summarize(role_id).await
    }

    /// Removes a report grant row entirely.
    pub async fn remove_report(&self, role_id: Uuid, report_id: Uuid) -> Result<RoleSummary, AppError> {
        if !self.roles.remove_report(role_id, report_id).await? {
            return Err(AppError::not_found("Report grant not found"));
        }
        self.summarize(role_id).await
    }

    async fn require_report(&self, report_id: Uuid) -> Result<Report, AppError> {
        self.reports
            .find_by_id(report_id)
            .await?
            .ok_or_else(|| AppError::not_found("Report not found"))
    }

    async fn summarize(&self, id: Uuid) -> Result<RoleSummary, AppError> {
        let role = self
            .roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))?;
        let grants = self.roles.report_grants(id).await?;
        let catalog = if role.grants_all_reports {
            self.reports.find_active().await?
        } else {
            Vec::new()
        };
        Ok(RoleSummary::build(&role, &grants, &catalog))
    }
}

fn normalize(raw: HashMap<String, Vec<String>>) -> PermissionMap {
    normalize_permissions(raw)
}
