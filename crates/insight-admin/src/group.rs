//! Admin group management — CRUD and role attachment.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use insight_core::error::AppError;
use insight_database::repositories::group::GroupRepository;
use insight_entity::group::{CreateGroup, UpdateGroup};

use crate::summary::GroupSummary;

/// Request to create a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    /// Group name (unique).
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether membership contributes to resolution.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Roles the group confers from the start.
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
}

fn default_active() -> bool {
    true
}

/// Request to update a group. `None` fields are left untouched; a role
/// list replaces the existing set wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGroupRequest {
    /// New group name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New active flag.
    pub active: Option<bool>,
    /// Replacement role set.
    pub role_ids: Option<Vec<Uuid>>,
}

/// Handles administrative group operations.
#[derive(Debug, Clone)]
pub struct GroupAdminService {
    /// Group repository.
    groups: Arc<GroupRepository>,
}

impl GroupAdminService {
    /// Creates a new admin group service.
    pub fn new(groups: Arc<GroupRepository>) -> Self {
        Self { groups }
    }

    /// Lists groups with the roles they confer.
    pub async fn list_groups(&self, include_inactive: bool) -> Result<Vec<GroupSummary>, AppError> {
        let groups = self.groups.find_all(include_inactive).await?;
        let mut summaries = Vec::with_capacity(groups.len());
        for group in &groups {
            let roles = self.groups.roles_for_group(group.id).await?;
            summaries.push(GroupSummary::build(group, &roles));
        }
        Ok(summaries)
    }

    /// Fetches one group summary.
    pub async fn get_group(&self, id: Uuid) -> Result<GroupSummary, AppError> {
        self.summarize(id).await
    }

    /// Creates a group and attaches its initial roles.
    pub async fn create_group(&self, req: CreateGroupRequest) -> Result<GroupSummary, AppError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Group name must not be empty"));
        }

        let group = self
            .groups
            .create(&CreateGroup {
                name: name.to_string(),
                description: req.description,
                active: req.active,
            })
            .await?;

        for role_id in &req.role_ids {
            self.groups.assign_role(group.id, *role_id, None).await?;
        }

        info!(group = name, "created group");
        self.summarize(group.id).await
    }

    /// Applies a partial update; replaces the role set only when the
    /// request carries a replacement list.
    pub async fn update_group(&self, id: Uuid, req: UpdateGroupRequest) -> Result<GroupSummary, AppError> {
        self.groups
            .update(
                id,
                &UpdateGroup {
                    name: req.name.map(|n| n.trim().to_string()),
                    description: req.description,
                    active: req.active,
                },
            )
            .await?;

        if let Some(role_ids) = &req.role_ids {
            self.groups.replace_roles(id, role_ids).await?;
        }

        info!(group_id = %id, "updated group");
        self.summarize(id).await
    }

    /// Hard-deletes a group; membership rows cascade.
    pub async fn delete_group(&self, id: Uuid) -> Result<(), AppError> {
        if !self.groups.delete(id).await? {
            return Err(AppError::not_found("Group not found"));
        }
        info!(group_id = %id, "deleted group");
        Ok(())
    }

    /// Attaches one role to a group. Idempotent.
    pub async fn assign_role(
        &self,
        group_id: Uuid,
        role_id: Uuid,
        granted_by: Option<Uuid>,
    ) -> Result<GroupSummary, AppError> {
        self.groups.assign_role(group_id, role_id, granted_by).await?;
        self.summarize(group_id).await
    }

    async fn summarize(&self, id: Uuid) -> Result<GroupSummary, AppError> {
        let group = self
            .groups
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Group not found"))?;
        let roles = self.groups.roles_for_group(id).await?;
        Ok(GroupSummary::build(&group, &roles))
    }
}
