//! Admin group management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use insight_admin::{CreateGroupRequest, GroupSummary, UpdateGroupRequest};

use crate::dto::request::{AssignRoleRequest, ListParams};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::handlers::admin::require_admin;
use crate::state::AppState;

/// GET /api/admin/groups
pub async fn list_groups(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<GroupSummary>>>, ApiError> {
    require_admin(&user.profile)?;
    let groups = state
        .group_admin
        .list_groups(params.include_inactive)
        .await?;
    Ok(Json(ApiResponse::ok(groups)))
}

/// POST /api/admin/groups
pub async fn create_group(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateGroupRequest>,
) -> Result<Json<ApiResponse<GroupSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let created = state.group_admin.create_group(req).await?;
    Ok(Json(ApiResponse::ok(created)))
}

/// GET /api/admin/groups/{id}
pub async fn get_group(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<GroupSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let found = state.group_admin.get_group(id).await?;
    Ok(Json(ApiResponse::ok(found)))
}

/// PUT /api/admin/groups/{id}
pub async fn update_group(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateGroupRequest>,
) -> Result<Json<ApiResponse<GroupSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let updated = state.group_admin.update_group(id, req).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// DELETE /api/admin/groups/{id}
pub async fn delete_group(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    require_admin(&user.profile)?;
    state.group_admin.delete_group(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Group deleted"))))
}

/// POST /api/admin/groups/{id}/roles
pub async fn assign_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignRoleRequest>,
) -> Result<Json<ApiResponse<GroupSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let updated = state
        .group_admin
        .assign_role(id, req.role_id, Some(user.profile.account_id))
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}
