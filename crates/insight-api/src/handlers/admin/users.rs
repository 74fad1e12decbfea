//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use insight_admin::{CreateUserRequest, UpdateUserRequest, UserSummary};

use crate::dto::request::{AssignGroupRequest, AssignRoleRequest, ListParams};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::handlers::admin::require_admin;
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, ApiError> {
    require_admin(&user.profile)?;
    let users = state.user_admin.list_users(params.include_inactive).await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// POST /api/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let created = state.user_admin.create_user(req).await?;
    Ok(Json(ApiResponse::ok(created)))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let found = state.user_admin.get_user(id).await?;
    Ok(Json(ApiResponse::ok(found)))
}

/// PUT /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let updated = state.user_admin.update_user(id, req).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// POST /api/admin/users/{id}/deactivate
pub async fn deactivate_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let updated = state.user_admin.deactivate_user(id).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    require_admin(&user.profile)?;
    state.user_admin.delete_user(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("User deleted"))))
}

/// POST /api/admin/users/{id}/roles
pub async fn assign_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignRoleRequest>,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let updated = state
        .user_admin
        .assign_role(id, req.role_id, Some(user.profile.account_id))
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// POST /api/admin/users/{id}/groups
pub async fn assign_group(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignGroupRequest>,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let updated = state
        .user_admin
        .assign_group(id, req.group_id, Some(user.profile.account_id))
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}
