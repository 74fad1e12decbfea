//! Admin role management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use insight_admin::{CreateRoleRequest, RoleSummary, UpdateRoleRequest};

use crate::dto::request::{AssignReportRequest, ListParams, UpdatePermissionsRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::handlers::admin::require_admin;
use crate::state::AppState;

/// GET /api/admin/roles
pub async fn list_roles(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<RoleSummary>>>, ApiError> {
    require_admin(&user.profile)?;
    let roles = state.role_admin.list_roles(params.include_inactive).await?;
    Ok(Json(ApiResponse::ok(roles)))
}

/// POST /api/admin/roles
pub async fn create_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateRoleRequest>,
) -> Result<Json<ApiResponse<RoleSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let created = state.role_admin.create_role(req).await?;
    Ok(Json(ApiResponse::ok(created)))
}

/// GET /api/admin/roles/{id}
pub async fn get_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RoleSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let found = state.role_admin.get_role(id).await?;
    Ok(Json(ApiResponse::ok(found)))
}

/// PUT /api/admin/roles/{id}
pub async fn update_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<RoleSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let updated = state.role_admin.update_role(id, req).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// PUT /api/admin/roles/{id}/permissions
pub async fn update_permissions(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePermissionsRequest>,
) -> Result<Json<ApiResponse<RoleSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let updated = state
        .role_admin
        .update_permissions(id, req.permissions)
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// DELETE /api/admin/roles/{id}
pub async fn delete_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    require_admin(&user.profile)?;
    state.role_admin.delete_role(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Role deleted"))))
}

/// POST /api/admin/roles/{id}/reports
pub async fn assign_report(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignReportRequest>,
) -> Result<Json<ApiResponse<RoleSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let updated = state
        .role_admin
        .assign_report(id, req.report_id, req.can_view)
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// DELETE /api/admin/roles/{id}/reports/{report_id}
pub async fn remove_report(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((id, report_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<RoleSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let updated = state.role_admin.remove_report(id, report_id).await?;
    Ok(Json(ApiResponse::ok(updated)))
}
