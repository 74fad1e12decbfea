//! Admin audit log handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use insight_entity::audit::AuthLogEntry;

use crate::dto::request::AuditLogParams;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::handlers::admin::require_admin;
use crate::state::AppState;

/// GET /api/admin/audit
pub async fn recent(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<AuditLogParams>,
) -> Result<Json<ApiResponse<Vec<AuthLogEntry>>>, ApiError> {
    require_admin(&user.profile)?;
    let entries = state.audit.recent(params.limit).await?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// GET /api/admin/audit/accounts/{id}
pub async fn for_account(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Query(params): Query<AuditLogParams>,
) -> Result<Json<ApiResponse<Vec<AuthLogEntry>>>, ApiError> {
    require_admin(&user.profile)?;
    let entries = state.audit.for_account(id, params.limit).await?;
    Ok(Json(ApiResponse::ok(entries)))
}
