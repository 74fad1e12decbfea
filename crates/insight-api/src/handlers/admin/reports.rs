//! Admin report catalog handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use insight_admin::{CreateReportRequest, ReportSummary};

use crate::dto::request::ListParams;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::handlers::admin::require_admin;
use crate::state::AppState;

/// GET /api/admin/reports
pub async fn list_reports(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<ReportSummary>>>, ApiError> {
    require_admin(&user.profile)?;
    let reports = state
        .report_admin
        .list_reports(params.include_inactive)
        .await?;
    Ok(Json(ApiResponse::ok(reports)))
}

/// POST /api/admin/reports
pub async fn create_report(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateReportRequest>,
) -> Result<Json<ApiResponse<ReportSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let created = state.report_admin.create_report(req).await?;
    Ok(Json(ApiResponse::ok(created)))
}

/// GET /api/admin/reports/{id}
pub async fn get_report(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportSummary>>, ApiError> {
    require_admin(&user.profile)?;
    let found = state.report_admin.get_report(id).await?;
    Ok(Json(ApiResponse::ok(found)))
}
