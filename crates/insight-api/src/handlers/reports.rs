//! Report handlers — the reports visible to the authenticated user.

use axum::Json;
use axum::extract::Path;

use insight_auth::ReportAccess;
use insight_core::error::AppError;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// GET /api/reports
pub async fn list_reports(user: CurrentUser) -> Json<ApiResponse<Vec<ReportAccess>>> {
    Json(ApiResponse::ok(user.profile.reports))
}

/// GET /api/reports/{code}
pub async fn get_report(
    user: CurrentUser,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<ReportAccess>>, ApiError> {
    let report = user
        .profile
        .reports
        .into_iter()
        .find(|r| r.code == code)
        .ok_or_else(|| AppError::not_found("Report not found"))?;

    Ok(Json(ApiResponse::ok(report)))
}
