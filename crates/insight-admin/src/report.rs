//! Report catalog management.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use insight_core::error::AppError;
use insight_database::repositories::report::ReportRepository;
use insight_entity::report::CreateReport;

use crate::summary::ReportSummary;

/// Request to register a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReportRequest {
    /// Stable code (unique).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Frontend route; defaults to `/reports/{code}`.
    #[serde(default)]
    pub route: Option<String>,
    /// Whether the report is visible anywhere.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Handles the report catalog.
#[derive(Debug, Clone)]
pub struct ReportAdminService {
    /// Report repository.
    reports: Arc<ReportRepository>,
}

impl ReportAdminService {
    /// Creates a new report service.
    pub fn new(reports: Arc<ReportRepository>) -> Self {
        Self { reports }
    }

    /// Lists reports in the catalog.
    pub async fn list_reports(&self, include_inactive: bool) -> Result<Vec<ReportSummary>, AppError> {
        let reports = self.reports.find_all(include_inactive).await?;
        Ok(reports.iter().map(ReportSummary::from).collect())
    }

    /// Fetches one report.
    pub async fn get_report(&self, id: Uuid) -> Result<ReportSummary, AppError> {
        let report = self
            .reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Report not found"))?;
        Ok(ReportSummary::from(&report))
    }

    /// Registers a report.
    pub async fn create_report(&self, req: CreateReportRequest) -> Result<ReportSummary, AppError> {
        let code = req.code.trim();
        if code.is_empty() {
            return Err(AppError::validation("Report code must not be empty"));
        }

        let report = self
            .reports
            .create(&CreateReport {
                code: code.to_string(),
                name: req.name.trim().to_string(),
                description: req.description,
                route: req.route,
                active: req.active,
            })
            .await?;

        info!(code, "registered report");
        Ok(ReportSummary::from(&report))
    }
}
