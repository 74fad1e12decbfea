//! Report repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use insight_core::error::{AppError, ErrorKind};
use insight_core::result::AppResult;
use insight_entity::report::{CreateReport, Report};

use super::map_write_err;

/// Repository for the report catalog.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    /// Create a new report repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a report by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Report>> {
        sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find report by id", e)
            })
    }

    /// Find a report by its stable code.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Report>> {
        sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find report by code", e)
            })
    }

    /// List reports, optionally including inactive ones.
    pub async fn find_all(&self, include_inactive: bool) -> AppResult<Vec<Report>> {
        let sql = if include_inactive {
            "SELECT * FROM reports ORDER BY name"
        } else {
            "SELECT * FROM reports WHERE active ORDER BY name"
        };
        sqlx::query_as::<_, Report>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list reports", e))
    }

    /// All active reports, used for the all-reports capability union.
    pub async fn find_active(&self) -> AppResult<Vec<Report>> {
        self.find_all(false).await
    }

    /// Register a new report. Duplicate code surfaces as `Conflict`; a
    /// missing route defaults to `/reports/{code}`.
    pub async fn create(&self, data: &CreateReport) -> AppResult<Report> {
        let route = data
            .route
            .clone()
            .unwrap_or_else(|| format!("/reports/{}", data.code));
        sqlx::query_as::<_, Report>(
            "INSERT INTO reports (id, code, name, description, route, active) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.code)
        .bind(&data.name)
        .bind(&data.description)
        .bind(route)
        .bind(data.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_err(
                e,
                "Report with the given code already exists",
                "Failed to create report",
            )
        })
    }
}
