//! Role repository implementation.

use sqlx::{FromRow, PgPool};
use sqlx::types::Json;
use uuid::Uuid;

use insight_core::error::{AppError, ErrorKind};
use insight_core::result::AppResult;
use insight_entity::account::ReportGrant;
use insight_entity::report::Report;
use insight_entity::role::{CreateRole, PermissionMap, Role, UpdateRole};

use super::map_write_err;

/// Row helper for a role's report grant joined with the report.
#[derive(Debug, FromRow)]
struct GrantRow {
    can_view: bool,
    #[sqlx(flatten)]
    report: Report,
}

/// Repository for role CRUD and role↔report grant operations.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a role by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role by id", e))
    }

    /// Find a role by name. Names are unique across active and inactive rows.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find role by name", e)
            })
    }

    /// List roles, optionally including inactive ones.
    pub async fn find_all(&self, include_inactive: bool) -> AppResult<Vec<Role>> {
        let sql = if include_inactive {
            "SELECT * FROM roles ORDER BY name"
        } else {
            "SELECT * FROM roles WHERE active ORDER BY name"
        };
        sqlx::query_as::<_, Role>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list roles", e))
    }

    /// Insert a new role. Duplicate name surfaces as `Conflict` even when
    /// the existing row is inactive.
    pub async fn create(&self, data: &CreateRole) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (id, name, description, permissions, grants_all_reports, active) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.description)
        .bind(Json(&data.permissions))
        .bind(data.grants_all_reports)
        .bind(data.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_err(
                e,
                "Role with the given name already exists",
                "Failed to create role",
            )
        })
    }

    /// Update role fields; `None` fields are left untouched.
    pub async fn update(&self, id: Uuid, data: &UpdateRole) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "UPDATE roles SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                active = COALESCE($4, active), \
                permissions = COALESCE($5, permissions), \
                grants_all_reports = COALESCE($6, grants_all_reports), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.active)
        .bind(data.permissions.as_ref().map(Json))
        .bind(data.grants_all_reports)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_write_err(
                e,
                "Role with the given name already exists",
                "Failed to update role",
            )
        })?
        .ok_or_else(|| AppError::not_found("Role not found"))
    }

    /// Replace a role's permission map.
    pub async fn set_permissions(&self, id: Uuid, permissions: &PermissionMap) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "UPDATE roles SET permissions = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Json(permissions))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update role permissions", e)
        })?
        .ok_or_else(|| AppError::not_found("Role not found"))
    }

    /// Hard-delete a role; join rows cascade. Returns `true` if deleted.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete role", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Upsert a role→report grant. An existing grant row keeps its
    /// provenance and only the `can_view` flag is toggled, so revocation
    /// is distinct from deleting the grant.
    pub async fn assign_report(
        &self,
        role_id: Uuid,
        report_id: Uuid,
        can_view: bool,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO role_reports (role_id, report_id, can_view) VALUES ($1, $2, $3) \
             ON CONFLICT (role_id, report_id) DO UPDATE SET can_view = EXCLUDED.can_view",
        )
        .bind(role_id)
        .bind(report_id)
        .bind(can_view)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to assign report to role", e)
        })?;
        Ok(())
    }

    /// Delete a role→report grant row entirely. Returns `true` if deleted.
    pub async fn remove_report(&self, role_id: Uuid, report_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM role_reports WHERE role_id = $1 AND report_id = $2")
            .bind(role_id)
            .bind(report_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove report grant", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// All report grants for a role, including revoked ones.
    pub async fn report_grants(&self, role_id: Uuid) -> AppResult<Vec<ReportGrant>> {
        let rows: Vec<GrantRow> = sqlx::query_as(
            "SELECT rr.can_view, rp.* FROM role_reports rr \
             JOIN reports rp ON rp.id = rr.report_id \
             WHERE rr.role_id = $1 ORDER BY rp.name",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load report grants", e)
        })?;

        Ok(rows
            .into_iter()
            .map(|row| ReportGrant {
                can_view: row.can_view,
                report: row.report,
            })
            .collect())
    }
}
