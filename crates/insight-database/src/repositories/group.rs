//! Group repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use insight_core::error::{AppError, ErrorKind};
use insight_core::result::AppResult;
use insight_entity::group::{CreateGroup, Group, UpdateGroup};
use insight_entity::role::Role;

use super::map_write_err;

/// Repository for group CRUD and group↔role assignment.
#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    /// Create a new group repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a group by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Group>> {
        sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find group by id", e)
            })
    }

    /// List groups, optionally including inactive ones.
    pub async fn find_all(&self, include_inactive: bool) -> AppResult<Vec<Group>> {
        let sql = if include_inactive {
            "SELECT * FROM groups ORDER BY name"
        } else {
            "SELECT * FROM groups WHERE active ORDER BY name"
        };
        sqlx::query_as::<_, Group>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list groups", e))
    }

    /// Insert a new group. Duplicate name surfaces as `Conflict`.
    pub async fn create(&self, data: &CreateGroup) -> AppResult<Group> {
        sqlx::query_as::<_, Group>(
            "INSERT INTO groups (id, name, description, active) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_err(
                e,
                "Group with the given name already exists",
                "Failed to create group",
            )
        })
    }

    /// Update group fields; `None` fields are left untouched.
    pub async fn update(&self, id: Uuid, data: &UpdateGroup) -> AppResult<Group> {
        sqlx::query_as::<_, Group>(
            "UPDATE groups SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                active = COALESCE($4, active), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_write_err(
                e,
                "Group with the given name already exists",
                "Failed to update group",
            )
        })?
        .ok_or_else(|| AppError::not_found("Group not found"))
    }

    /// Hard-delete a group; membership rows cascade. Returns `true` if deleted.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete group", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Attach a role to a group. Set semantics: re-granting is a no-op.
    pub async fn assign_role(
        &self,
        group_id: Uuid,
        role_id: Uuid,
        granted_by: Option<Uuid>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO group_roles (group_id, role_id, granted_by) VALUES ($1, $2, $3) \
             ON CONFLICT (group_id, role_id) DO NOTHING",
        )
        .bind(group_id)
        .bind(role_id)
        .bind(granted_by)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to assign role to group", e)
        })?;
        Ok(())
    }

    /// Replace the group's role set wholesale.
    pub async fn replace_roles(&self, group_id: Uuid, role_ids: &[Uuid]) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM group_roles WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear group roles", e)
            })?;

        for role_id in role_ids {
            sqlx::query(
                "INSERT INTO group_roles (group_id, role_id) VALUES ($1, $2) \
                 ON CONFLICT (group_id, role_id) DO NOTHING",
            )
            .bind(group_id)
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert group role", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit role replacement", e)
        })
    }

    /// Roles attached to a group.
    pub async fn roles_for_group(&self, group_id: Uuid) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT r.* FROM roles r \
             JOIN group_roles gr ON gr.role_id = r.id \
             WHERE gr.group_id = $1 ORDER BY r.name",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load group roles", e))
    }
}
