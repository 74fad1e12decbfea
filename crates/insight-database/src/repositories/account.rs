//! Account repository implementation.
//!
//! Besides plain CRUD this repository materializes the full account graph
//! (direct roles, groups with their roles, report grants per role) that the
//! permission resolver consumes, so resolution itself stays free of
//! database access.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use insight_core::error::{AppError, ErrorKind};
use insight_core::result::AppResult;
use insight_entity::account::{
    Account, AccountGraph, CreateAccount, GroupRoles, ReportGrant, RoleGrants, UpdateAccount,
};
use insight_entity::group::Group;
use insight_entity::report::Report;
use insight_entity::role::Role;

use super::map_write_err;

/// Row helper joining a group id to a role it grants.
#[derive(Debug, FromRow)]
struct GroupRoleRow {
    group_id: Uuid,
    #[sqlx(flatten)]
    role: Role,
}

/// Row helper joining a role id to one of its report grants.
#[derive(Debug, FromRow)]
struct RoleReportRow {
    role_id: Uuid,
    can_view: bool,
    #[sqlx(flatten)]
    report: Report,
}

/// Repository for account CRUD, login bookkeeping, and graph loading.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an account by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })
    }

    /// Find an account by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by username", e)
            })
    }

    /// List accounts, optionally including deactivated ones.
    pub async fn find_all(&self, include_inactive: bool) -> AppResult<Vec<Account>> {
        let sql = if include_inactive {
            "SELECT * FROM accounts ORDER BY username"
        } else {
            "SELECT * FROM accounts WHERE active ORDER BY username"
        };
        sqlx::query_as::<_, Account>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list accounts", e))
    }

    /// Insert a new account. Duplicate username/email surfaces as `Conflict`.
    pub async fn create(&self, data: &CreateAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, username, email, password_hash, first_name, last_name, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_err(
                e,
                "Account with the given username or email already exists",
                "Failed to create account",
            )
        })
    }

    /// Update account fields; `None` fields are left untouched.
    pub async fn update(&self, id: Uuid, data: &UpdateAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET \
                email = COALESCE($2, email), \
                first_name = COALESCE($3, first_name), \
                last_name = COALESCE($4, last_name), \
                active = COALESCE($5, active), \
                password_hash = COALESCE($6, password_hash), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.email)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.active)
        .bind(&data.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_write_err(
                e,
                "Account with the given email already exists",
                "Failed to update account",
            )
        })?
        .ok_or_else(|| AppError::not_found("Account not found"))
    }

    /// Soft-deactivate an account.
    pub async fn deactivate(&self, id: Uuid) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET active = FALSE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to deactivate account", e))?
        .ok_or_else(|| AppError::not_found("Account not found"))
    }

    /// Hard-delete an account. Sessions cascade; auth log rows keep a null
    /// account reference. Returns `true` if a row was deleted.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete account", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the failed-login counter after a wrong password.
    pub async fn record_login_failure(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET failed_login_count = failed_login_count + 1, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record login failure", e)
        })?;
        Ok(())
    }

    /// Reset the failed-login counter and stamp the last successful login.
    pub async fn record_login_success(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET failed_login_count = 0, last_login_at = $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record login success", e)
        })?;
        Ok(())
    }

    /// Attach a role to an account. Set semantics: re-granting is a no-op.
    pub async fn assign_role(
        &self,
        account_id: Uuid,
        role_id: Uuid,
        granted_by: Option<Uuid>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO account_roles (account_id, role_id, granted_by) VALUES ($1, $2, $3) \
             ON CONFLICT (account_id, role_id) DO NOTHING",
        )
        .bind(account_id)
        .bind(role_id)
        .bind(granted_by)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to assign role to account", e)
        })?;
        Ok(())
    }

    /// Attach a group membership. Set semantics: re-joining is a no-op.
    pub async fn assign_group(
        &self,
        account_id: Uuid,
        group_id: Uuid,
        granted_by: Option<Uuid>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO account_groups (account_id, group_id, granted_by) VALUES ($1, $2, $3) \
             ON CONFLICT (account_id, group_id) DO NOTHING",
        )
        .bind(account_id)
        .bind(group_id)
        .bind(granted_by)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to assign group to account", e)
        })?;
        Ok(())
    }

    /// Replace the account's role set wholesale (admin edit form semantics).
    pub async fn replace_roles(&self, account_id: Uuid, role_ids: &[Uuid]) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM account_roles WHERE account_id = $1")
            .bind(account_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear account roles", e)
            })?;

        for role_id in role_ids {
            sqlx::query(
                "INSERT INTO account_roles (account_id, role_id) VALUES ($1, $2) \
                 ON CONFLICT (account_id, role_id) DO NOTHING",
            )
            .bind(account_id)
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert account role", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit role replacement", e)
        })
    }

    /// Replace the account's group memberships wholesale.
    pub async fn replace_groups(&self, account_id: Uuid, group_ids: &[Uuid]) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM account_groups WHERE account_id = $1")
            .bind(account_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear account groups", e)
            })?;

        for group_id in group_ids {
            sqlx::query(
                "INSERT INTO account_groups (account_id, group_id) VALUES ($1, $2) \
                 ON CONFLICT (account_id, group_id) DO NOTHING",
            )
            .bind(account_id)
            .bind(group_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert account group", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit group replacement", e)
        })
    }

    /// Roles directly attached to an account.
    pub async fn roles_for_account(&self, account_id: Uuid) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT r.* FROM roles r \
             JOIN account_roles ar ON ar.role_id = r.id \
             WHERE ar.account_id = $1 ORDER BY r.name",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load account roles", e))
    }

    /// Groups the account belongs to.
    pub async fn groups_for_account(&self, account_id: Uuid) -> AppResult<Vec<Group>> {
        sqlx::query_as::<_, Group>(
            "SELECT g.* FROM groups g \
             JOIN account_groups ag ON ag.group_id = g.id \
             WHERE ag.account_id = $1 ORDER BY g.name",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load account groups", e))
    }

    /// Load the complete resolution graph for one account: the account row,
    /// its direct roles with report grants, and its groups with their roles
    /// and report grants. Read fresh on every login so admin edits take
    /// effect on the next resolution.
    pub async fn find_graph_by_username(&self, username: &str) -> AppResult<Option<AccountGraph>> {
        let Some(account) = self.find_by_username(username).await? else {
            return Ok(None);
        };

        let direct_roles = self.roles_for_account(account.id).await?;
        let groups = self.groups_for_account(account.id).await?;

        let group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
        let group_role_rows: Vec<GroupRoleRow> = sqlx::query_as(
            "SELECT gr.group_id AS group_id, r.* FROM roles r \
             JOIN group_roles gr ON gr.role_id = r.id \
             WHERE gr.group_id = ANY($1) ORDER BY r.name",
        )
        .bind(&group_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load group roles", e))?;

        let mut role_ids: Vec<Uuid> = direct_roles.iter().map(|r| r.id).collect();
        role_ids.extend(group_role_rows.iter().map(|row| row.role.id));
        role_ids.sort_unstable();
        role_ids.dedup();

        let grant_rows: Vec<RoleReportRow> = sqlx::query_as(
            "SELECT rr.role_id AS role_id, rr.can_view, rp.* FROM role_reports rr \
             JOIN reports rp ON rp.id = rr.report_id \
             WHERE rr.role_id = ANY($1)",
        )
        .bind(&role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load report grants", e)
        })?;

        let mut grants_by_role: HashMap<Uuid, Vec<ReportGrant>> = HashMap::new();
        for row in grant_rows {
            grants_by_role
                .entry(row.role_id)
                .or_default()
                .push(ReportGrant {
                    can_view: row.can_view,
                    report: row.report,
                });
        }

        let with_grants = |role: Role| -> RoleGrants {
            let reports = grants_by_role.get(&role.id).cloned().unwrap_or_default();
            RoleGrants { role, reports }
        };

        let mut roles_by_group: HashMap<Uuid, Vec<RoleGrants>> = HashMap::new();
        for row in group_role_rows {
            roles_by_group
                .entry(row.group_id)
                .or_default()
                .push(with_grants(row.role));
        }

        Ok(Some(AccountGraph {
            roles: direct_roles.into_iter().map(with_grants).collect(),
            groups: groups
                .into_iter()
                .map(|group| {
                    let roles = roles_by_group.remove(&group.id).unwrap_or_default();
                    GroupRoles { group, roles }
                })
                .collect(),
            account,
        }))
    }
}
