//! Admin account management — CRUD, membership changes, password resets.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use insight_auth::password::PasswordHasher;
use insight_core::config::AuthConfig;
use insight_core::error::AppError;
use insight_database::repositories::account::AccountRepository;
use insight_entity::account::{CreateAccount, UpdateAccount};

use crate::summary::UserSummary;

/// Request to create an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Username (unique).
    pub username: String,
    /// Email (unique).
    pub email: String,
    /// Initial plaintext password.
    pub password: String,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Whether the account may log in.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Roles to attach directly.
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
    /// Groups to join.
    #[serde(default)]
    pub group_ids: Vec<Uuid>,
}

fn default_active() -> bool {
    true
}

/// Request to update an account. `None` fields are left untouched;
/// membership lists replace the existing sets wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// New email.
    pub email: Option<String>,
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New active flag.
    pub active: Option<bool>,
    /// Replacement role set.
    pub role_ids: Option<Vec<Uuid>>,
    /// Replacement group set.
    pub group_ids: Option<Vec<Uuid>>,
    /// New plaintext password.
    pub password: Option<String>,
}

/// Handles administrative account operations.
#[derive(Debug, Clone)]
pub struct UserAdminService {
    /// Account repository.
    accounts: Arc<AccountRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Auth configuration, for password policy.
    config: AuthConfig,
}

impl UserAdminService {
    /// Creates a new admin user service.
    pub fn new(accounts: Arc<AccountRepository>, hasher: Arc<PasswordHasher>, config: AuthConfig) -> Self {
        Self {
            accounts,
            hasher,
            config,
        }
    }

    /// Lists accounts with their memberships.
    pub async fn list_users(&self, include_inactive: bool) -> Result<Vec<UserSummary>, AppError> {
        let accounts = self.accounts.find_all(include_inactive).await?;
        let mut summaries = Vec::with_capacity(accounts.len());
        for account in &accounts {
            summaries.push(self.summarize(account.id).await?);
        }
        Ok(summaries)
    }

    /// Fetches one account summary.
    pub async fn get_user(&self, id: Uuid) -> Result<UserSummary, AppError> {
        self.summarize(id).await
    }

    /// Creates an account and attaches its initial memberships.
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<UserSummary, AppError> {
        let username = req.username.trim();
        let email = req.email.trim();
        if username.is_empty() {
            return Err(AppError::validation("Username must not be empty"));
        }
        if !email.contains('@') {
            return Err(AppError::validation("Invalid email format"));
        }
        let password_hash = self.hash_checked(&req.password)?;

        let account = self
            .accounts
            .create(&CreateAccount {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                first_name: clean_optional(req.first_name),
                last_name: clean_optional(req.last_name),
                active: req.active,
            })
            .await?;

        for role_id in &req.role_ids {
            self.accounts.assign_role(account.id, *role_id, None).await?;
        }
        for group_id in &req.group_ids {
            self.accounts.assign_group(account.id, *group_id, None).await?;
        }

        info!(username, "created account");
        self.summarize(account.id).await
    }

    /// Applies a partial update; replaces memberships only when the
    /// request carries replacement lists.
    pub async fn update_user(&self, id: Uuid, req: UpdateUserRequest) -> Result<UserSummary, AppError> {
        if let Some(email) = &req.email {
            if !email.contains('@') {
                return Err(AppError::validation("Invalid email format"));
            }
        }

        let password_hash = match req.password.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => Some(self.hash_checked(p)?),
            _ => None,
        };

        self.accounts
            .update(
                id,
                &UpdateAccount {
                    email: req.email.map(|e| e.trim().to_string()),
                    first_name: req.first_name.map(|s| s.trim().to_string()),
                    last_name: req.last_name.map(|s| s.trim().to_string()),
                    active: req.active,
                    password_hash,
                },
            )
            .await?;

        if let Some(role_ids) = &req.role_ids {
            self.accounts.replace_roles(id, role_ids).await?;
        }
        if let Some(group_ids) = &req.group_ids {
            self.accounts.replace_groups(id, group_ids).await?;
        }

        info!(account_id = %id, "updated account");
        self.summarize(id).await
    }

    /// Soft-deactivates an account. Existing sessions die at their next
    /// load once the account can no longer authenticate.
    pub async fn deactivate_user(&self, id: Uuid) -> Result<UserSummary, AppError> {
        self.accounts.deactivate(id).await?;
        info!(account_id = %id, "deactivated account");
        self.summarize(id).await
    }

    /// Hard-deletes an account. Membership rows and sessions cascade;
    /// auth log entries keep a null account reference.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        if !self.accounts.delete(id).await? {
            return Err(AppError::not_found("Account not found"));
        }
        info!(account_id = %id, "deleted account");
        Ok(())
    }

    /// Attaches one role directly to an account. Idempotent.
    pub async fn assign_role(
        &self,
        account_id: Uuid,
        role_id: Uuid,
        granted_by: Option<Uuid>,
    ) -> Result<UserSummary, AppError> {
        self.accounts.assign_role(account_id, role_id, granted_by).await?;
        self.summarize(account_id).await
    }

    /// Adds an account to a group. Idempotent.
    pub async fn assign_group(
        &self,
        account_id: Uuid,
        group_id: Uuid,
        granted_by: Option<Uuid>,
    ) -> Result<UserSummary, AppError> {
        self.accounts.assign_group(account_id, group_id, granted_by).await?;
        self.summarize(account_id).await
    }

    fn hash_checked(&self, password: &str) -> Result<String, AppError> {
        if password.len() < self.config.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.config.password_min_length
            )));
        }
        self.hasher.hash_password(password)
    }

    async fn summarize(&self, id: Uuid) -> Result<UserSummary, AppError> {
        let account = self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;
        let roles = self.accounts.roles_for_account(id).await?;
        let groups = self.accounts.groups_for_account(id).await?;
        Ok(UserSummary::build(&account, &roles, &groups))
    }
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::clean_optional;

    #[test]
    fn clean_optional_maps_missing_and_blank_to_none() {
        // Omitted or blank names persist as NULL, so the accounts
        // columns they feed must stay nullable.
        assert_eq!(clean_optional(None), None);
        assert_eq!(clean_optional(Some(String::new())), None);
        assert_eq!(clean_optional(Some("   ".to_string())), None);
    }

    #[test]
    fn clean_optional_trims_kept_values() {
        assert_eq!(clean_optional(Some(" Ada ".to_string())), Some("Ada".to_string()));
    }
}
