//! Login, logout, and per-request session flows.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use insight_core::error::AppError;
use insight_entity::account::AccountGraph;

use crate::audit::writer::{AuthLogWriter, actions};
use crate::context::ClientContext;
use crate::directory::UserDirectory;
use crate::password::PasswordHasher;
use crate::resolver::{AuthProfile, resolve_profile};

use super::handle::SessionHandle;
use super::store::{SaveOutcome, SessionStore};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// The resolved access profile, also cached in the session payload.
    pub profile: AuthProfile,
    /// The save outcome carrying the cookie expiry.
    pub outcome: SaveOutcome,
}

/// Drives the authentication and session lifecycle end to end.
#[derive(Debug, Clone)]
pub struct SessionManager {
    directory: Arc<dyn UserDirectory>,
    store: SessionStore,
    hasher: Arc<PasswordHasher>,
    audit: AuthLogWriter,
}

impl SessionManager {
    /// Creates a manager with all required collaborators.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        store: SessionStore,
        hasher: Arc<PasswordHasher>,
        audit: AuthLogWriter,
    ) -> Self {
        Self {
            directory,
            store,
            hasher,
            audit,
        }
    }

    /// The underlying session store, for cookie parameters.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Opens the session for an incoming request token.
    ///
    /// A stale row tombstoned during the load is recorded in the auth log.
    pub async fn open_session(
        &self,
        token: Option<&str>,
        client: &ClientContext,
    ) -> Result<SessionHandle, AppError> {
        let loaded = self.store.load(token).await?;
        if let Some(expired) = loaded.expired {
            let username =
                AuthProfile::from_session_data(&expired.data).map(|p| p.username);
            self.audit
                .record(
                    expired.account_id,
                    username.as_deref(),
                    actions::SESSION_EXPIRED,
                    true,
                    None,
                    client,
                )
                .await;
        }
        Ok(loaded.handle)
    }

    /// Persists the handle at the end of a request.
    pub async fn save_session(
        &self,
        handle: &SessionHandle,
        client: &ClientContext,
    ) -> Result<SaveOutcome, AppError> {
        self.store.save(handle, client).await
    }

    /// Validates credentials and resolves the access profile.
    ///
    /// Failure modes are indistinguishable to the caller: a missing
    /// account, an inactive account, and a wrong password all produce the
    /// same invalid-credentials error. The auth log keeps the real reason.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        client: &ClientContext,
    ) -> Result<AuthProfile, AppError> {
        let graph = self.directory.find_graph_by_username(username).await?;

        let Some(graph) = graph.filter(|g| g.account.active) else {
            self.audit
                .record(
                    None,
                    Some(username),
                    actions::LOGIN,
                    false,
                    Some("inactive or missing user"),
                    client,
                )
                .await;
            return Err(AppError::invalid_credentials());
        };

        if !self
            .hasher
            .verify_password(password, &graph.account.password_hash)
        {
            self.directory.record_login_failure(graph.account.id).await?;
            self.audit
                .record(
                    Some(graph.account.id),
                    Some(username),
                    actions::LOGIN,
                    false,
                    Some("invalid password"),
                    client,
                )
                .await;
            return Err(AppError::invalid_credentials());
        }

        self.directory
            .record_login_success(graph.account.id, Utc::now())
            .await?;

        let profile = self.resolve(&graph).await?;
        self.audit
            .record(
                Some(graph.account.id),
                Some(username),
                actions::LOGIN,
                true,
                None,
                client,
            )
            .await;
        info!(username, "login succeeded");
        Ok(profile)
    }

    /// Full login flow: authenticate, rotate the session token, cache the
    /// profile in the session payload, and persist the row.
    ///
    /// The token rotation means a cookie issued before authentication
    /// never names an authenticated session.
    pub async fn login(
        &self,
        handle: &mut SessionHandle,
        username: &str,
        password: &str,
        client: &ClientContext,
    ) -> Result<LoginResult, AppError> {
        let profile = self.authenticate(username, password, client).await?;

        handle.rotate_token();
        handle.account_id = Some(profile.account_id);
        handle.data = match profile.to_session_data()? {
            Value::Object(map) => map,
            _ => Default::default(),
        };

        let outcome = self.save_session(handle, client).await?;
        Ok(LoginResult { profile, outcome })
    }

    /// Logs the session out: tombstones the stored row, records the
    /// event, and clears the handle.
    pub async fn logout(
        &self,
        handle: &mut SessionHandle,
        client: &ClientContext,
    ) -> Result<(), AppError> {
        let username = AuthProfile::from_session_data(&Value::Object(handle.data.clone()))
            .map(|p| p.username);

        let found = self.store.deactivate(&handle.token).await?;
        self.audit
            .record(
                handle.account_id,
                username.as_deref(),
                actions::LOGOUT,
                true,
                (!found).then_some("session not found"),
                client,
            )
            .await;
        handle.clear();
        Ok(())
    }

    /// Resolves the profile for a graph, fetching the report catalog only
    /// when some active role carries the all-reports capability.
    async fn resolve(&self, graph: &AccountGraph) -> Result<AuthProfile, AppError> {
        let needs_catalog = graph
            .roles
            .iter()
            .map(|g| &g.role)
            .chain(
                graph
                    .groups
                    .iter()
                    .filter(|m| m.group.active)
                    .flat_map(|m| m.roles.iter().map(|g| &g.role)),
            )
            .any(|role| role.active && role.grants_all_reports);

        let catalog = if needs_catalog {
            self.directory.list_active_reports().await?
        } else {
            Vec::new()
        };
        Ok(resolve_profile(graph, &catalog))
    }
}
