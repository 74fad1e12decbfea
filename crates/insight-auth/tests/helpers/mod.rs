//! Shared fixtures for auth integration tests: an in-memory directory,
//! session backend, and audit sink wired into a real `SessionManager`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tokio::sync::Mutex;
use uuid::Uuid;

use insight_auth::audit::{AuthLogWriter, MemoryAuthLogSink};
use insight_auth::directory::UserDirectory;
use insight_auth::password::PasswordHasher;
use insight_auth::session::{MemorySessionBackend, SessionManager, SessionStore};
use insight_core::config::{AuthConfig, SessionConfig};
use insight_core::error::AppError;
use insight_entity::account::{Account, AccountGraph, GroupRoles, ReportGrant, RoleGrants};
use insight_entity::group::Group;
use insight_entity::report::Report;
use insight_entity::role::{PermissionMap, Role};

/// Directory serving pre-built account graphs from memory.
#[derive(Debug, Default)]
pub struct TestDirectory {
    graphs: Mutex<HashMap<String, AccountGraph>>,
    reports: Mutex<Vec<Report>>,
    successes: Mutex<Vec<Uuid>>,
    failures: Mutex<Vec<Uuid>>,
}

impl TestDirectory {
    pub async fn add_graph(&self, graph: AccountGraph) {
        self.graphs
            .lock()
            .await
            .insert(graph.account.username.clone(), graph);
    }

    pub async fn add_report(&self, report: Report) {
        self.reports.lock().await.push(report);
    }

    pub async fn recorded_successes(&self) -> Vec<Uuid> {
        self.successes.lock().await.clone()
    }

    pub async fn recorded_failures(&self) -> Vec<Uuid> {
        self.failures.lock().await.clone()
    }
}

#[async_trait]
impl UserDirectory for TestDirectory {
    async fn find_graph_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountGraph>, AppError> {
        Ok(self.graphs.lock().await.get(username).cloned())
    }

    async fn list_active_reports(&self) -> Result<Vec<Report>, AppError> {
        Ok(self
            .reports
            .lock()
            .await
            .iter()
            .filter(|r| r.active)
            .cloned()
            .collect())
    }

    async fn record_login_success(&self, id: Uuid, _at: DateTime<Utc>) -> Result<(), AppError> {
        self.successes.lock().await.push(id);
        Ok(())
    }

    async fn record_login_failure(&self, id: Uuid) -> Result<(), AppError> {
        self.failures.lock().await.push(id);
        Ok(())
    }
}

/// A fully wired manager over in-memory collaborators.
pub struct Harness {
    pub manager: SessionManager,
    pub directory: Arc<TestDirectory>,
    pub backend: MemorySessionBackend,
    pub audit: MemoryAuthLogSink,
    pub hasher: PasswordHasher,
}

impl Harness {
    pub fn new() -> Self {
        let directory = Arc::new(TestDirectory::default());
        let backend = MemorySessionBackend::new();
        let audit = MemoryAuthLogSink::new();
        // Minimum bcrypt cost keeps the suite fast.
        let hasher = PasswordHasher::new(&AuthConfig {
            bcrypt_cost: 4,
            ..AuthConfig::default()
        });
        let store = SessionStore::new(Arc::new(backend.clone()), SessionConfig::default());
        let manager = SessionManager::new(
            directory.clone(),
            store,
            Arc::new(hasher.clone()),
            AuthLogWriter::new(Arc::new(audit.clone())),
        );
        Self {
            manager,
            directory,
            backend,
            audit,
            hasher,
        }
    }

    /// Registers a user with the given password and directly attached
    /// roles, returning the account id.
    pub async fn add_user(&self, username: &str, password: &str, roles: Vec<RoleGrants>) -> Uuid {
        self.add_user_graph(username, password, true, roles, vec![])
            .await
    }

    pub async fn add_user_graph(
        &self,
        username: &str,
        password: &str,
        active: bool,
        roles: Vec<RoleGrants>,
        groups: Vec<GroupRoles>,
    ) -> Uuid {
        let mut acct = account(username);
        acct.active = active;
        acct.password_hash = self.hasher.hash_password(password).unwrap();
        let id = acct.id;
        self.directory
            .add_graph(AccountGraph {
                account: acct,
                roles,
                groups,
            })
            .await;
        id
    }
}

pub fn account(username: &str) -> Account {
    Account {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: String::new(),
        first_name: None,
        last_name: None,
        active: true,
        failed_login_count: 0,
        last_login_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn role(name: &str, perms: &[(&str, &[&str])]) -> Role {
    let mut map = PermissionMap::new();
    for (resource, actions) in perms {
        map.insert(
            resource.to_string(),
            actions.iter().map(|a| a.to_string()).collect(),
        );
    }
    Role {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        permissions: Json(map),
        grants_all_reports: false,
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn report(code: &str, name: &str) -> Report {
    Report {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        route: format!("/reports/{code}"),
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn group(name: &str) -> Group {
    Group {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn grants(role: Role, reports: Vec<(bool, Report)>) -> RoleGrants {
    RoleGrants {
        role,
        reports: reports
            .into_iter()
            .map(|(can_view, report)| ReportGrant { can_view, report })
            .collect(),
    }
}

pub fn membership(group: Group, roles: Vec<RoleGrants>) -> GroupRoles {
    GroupRoles { group, roles }
}
