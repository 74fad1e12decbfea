//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use insight_admin::audit::AuditService;
use insight_admin::group::GroupAdminService;
use insight_admin::report::ReportAdminService;
use insight_admin::role::RoleAdminService;
use insight_admin::user::UserAdminService;
use insight_auth::audit::{AuthLogWriter, SqlAuthLogSink};
use insight_auth::directory::SqlDirectory;
use insight_auth::password::PasswordHasher;
use insight_auth::session::{SessionManager, SessionStore, SqlSessionBackend};
use insight_core::config::AppConfig;
use insight_database::repositories::account::AccountRepository;
use insight_database::repositories::auth_log::AuthLogRepository;
use insight_database::repositories::group::GroupRepository;
use insight_database::repositories::report::ReportRepository;
use insight_database::repositories::role::RoleRepository;
use insight_database::repositories::session::SessionRepository;

/// Application state passed to every handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Session and login lifecycle manager.
    pub session_manager: Arc<SessionManager>,
    /// Admin account service.
    pub user_admin: Arc<UserAdminService>,
    /// Admin role service.
    pub role_admin: Arc<RoleAdminService>,
    /// Admin group service.
    pub group_admin: Arc<GroupAdminService>,
    /// Report catalog service.
    pub report_admin: Arc<ReportAdminService>,
    /// Auth log queries.
    pub audit: Arc<AuditService>,
}

impl AppState {
    /// Wires repositories and services over a connected pool.
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        let accounts = Arc::new(AccountRepository::new(db_pool.clone()));
        let roles = Arc::new(RoleRepository::new(db_pool.clone()));
        let groups = Arc::new(GroupRepository::new(db_pool.clone()));
        let reports = Arc::new(ReportRepository::new(db_pool.clone()));
        let sessions = Arc::new(SessionRepository::new(db_pool.clone()));
        let auth_log = Arc::new(AuthLogRepository::new(db_pool.clone()));

        let hasher = Arc::new(PasswordHasher::new(&config.auth));
        let directory = Arc::new(SqlDirectory::new(accounts.clone(), reports.clone()));
        let store = SessionStore::new(
            Arc::new(SqlSessionBackend::new(sessions)),
            config.session.clone(),
        );
        let audit_writer = AuthLogWriter::new(Arc::new(SqlAuthLogSink::new(auth_log.clone())));
        let session_manager = Arc::new(SessionManager::new(
            directory,
            store,
            hasher.clone(),
            audit_writer,
        ));

        let user_admin = Arc::new(UserAdminService::new(
            accounts,
            hasher,
            config.auth.clone(),
        ));
        let role_admin = Arc::new(RoleAdminService::new(roles, reports.clone()));
        let group_admin = Arc::new(GroupAdminService::new(groups));
        let report_admin = Arc::new(ReportAdminService::new(reports));
        let audit = Arc::new(AuditService::new(auth_log));

        Self {
            config: Arc::new(config),
            db_pool,
            session_manager,
            user_admin,
            role_admin,
            group_admin,
            report_admin,
            audit,
        }
    }
}
