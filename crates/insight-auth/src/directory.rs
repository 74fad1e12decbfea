//! Account and report lookup abstraction.
//!
//! The session manager authenticates against a [`UserDirectory`] rather
//! than concrete repositories so tests can drive the full login flow with
//! in-memory fixtures.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use insight_core::error::AppError;
use insight_database::repositories::account::AccountRepository;
use insight_database::repositories::report::ReportRepository;
use insight_entity::account::AccountGraph;
use insight_entity::report::Report;

/// Read and bookkeeping operations the login flow needs.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug {
    /// Loads an account with its full role/group/report graph.
    async fn find_graph_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountGraph>, AppError>;

    /// Lists every active report, for all-reports capability resolution.
    async fn list_active_reports(&self) -> Result<Vec<Report>, AppError>;

    /// Resets the failure counter and stamps the last login time.
    async fn record_login_success(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError>;

    /// Increments the consecutive failure counter.
    async fn record_login_failure(&self, id: Uuid) -> Result<(), AppError>;
}

/// Directory backed by the account and report repositories.
#[derive(Debug, Clone)]
pub struct SqlDirectory {
    accounts: Arc<AccountRepository>,
    reports: Arc<ReportRepository>,
}

impl SqlDirectory {
    /// Creates a directory over the given repositories.
    pub fn new(accounts: Arc<AccountRepository>, reports: Arc<ReportRepository>) -> Self {
        Self { accounts, reports }
    }
}

#[async_trait]
impl UserDirectory for SqlDirectory {
    async fn find_graph_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountGraph>, AppError> {
        self.accounts.find_graph_by_username(username).await
    }

    async fn list_active_reports(&self) -> Result<Vec<Report>, AppError> {
        self.reports.find_active().await
    }

    async fn record_login_success(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        self.accounts.record_login_success(id, at).await
    }

    async fn record_login_failure(&self, id: Uuid) -> Result<(), AppError> {
        self.accounts.record_login_failure(id).await
    }
}
