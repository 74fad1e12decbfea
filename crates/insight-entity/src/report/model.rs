//! Report entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named, routable analytical view gated by role-level view grants.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Report {
    /// Unique report identifier.
    pub id: Uuid,
    /// Unique stable report code (e.g. `"sales_dashboard"`).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Route the report is served under.
    pub route: String,
    /// Whether the report is visible anywhere. Inactive reports never
    /// appear in resolved profiles, even for all-reports roles.
    pub active: bool,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// When the report was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to register a new report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReport {
    /// Unique stable report code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Description (optional).
    pub description: Option<String>,
    /// Route (optional).
    pub route: Option<String>,
    /// Initial active flag.
    pub active: bool,
}
