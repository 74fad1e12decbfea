//! Concrete repository implementations, one per entity.

pub mod account;
pub mod auth_log;
pub mod group;
pub mod report;
pub mod role;
pub mod session;

use insight_core::error::{AppError, ErrorKind};

/// Map a sqlx error from an insert/update into the domain error space,
/// turning unique-constraint violations into `Conflict` so callers can
/// render "name already taken" instead of a generic storage failure.
pub(crate) fn map_write_err(e: sqlx::Error, conflict_message: &str, context: &str) -> AppError {
    let is_unique = e
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if is_unique {
        AppError::conflict(conflict_message)
    } else {
        AppError::with_source(ErrorKind::Database, context.to_string(), e)
    }
}
