//! # insight-api
//!
//! HTTP API layer for the Insight portal: Axum routes, handlers,
//! session-cookie extractors, and DTOs over the auth and admin services.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
