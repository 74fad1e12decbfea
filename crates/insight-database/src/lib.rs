//! # insight-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for all Insight Portal entities.

pub mod connection;
pub mod migration;
pub mod repositories;
