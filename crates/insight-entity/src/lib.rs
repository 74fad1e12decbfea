//! # insight-entity
//!
//! Domain entity models for Insight Portal. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod account;
pub mod audit;
pub mod group;
pub mod report;
pub mod role;
pub mod session;
