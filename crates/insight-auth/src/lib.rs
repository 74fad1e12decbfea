//! # insight-auth
//!
//! Authentication, permission resolution, and server-side session
//! management for the Insight portal.
//!
//! ## Modules
//!
//! - `password` — bcrypt password hashing and verification
//! - `resolver` — pure role/group graph resolution into an access profile
//! - `audit` — best-effort authentication event logging
//! - `session` — database-backed session lifecycle (open, save, rotate, expire)
//! - `directory` — account/report lookup abstraction over the database

pub mod audit;
pub mod context;
pub mod directory;
pub mod password;
pub mod resolver;
pub mod session;

pub use audit::{AuthLogSink, AuthLogWriter, MemoryAuthLogSink, SqlAuthLogSink};
pub use context::ClientContext;
pub use directory::{SqlDirectory, UserDirectory};
pub use password::PasswordHasher;
pub use resolver::{AuthProfile, ReportAccess, merge_permission_maps, resolve_profile};
pub use session::{
    LoginResult, MemorySessionBackend, SaveOutcome, SessionBackend, SessionHandle,
    SessionManager, SessionStore, SqlSessionBackend,
};
