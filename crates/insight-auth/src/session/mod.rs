//! Database-backed session lifecycle.
//!
//! Sessions are keyed by an opaque random token carried in a cookie. The
//! database row is the source of truth: a session is live only while its
//! row is active and unexpired, and stale rows are tombstoned in place
//! instead of deleted so a replayed cookie stays dead.

pub mod backend;
pub mod handle;
pub mod manager;
pub mod memory;
pub mod store;

pub use backend::{SessionBackend, SqlSessionBackend};
pub use handle::SessionHandle;
pub use manager::{LoginResult, SessionManager};
pub use memory::MemorySessionBackend;
pub use store::{LoadedSession, SaveOutcome, SessionStore};
