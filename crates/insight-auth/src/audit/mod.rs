//! Authentication event logging.
//!
//! Every credential check, logout, and session expiry is recorded through
//! an [`AuthLogSink`]. Logging is best-effort: a sink failure is reported
//! via tracing and never fails the operation being logged.

pub mod memory;
pub mod sink;
pub mod writer;

pub use memory::MemoryAuthLogSink;
pub use sink::{AuthLogSink, SqlAuthLogSink};
pub use writer::AuthLogWriter;
