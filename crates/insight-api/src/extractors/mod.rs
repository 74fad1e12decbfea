//! Request extractors.

pub mod client;
pub mod session;

pub use client::ClientInfo;
pub use session::{CurrentSession, CurrentUser};
