//! Access profile resolution.
//!
//! Resolution is a pure computation over an eagerly-loaded
//! [`AccountGraph`](insight_entity::account::AccountGraph) and the current
//! set of active reports. No database access happens here; callers load
//! the inputs up front and the same inputs always produce the same profile.

pub mod profile;
pub mod resolve;

pub use profile::{AuthProfile, ReportAccess};
pub use resolve::{merge_permission_maps, resolve_profile};
