//! Role domain entities.

pub mod model;
pub mod permissions;

pub use model::{CreateRole, Role, UpdateRole};
pub use permissions::{PermissionMap, WILDCARD_RESOURCE, normalize_permissions};
