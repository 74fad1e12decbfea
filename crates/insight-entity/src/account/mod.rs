//! Account domain entities.

pub mod graph;
pub mod model;

pub use graph::{AccountGraph, GroupRoles, ReportGrant, RoleGrants};
pub use model::{Account, CreateAccount, UpdateAccount};
