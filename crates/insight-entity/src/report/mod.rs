//! Report domain entities.

pub mod model;

pub use model::{CreateReport, Report};
