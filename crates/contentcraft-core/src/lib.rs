//! ContentCraft Core — domain models, error taxonomy, entity store traits
//! and the tenant-scoping / default-selection rules shared by every crate.

pub mod error;
pub mod library;
pub mod models;
pub mod repository;
pub mod scope;
pub mod selection;

pub use error::{CraftError, CraftResult};
