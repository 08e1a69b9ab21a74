//! Domain models for ContentCraft.
//!
//! These are the core types shared across all crates. Every cross-entity
//! reference is an integer id wrapped in a newtype.

pub mod brand;
pub mod content;
pub mod ids;
pub mod preset;
pub mod tenant;

pub use ids::{BrandId, ContentId, PresetId, TenantId};
