//! ContentCraft Database — SurrealDB connection management, schema
//! migrations, fixture seeding and the entity store implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Fixture normalization and seeding ([`FixtureSet`], [`seed_fixtures`])
//! - Repository implementations of the `contentcraft-core` traits
//! - Error types ([`DbError`])

mod connection;
mod error;
mod fixtures;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use fixtures::{FixtureSet, SeedSummary, seed_fixtures};
pub use repository::{
    SurrealBrandRepository, SurrealContentRepository, SurrealPresetRepository,
    SurrealTenantRepository,
};
pub use schema::run_migrations;
