//! SurrealDB repository implementations.

mod brand;
mod content;
mod preset;
mod sequence;
mod tenant;

pub use brand::SurrealBrandRepository;
pub use content::SurrealContentRepository;
pub use preset::SurrealPresetRepository;
pub use tenant::SurrealTenantRepository;

use surrealdb::{Connection, Surreal};

use crate::error::DbError;

/// Whether `table:id` is present.
pub(crate) async fn record_exists<C: Connection>(
    db: &Surreal<C>,
    table: &str,
    id: i64,
) -> Result<bool, DbError> {
    let mut result = db
        .query("SELECT VALUE meta::id(id) FROM type::record($table, $id)")
        .bind(("table", table.to_string()))
        .bind(("id", id))
        .await?;
    let ids: Vec<i64> = result.take(0)?;
    Ok(!ids.is_empty())
}

/// Fails with `NotFound` unless the tenant exists.
pub(crate) async fn require_tenant<C: Connection>(
    db: &Surreal<C>,
    tenant_id: i64,
) -> Result<(), DbError> {
    if record_exists(db, "tenant", tenant_id).await? {
        Ok(())
    } else {
        Err(DbError::NotFound {
            entity: "tenant".into(),
            id: tenant_id.to_string(),
        })
    }
}
