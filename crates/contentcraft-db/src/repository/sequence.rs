//! Monotonic integer id allocation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SequenceRow {
    counter: i64,
}

/// Allocates the next id for `table`. Ids start at 1 and are never reused,
/// even after deletes.
pub(crate) async fn next_id<C: Connection>(db: &Surreal<C>, table: &str) -> Result<i64, DbError> {
    let result = db
        .query(
            "UPSERT type::record('_sequence', $table) \
             SET counter = (counter ?? 0) + 1 RETURN AFTER",
        )
        .bind(("table", table.to_string()))
        .await?;

    let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

    let rows: Vec<SequenceRow> = result.take(0)?;
    rows.into_iter()
        .next()
        .map(|row| row.counter)
        .ok_or_else(|| DbError::Query(format!("sequence for {table} returned no row")))
}

/// Moves the sequence for `table` forward so that it is at least `floor`.
/// Used when records are inserted with explicit ids.
pub(crate) async fn advance_to<C: Connection>(
    db: &Surreal<C>,
    table: &str,
    floor: i64,
) -> Result<(), DbError> {
    db.query(
        "UPSERT type::record('_sequence', $table) \
         SET counter = math::max([(counter ?? 0), $floor])",
    )
    .bind(("table", table.to_string()))
    .bind(("floor", floor))
    .await?
    .check()
    .map_err(|e| DbError::Query(e.to_string()))?;
    Ok(())
}
