//! Database-specific error types and conversions.

use contentcraft_core::error::CraftError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Malformed {entity} record: {message}")]
    Decode { entity: &'static str, message: String },

    #[error("Invalid fixture data: {0}")]
    Fixture(#[from] serde_json::Error),
}

impl From<DbError> for CraftError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CraftError::NotFound { entity, id },
            other => CraftError::Backend(other.to_string()),
        }
    }
}
