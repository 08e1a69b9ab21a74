//! Store schema and its versioned migrations.
//!
//! Every table is SCHEMAFULL. Records are keyed by integer ids drawn from
//! `_sequence`; cross-entity references are plain ints and enums are
//! stored as their string tags.

use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;

/// Applied versions are kept here, one row per migration.
const VERSION_TABLE: &str = "\
DEFINE TABLE IF NOT EXISTS _schema_version SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _schema_version TYPE int;
DEFINE FIELD IF NOT EXISTS label ON TABLE _schema_version TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _schema_version TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_schema_version ON TABLE _schema_version \
    COLUMNS version UNIQUE;
";

struct Migration {
    version: i64,
    label: &'static str,
    ddl: &'static str,
}

/// Ascending by version.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    label: "entity tables",
    ddl: SCHEMA_V1,
}];

const SCHEMA_V1: &str = "\
-- Id sequences (one record per table, keyed by table name)
DEFINE TABLE _sequence SCHEMAFULL;
DEFINE FIELD counter ON TABLE _sequence TYPE int DEFAULT 0;

-- Tenants (global scope)
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD domain ON TABLE tenant TYPE string;
DEFINE FIELD logo ON TABLE tenant TYPE string DEFAULT '';
DEFINE FIELD primary_color ON TABLE tenant TYPE string;
DEFINE FIELD is_default ON TABLE tenant TYPE bool DEFAULT false;
DEFINE FIELD settings ON TABLE tenant TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD subscription ON TABLE tenant TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_domain ON TABLE tenant COLUMNS domain UNIQUE;

-- Brands (tenant-scoped)
DEFINE TABLE brand SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE brand TYPE option<int>;
DEFINE FIELD name ON TABLE brand TYPE string;
DEFINE FIELD color ON TABLE brand TYPE string;
DEFINE FIELD emoji ON TABLE brand TYPE string;
DEFINE FIELD is_default ON TABLE brand TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE brand TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_brand_tenant ON TABLE brand COLUMNS tenant_id;

-- Presets (system presets have no tenant)
DEFINE TABLE preset SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE preset TYPE option<int>;
DEFINE FIELD name ON TABLE preset TYPE string;
DEFINE FIELD description ON TABLE preset TYPE string DEFAULT '';
DEFINE FIELD prompt ON TABLE preset TYPE string DEFAULT '';
DEFINE FIELD category ON TABLE preset TYPE string;
DEFINE FIELD is_custom ON TABLE preset TYPE bool DEFAULT false;
DEFINE FIELD suggested ON TABLE preset TYPE bool DEFAULT false;
DEFINE INDEX idx_preset_tenant ON TABLE preset COLUMNS tenant_id;

-- Content (tenant-scoped, append-only)
DEFINE TABLE content SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE content TYPE option<int>;
DEFINE FIELD brand_id ON TABLE content TYPE option<int>;
DEFINE FIELD input ON TABLE content TYPE string;
DEFINE FIELD preset ON TABLE content TYPE string;
DEFINE FIELD output_count ON TABLE content TYPE int;
DEFINE FIELD word_count ON TABLE content TYPE int;
DEFINE FIELD outputs ON TABLE content TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE content TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_content_tenant ON TABLE content COLUMNS tenant_id;
DEFINE INDEX idx_content_brand ON TABLE content COLUMNS brand_id;
";

/// Migrations newer than `applied`, in the order they must run.
fn pending(applied: i64) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS.iter().filter(move |m| m.version > applied)
}

async fn applied_version<C: Connection>(db: &Surreal<C>) -> Result<i64, DbError> {
    let mut result = db
        .query("SELECT VALUE version FROM _schema_version ORDER BY version DESC LIMIT 1")
        .await?;
    let versions: Vec<i64> = result.take(0)?;
    Ok(versions.first().copied().unwrap_or(0))
}

/// Brings the schema up to date. Running it against a current store does
/// nothing.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(VERSION_TABLE)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let applied = applied_version(db).await?;
    for migration in pending(applied) {
        info!(version = migration.version, label = migration.label, "Migrating schema");
        db.query(migration.ddl)
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!("v{} ({}): {e}", migration.version, migration.label))
            })?;
        db.query("CREATE _schema_version SET version = $version, label = $label")
            .bind(("version", migration.version))
            .bind(("label", migration.label))
            .await?
            .check()
            .map_err(|e| DbError::Migration(format!("recording v{}: {e}", migration.version)))?;
    }
    Ok(())
}
