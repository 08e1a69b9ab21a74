//! Schema migrations against an in-memory store.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn fresh() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    db
}

#[tokio::test]
async fn migrations_define_every_table() {
    let db = fresh().await;
    contentcraft_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = format!("{:?}", info.unwrap());

    for table in ["tenant", "brand", "preset", "content", "_sequence", "_schema_version"] {
        assert!(info.contains(table), "missing {table} table");
    }
}

#[tokio::test]
async fn rerunning_migrations_records_each_version_once() {
    let db = fresh().await;
    contentcraft_db::run_migrations(&db).await.unwrap();
    contentcraft_db::run_migrations(&db).await.unwrap();

    let mut result = db
        .query("SELECT VALUE version FROM _schema_version")
        .await
        .unwrap();
    let versions: Vec<i64> = result.take(0).unwrap();
    assert_eq!(versions, vec![1]);
}

#[tokio::test]
async fn tenant_domains_are_unique_in_the_store() {
    let db = fresh().await;
    contentcraft_db::run_migrations(&db).await.unwrap();

    let create = "CREATE type::record('tenant', $id) SET name = $name, \
                  domain = 'acme.contentcraft.com', primary_color = '#3B82F6'";
    db.query(create)
        .bind(("id", 1))
        .bind(("name", "Acme"))
        .await
        .unwrap()
        .check()
        .unwrap();

    let duplicate = db
        .query(create)
        .bind(("id", 2))
        .bind(("name", "Acme Two"))
        .await
        .unwrap()
        .check();
    assert!(duplicate.is_err(), "duplicate domain should be rejected");
}
