//! Seeding the bundled fixtures into an in-memory store.

use contentcraft_core::models::brand::CreateBrand;
use contentcraft_core::models::TenantId;
use contentcraft_core::repository::{BrandRepository, ContentRepository, TenantRepository};
use contentcraft_db::repository::{
    SurrealBrandRepository, SurrealContentRepository, SurrealTenantRepository,
};
use contentcraft_db::{FixtureSet, SeedSummary, seed_fixtures};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn seeded() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    contentcraft_db::run_migrations(&db).await.unwrap();
    let summary = seed_fixtures(&db, &FixtureSet::bundled().unwrap())
        .await
        .unwrap();
    assert_eq!(summary.tenants, 2);
    db
}

#[tokio::test]
async fn seeded_store_resolves_defaults() {
    let db = seeded().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let brands = SurrealBrandRepository::new(db.clone());
    let contents = SurrealContentRepository::new(db);

    let default = tenants.get_default().await.unwrap().unwrap();
    assert_eq!(default.id, TenantId(1));
    assert_eq!(default.domain, "demo.contentcraft.com");

    let demo_brand = brands.get_default(Some(TenantId(1))).await.unwrap().unwrap();
    assert_eq!(demo_brand.name, "TechFlow");
    let acme_brand = brands.get_default(Some(TenantId(2))).await.unwrap().unwrap();
    assert_eq!(acme_brand.name, "Acme Studios");

    assert_eq!(contents.get_all(Some(TenantId(1))).await.unwrap().len(), 2);
    assert_eq!(contents.get_all(Some(TenantId(2))).await.unwrap().len(), 1);
}

#[tokio::test]
async fn seeding_twice_is_a_no_op() {
    let db = seeded().await;
    let again = seed_fixtures(&db, &FixtureSet::bundled().unwrap())
        .await
        .unwrap();
    assert_eq!(again, SeedSummary::default());

    let tenants = SurrealTenantRepository::new(db);
    assert_eq!(tenants.get_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn ids_continue_after_fixture_ids() {
    let db = seeded().await;
    let brands = SurrealBrandRepository::new(db);

    let brand = brands
        .create(CreateBrand {
            tenant_id: TenantId(1),
            name: "Fresh".into(),
            color: None,
            emoji: None,
            is_default: false,
        })
        .await
        .unwrap();
    assert_eq!(brand.id.get(), 5);
}
