//! Integration tests for the session actor over an in-memory store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use contentcraft_core::error::{CraftError, CraftResult};
use contentcraft_core::models::brand::{Brand, CreateBrand, UpdateBrand};
use contentcraft_core::models::tenant::CreateTenant;
use contentcraft_core::models::{BrandId, TenantId};
use contentcraft_core::repository::{BrandRepository, TenantRepository};
use contentcraft_db::repository::{SurrealBrandRepository, SurrealTenantRepository};
use contentcraft_db::{FixtureSet, seed_fixtures};
use contentcraft_session::{BrandManager, Fault, Phase, SessionError, SessionHandle};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

/// Helper: in-memory DB with migrations applied.
async fn empty_store() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    contentcraft_db::run_migrations(&db).await.unwrap();
    db
}

/// Helper: in-memory DB seeded with the bundled fixtures.
async fn seeded_store() -> Surreal<Db> {
    let db = empty_store().await;
    seed_fixtures(&db, &FixtureSet::bundled().unwrap())
        .await
        .unwrap();
    db
}

async fn started(db: &Surreal<Db>) -> SessionHandle {
    let session = SessionHandle::spawn(
        SurrealTenantRepository::new(db.clone()),
        SurrealBrandRepository::new(db.clone()),
    );
    session.start().await.unwrap();
    session.wait_until_settled().await.unwrap();
    session
}

/// Brand repository that can be told to fail reads.
#[derive(Clone)]
struct FlakyBrands {
    inner: SurrealBrandRepository<Db>,
    failing: Arc<AtomicBool>,
}

impl FlakyBrands {
    fn check(&self) -> CraftResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CraftError::Backend("brand service unavailable".into()))
        } else {
            Ok(())
        }
    }
}

impl BrandRepository for FlakyBrands {
    async fn get_all(&self, tenant_id: Option<TenantId>) -> CraftResult<Vec<Brand>> {
        self.check()?;
        self.inner.get_all(tenant_id).await
    }

    async fn get_by_id(&self, id: BrandId) -> CraftResult<Brand> {
        self.inner.get_by_id(id).await
    }

    async fn create(&self, input: CreateBrand) -> CraftResult<Brand> {
        self.inner.create(input).await
    }

    async fn update(&self, id: BrandId, input: UpdateBrand) -> CraftResult<Brand> {
        self.inner.update(id, input).await
    }

    async fn delete(&self, id: BrandId) -> CraftResult<()> {
        self.inner.delete(id).await
    }

    async fn get_default(&self, tenant_id: Option<TenantId>) -> CraftResult<Option<Brand>> {
        self.check()?;
        self.inner.get_default(tenant_id).await
    }
}

#[tokio::test]
async fn start_resolves_default_tenant_and_brand() {
    let db = seeded_store().await;
    let session = started(&db).await;

    let state = session.snapshot();
    assert_eq!(state.phase(), &Phase::Ready);
    assert_eq!(session.current_tenant().unwrap().id, TenantId(1));
    assert_eq!(session.current_brand().unwrap().name, "TechFlow");
    assert_eq!(state.brands().len(), 2);
}

#[tokio::test]
async fn switching_tenant_reloads_scoped_brands() {
    let db = seeded_store().await;
    let session = started(&db).await;

    session.switch_tenant(TenantId(2)).await.unwrap();
    let state = session.wait_until_settled().await.unwrap();
    assert_eq!(state.current_tenant().unwrap().id, TenantId(2));
    assert_eq!(state.current_brand().unwrap().name, "Acme Studios");
    assert!(state.brands().iter().all(|b| b.tenant_id == Some(TenantId(2))));

    session.switch_tenant(TenantId(1)).await.unwrap();
    let state = session.wait_until_settled().await.unwrap();
    assert_eq!(state.current_brand().unwrap().name, "TechFlow");
}

#[tokio::test]
async fn rapid_switches_settle_on_the_last_tenant() {
    let db = seeded_store().await;
    let session = started(&db).await;

    session.switch_tenant(TenantId(2)).await.unwrap();
    session.switch_tenant(TenantId(1)).await.unwrap();
    session.switch_tenant(TenantId(2)).await.unwrap();
    let state = session.wait_until_settled().await.unwrap();

    assert_eq!(state.current_tenant().unwrap().id, TenantId(2));
    assert!(state.brands().iter().all(|b| b.tenant_id == Some(TenantId(2))));
    assert_eq!(state.current_brand().unwrap().tenant_id, Some(TenantId(2)));
}

#[tokio::test]
async fn empty_store_ends_in_no_tenant_error() {
    let db = empty_store().await;
    let session = started(&db).await;

    assert_eq!(
        session.snapshot().phase(),
        &Phase::Error {
            fault: Fault::NoTenant
        }
    );
    assert_eq!(session.retry().await.unwrap_err(), SessionError::NoTenant);
}

#[tokio::test]
async fn brand_manager_mutations_flow_into_the_selection() {
    let db = seeded_store().await;
    let session = started(&db).await;
    let manager = BrandManager::new(
        SurrealTenantRepository::new(db.clone()),
        SurrealBrandRepository::new(db.clone()),
    );

    // Select the non-default brand, then delete it.
    session.select_brand(BrandId(2)).await.unwrap();
    let brands = manager.delete(BrandId(2)).await.unwrap();
    session.on_brands_save(brands).await.unwrap();
    assert_eq!(session.current_brand().unwrap().id, BrandId(1));

    // A new brand does not move the selection.
    let brands = manager
        .create(CreateBrand {
            tenant_id: TenantId(1),
            name: "Launch".into(),
            color: None,
            emoji: None,
            is_default: false,
        })
        .await
        .unwrap();
    session.on_brands_save(brands).await.unwrap();
    assert_eq!(session.current_brand().unwrap().id, BrandId(1));
    assert_eq!(session.snapshot().brands().len(), 2);

    // The default brand is refused and nothing changes.
    let err = manager.delete(BrandId(1)).await.unwrap_err();
    assert!(matches!(err, CraftError::PermissionDenied { .. }));
    assert_eq!(manager.list(TenantId(1)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn failed_brand_load_keeps_last_known_good() {
    let db = seeded_store().await;
    let failing = Arc::new(AtomicBool::new(false));
    let session = SessionHandle::spawn(
        SurrealTenantRepository::new(db.clone()),
        FlakyBrands {
            inner: SurrealBrandRepository::new(db.clone()),
            failing: Arc::clone(&failing),
        },
    );
    session.start().await.unwrap();
    session.wait_until_settled().await.unwrap();

    failing.store(true, Ordering::SeqCst);
    session.switch_tenant(TenantId(2)).await.unwrap();
    let state = session.wait_until_settled().await.unwrap();

    assert_eq!(state.phase(), &Phase::Ready);
    assert_eq!(state.current_tenant().unwrap().id, TenantId(1));
    assert_eq!(state.current_brand().unwrap().name, "TechFlow");
    let error = state.view_error().unwrap();
    assert!(error.retryable);
    assert_eq!(error.tenant_id, TenantId(2));

    failing.store(false, Ordering::SeqCst);
    session.retry().await.unwrap();
    let state = session.wait_until_settled().await.unwrap();
    assert!(state.view_error().is_none());
    assert_eq!(state.current_tenant().unwrap().id, TenantId(2));
}

#[tokio::test]
async fn deleting_the_current_tenant_moves_to_the_default() {
    let db = seeded_store().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let session = started(&db).await;

    session.switch_tenant(TenantId(2)).await.unwrap();
    session.wait_until_settled().await.unwrap();

    tenants.delete(TenantId(2)).await.unwrap();
    session.tenant_deleted(TenantId(2)).await.unwrap();
    let state = session.wait_until_settled().await.unwrap();

    assert_eq!(state.tenants().len(), 1);
    assert_eq!(state.current_tenant().unwrap().id, TenantId(1));
    assert_eq!(state.current_brand().unwrap().name, "TechFlow");
}

#[tokio::test]
async fn created_tenant_can_be_switched_to() {
    let db = seeded_store().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let session = started(&db).await;

    let created = tenants
        .create(CreateTenant {
            name: "Newcomer".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    session.tenant_created(created.clone()).await.unwrap();
    session.switch_tenant(created.id).await.unwrap();
    let state = session.wait_until_settled().await.unwrap();

    assert_eq!(state.current_tenant().unwrap().id, created.id);
    assert!(state.brands().is_empty());
    assert!(state.current_brand().is_none());
}

#[tokio::test]
async fn unknown_brand_selection_is_rejected() {
    let db = seeded_store().await;
    let session = started(&db).await;

    let err = session.select_brand(BrandId(3)).await.unwrap_err();
    assert_eq!(err, SessionError::UnknownBrand(BrandId(3)));
    assert_eq!(session.current_brand().unwrap().id, BrandId(1));
}
