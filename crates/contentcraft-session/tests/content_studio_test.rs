//! Integration tests for content generation, the library and brand limits.

use contentcraft_core::error::CraftError;
use contentcraft_core::library::{ContentQuery, LibraryCategory};
use contentcraft_core::models::brand::CreateBrand;
use contentcraft_core::models::content::OutputType;
use contentcraft_core::models::tenant::{CreateTenant, TenantSettings};
use contentcraft_core::models::{BrandId, ContentId, PresetId, TenantId};
use contentcraft_core::repository::{ContentRepository, TenantRepository};
use contentcraft_db::repository::{
    SurrealBrandRepository, SurrealContentRepository, SurrealPresetRepository,
    SurrealTenantRepository,
};
use contentcraft_db::{FixtureSet, seed_fixtures};
use contentcraft_session::{
    BrandManager, ContentStudio, GenerateRequest, PlaceholderAssembler, SessionConfig,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

type Studio = ContentStudio<
    SurrealPresetRepository<Db>,
    SurrealContentRepository<Db>,
    PlaceholderAssembler,
>;

async fn setup() -> (Surreal<Db>, Studio) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    contentcraft_db::run_migrations(&db).await.unwrap();
    seed_fixtures(&db, &FixtureSet::bundled().unwrap())
        .await
        .unwrap();

    let studio = ContentStudio::new(
        SurrealPresetRepository::new(db.clone()),
        SurrealContentRepository::new(db.clone()),
        PlaceholderAssembler,
        SessionConfig::default(),
    );
    (db, studio)
}

fn request(tenant: i64, preset: Option<i64>) -> GenerateRequest {
    GenerateRequest {
        tenant_id: TenantId(tenant),
        brand_id: Some(BrandId(1)),
        preset_id: preset.map(PresetId),
        text: "Our quarterly product update covers three new features".into(),
        file_name: None,
        output_types: vec![OutputType::BlogPost, OutputType::SeoTags],
    }
}

#[tokio::test]
async fn generate_persists_outputs_with_preset_snapshot() {
    let (db, studio) = setup().await;

    let content = studio.generate(request(1, Some(3))).await.unwrap();
    assert_eq!(content.preset, "Blog Post Writer");
    assert_eq!(content.output_count, 2);
    assert!(content.word_count > 0);
    assert_eq!(content.tenant_id, Some(TenantId(1)));
    assert!(
        content.outputs[&OutputType::BlogPost].contains("quarterly product update")
    );

    let stored = SurrealContentRepository::new(db)
        .get_by_id(content.id)
        .await
        .unwrap();
    assert_eq!(stored.outputs, content.outputs);
}

#[tokio::test]
async fn generate_validates_the_request() {
    let (_db, studio) = setup().await;

    let err = studio.generate(request(1, None)).await.unwrap_err();
    assert!(matches!(err, CraftError::ValidationFailed { .. }));

    let mut blank = request(1, Some(1));
    blank.text = "   ".into();
    let err = studio.generate(blank.clone()).await.unwrap_err();
    assert!(matches!(err, CraftError::ValidationFailed { .. }));

    // A file stands in for missing text.
    blank.file_name = Some("episode-12.mp3".into());
    let content = studio.generate(blank).await.unwrap();
    assert_eq!(content.input, "File: episode-12.mp3");

    let mut no_outputs = request(1, Some(1));
    no_outputs.output_types.clear();
    let err = studio.generate(no_outputs).await.unwrap_err();
    assert!(matches!(err, CraftError::ValidationFailed { .. }));
}

#[tokio::test]
async fn another_tenants_custom_preset_is_not_found() {
    let (_db, studio) = setup().await;

    // Preset 7 belongs to tenant 2.
    let err = studio.generate(request(1, Some(7))).await.unwrap_err();
    assert!(matches!(err, CraftError::NotFound { .. }));
    assert!(studio.generate(request(2, Some(7))).await.is_ok());
}

#[tokio::test]
async fn duplicate_output_types_are_generated_once() {
    let (_db, studio) = setup().await;

    let mut req = request(1, Some(1));
    req.output_types = vec![OutputType::SeoTags, OutputType::SeoTags, OutputType::Timestamps];
    let content = studio.generate(req).await.unwrap();
    assert_eq!(content.output_count, 2);
}

#[tokio::test]
async fn outputs_are_stored_in_output_type_order() {
    let (_db, studio) = setup().await;

    let mut req = request(1, Some(1));
    req.output_types = vec![OutputType::SeoTags, OutputType::BlogPost];
    let content = studio.generate(req).await.unwrap();
    let keys: Vec<OutputType> = content.outputs.keys().copied().collect();
    assert_eq!(keys, vec![OutputType::BlogPost, OutputType::SeoTags]);
}

#[tokio::test]
async fn library_is_scoped_searchable_and_newest_first() {
    let (_db, studio) = setup().await;

    let generated = studio.generate(request(1, Some(2))).await.unwrap();
    let all = studio
        .library(TenantId(1), &ContentQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id, generated.id);
    assert!(all.iter().all(|c| c.tenant_id == Some(TenantId(1))));

    let youtube = ContentQuery {
        category: LibraryCategory::Youtube,
        ..Default::default()
    };
    assert_eq!(studio.library(TenantId(1), &youtube).await.unwrap().len(), 2);

    let search = ContentQuery {
        search: Some("SALADS".into()),
        ..Default::default()
    };
    let found = studio.library(TenantId(1), &search).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, ContentId(2));

    let brand_two = studio.recent(TenantId(1), Some(BrandId(2))).await.unwrap();
    assert_eq!(brand_two.len(), 1);
}

#[tokio::test]
async fn overview_aggregates_tenant_content() {
    let (_db, studio) = setup().await;

    studio.generate(request(1, Some(3))).await.unwrap();
    let overview = studio.overview(TenantId(1), None).await.unwrap();

    assert_eq!(overview.stats.total, 3);
    assert_eq!(overview.stats.in_window, 1);
    assert_eq!(overview.activity.len(), 7);
    assert_eq!(overview.activity.last().unwrap().content, 1);
    assert!(
        overview
            .distribution
            .iter()
            .any(|(ty, n)| *ty == OutputType::BlogPost && *n == 2)
    );
}

#[tokio::test]
async fn content_and_presets_of_other_tenants_cannot_be_deleted() {
    let (_db, studio) = setup().await;

    let err = studio
        .delete_content(TenantId(2), ContentId(1))
        .await
        .unwrap_err();
    assert!(matches!(err, CraftError::NotFound { .. }));
    studio.delete_content(TenantId(1), ContentId(1)).await.unwrap();

    let err = studio
        .delete_preset(TenantId(1), PresetId(7))
        .await
        .unwrap_err();
    assert!(matches!(err, CraftError::NotFound { .. }));
    let err = studio
        .delete_preset(TenantId(1), PresetId(1))
        .await
        .unwrap_err();
    assert!(matches!(err, CraftError::PermissionDenied { .. }));
    studio.delete_preset(TenantId(2), PresetId(7)).await.unwrap();
}

#[tokio::test]
async fn brand_limits_follow_tenant_settings() {
    let (db, _studio) = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let manager = BrandManager::new(tenants.clone(), SurrealBrandRepository::new(db.clone()));

    let locked = tenants
        .create(CreateTenant {
            name: "Locked".into(),
            settings: Some(TenantSettings {
                allow_brand_creation: false,
                ..Default::default()
            }),
            ..Default::default()
        })
        .await
        .unwrap();
    let err = manager
        .create(CreateBrand {
            tenant_id: locked.id,
            name: "Nope".into(),
            color: None,
            emoji: None,
            is_default: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CraftError::PermissionDenied { .. }));

    // Tenant 2 allows three brands and already has two.
    let third = CreateBrand {
        tenant_id: TenantId(2),
        name: "Acme Live".into(),
        color: None,
        emoji: None,
        is_default: false,
    };
    let brands = manager.create(third.clone()).await.unwrap();
    assert_eq!(brands.len(), 3);
    let err = manager
        .create(CreateBrand {
            name: "Acme Extra".into(),
            ..third
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CraftError::ValidationFailed { .. }));
}
