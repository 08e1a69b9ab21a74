//! Fixture loading for the in-process store.
//!
//! Fixture records come in two spellings: the canonical one and the field
//! names of the legacy record service (`Id`, `Name`, `*_c` suffixes,
//! camelCase). Lookup fields may be a bare id or a `{ "Id": .., "Name": .. }`
//! object, and structured fields may be JSON-encoded strings. Everything is
//! normalized onto the core models before it reaches the store.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use contentcraft_core::models::brand::{Brand, DEFAULT_BRAND_COLOR, DEFAULT_BRAND_EMOJI};
use contentcraft_core::models::content::{Content, OutputType, total_words};
use contentcraft_core::models::preset::{Preset, PresetCategory};
use contentcraft_core::models::tenant::{
    DEFAULT_PRIMARY_COLOR, Subscription, Tenant, TenantSettings, default_domain,
};
use contentcraft_core::models::{BrandId, ContentId, PresetId, TenantId};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;
use crate::repository::{
    SurrealBrandRepository, SurrealContentRepository, SurrealPresetRepository,
    SurrealTenantRepository,
};

const TENANTS_JSON: &str = include_str!("../fixtures/tenants.json");
const BRANDS_JSON: &str = include_str!("../fixtures/brands.json");
const PRESETS_JSON: &str = include_str!("../fixtures/presets.json");
const CONTENTS_JSON: &str = include_str!("../fixtures/contents.json");

/// A reference to another record: either its id or the lookup object the
/// legacy service returns.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Lookup {
    Id(i64),
    Record {
        #[serde(alias = "Id")]
        id: i64,
    },
}

impl Lookup {
    fn id(&self) -> i64 {
        match self {
            Lookup::Id(id) | Lookup::Record { id } => *id,
        }
    }
}

/// A structured value that may arrive JSON-encoded inside a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Embedded<T> {
    Inline(T),
    Encoded(String),
}

impl<T: DeserializeOwned> Embedded<T> {
    fn decode(self) -> Result<T, serde_json::Error> {
        match self {
            Embedded::Inline(value) => Ok(value),
            Embedded::Encoded(raw) => serde_json::from_str(&raw),
        }
    }
}

fn decode_opt<T: DeserializeOwned>(value: Option<Embedded<T>>) -> Result<Option<T>, DbError> {
    Ok(value.map(Embedded::decode).transpose()?)
}

#[derive(Debug, Deserialize)]
struct TenantRecord {
    #[serde(alias = "Id")]
    id: i64,
    #[serde(alias = "Name")]
    name: String,
    #[serde(default, alias = "domain_c")]
    domain: Option<String>,
    #[serde(default, alias = "logo_c")]
    logo: Option<String>,
    #[serde(default, alias = "primary_color_c", alias = "primaryColor")]
    primary_color: Option<String>,
    #[serde(default, alias = "is_default_c", alias = "isDefault")]
    is_default: bool,
    #[serde(default, alias = "settings_c")]
    settings: Option<Embedded<TenantSettings>>,
    #[serde(default, alias = "subscription_c")]
    subscription: Option<Embedded<Subscription>>,
    #[serde(default, alias = "created_at_c", alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updated_at_c", alias = "updatedAt")]
    updated_at: Option<DateTime<Utc>>,
}

impl TenantRecord {
    fn normalize(self, now: DateTime<Utc>) -> Result<Tenant, DbError> {
        let created_at = self.created_at.unwrap_or(now);
        Ok(Tenant {
            id: TenantId(self.id),
            domain: self
                .domain
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| default_domain(&self.name)),
            name: self.name,
            logo: self.logo.unwrap_or_default(),
            primary_color: self
                .primary_color
                .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string()),
            is_default: self.is_default,
            settings: decode_opt(self.settings)?.unwrap_or_default(),
            subscription: decode_opt(self.subscription)?
                .unwrap_or_else(|| Subscription::starter(created_at)),
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        })
    }
}

#[derive(Debug, Deserialize)]
struct BrandRecord {
    #[serde(alias = "Id")]
    id: i64,
    #[serde(alias = "Name")]
    name: String,
    #[serde(default, alias = "color_c")]
    color: Option<String>,
    #[serde(default, alias = "emoji_c")]
    emoji: Option<String>,
    #[serde(default, alias = "is_default_c", alias = "isDefault")]
    is_default: bool,
    #[serde(default, alias = "tenant_id_c", alias = "tenantId")]
    tenant_id: Option<Lookup>,
    #[serde(default, alias = "created_at_c", alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

impl BrandRecord {
    fn normalize(self, now: DateTime<Utc>) -> Brand {
        Brand {
            id: BrandId(self.id),
            tenant_id: self.tenant_id.as_ref().map(|t| TenantId(t.id())),
            name: self.name.trim().to_string(),
            color: self.color.unwrap_or_else(|| DEFAULT_BRAND_COLOR.to_string()),
            emoji: self.emoji.unwrap_or_else(|| DEFAULT_BRAND_EMOJI.to_string()),
            is_default: self.is_default,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PresetRecord {
    #[serde(alias = "Id")]
    id: i64,
    #[serde(alias = "Name")]
    name: String,
    #[serde(default, alias = "description_c")]
    description: String,
    #[serde(default, alias = "prompt_c")]
    prompt: String,
    #[serde(default, alias = "category_c")]
    category: String,
    #[serde(default, alias = "tenant_id_c", alias = "tenantId")]
    tenant_id: Option<Lookup>,
    #[serde(default, alias = "is_custom_c", alias = "isCustom")]
    is_custom: bool,
    #[serde(default, alias = "suggested_c")]
    suggested: bool,
}

impl PresetRecord {
    fn normalize(self) -> Preset {
        let tenant_id = self.tenant_id.as_ref().map(|t| TenantId(t.id()));
        Preset {
            id: PresetId(self.id),
            name: self.name,
            description: self.description,
            prompt: self.prompt,
            category: PresetCategory::parse(&self.category),
            // A preset owned by a tenant is custom whatever the flag says.
            is_custom: self.is_custom || tenant_id.is_some(),
            tenant_id,
            suggested: self.suggested,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentRecord {
    #[serde(alias = "Id")]
    id: i64,
    #[serde(alias = "input_c")]
    input: String,
    #[serde(alias = "preset_c")]
    preset: String,
    #[serde(default, alias = "brand_id_c", alias = "brandId")]
    brand_id: Option<Lookup>,
    #[serde(default, alias = "tenant_id_c", alias = "tenantId")]
    tenant_id: Option<Lookup>,
    #[serde(default, alias = "output_count_c", alias = "outputCount")]
    output_count: Option<u32>,
    #[serde(default, alias = "word_count_c", alias = "wordCount")]
    word_count: Option<u32>,
    #[serde(default, alias = "outputs_c")]
    outputs: Option<Embedded<BTreeMap<OutputType, String>>>,
    #[serde(default, alias = "created_at_c", alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

impl ContentRecord {
    fn normalize(self, now: DateTime<Utc>) -> Result<Content, DbError> {
        let outputs = decode_opt(self.outputs)?.unwrap_or_default();
        Ok(Content {
            id: ContentId(self.id),
            input: self.input,
            preset: self.preset,
            brand_id: self.brand_id.as_ref().map(|b| BrandId(b.id())),
            tenant_id: self.tenant_id.as_ref().map(|t| TenantId(t.id())),
            output_count: self
                .output_count
                .unwrap_or_else(|| u32::try_from(outputs.len()).unwrap_or(u32::MAX)),
            word_count: self.word_count.unwrap_or_else(|| total_words(&outputs)),
            created_at: self.created_at.unwrap_or(now),
            outputs,
        })
    }
}

/// A normalized set of fixture records, ready to be inserted.
#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
    pub tenants: Vec<Tenant>,
    pub brands: Vec<Brand>,
    pub presets: Vec<Preset>,
    pub contents: Vec<Content>,
}

impl FixtureSet {
    /// The fixtures shipped with this crate.
    pub fn bundled() -> Result<Self, DbError> {
        Self::parse(TENANTS_JSON, BRANDS_JSON, PRESETS_JSON, CONTENTS_JSON)
    }

    /// Parses and normalizes four JSON arrays of records.
    pub fn parse(
        tenants: &str,
        brands: &str,
        presets: &str,
        contents: &str,
    ) -> Result<Self, DbError> {
        let now = Utc::now();

        let mut tenants = serde_json::from_str::<Vec<TenantRecord>>(tenants)?
            .into_iter()
            .map(|r| r.normalize(now))
            .collect::<Result<Vec<_>, _>>()?;
        let mut brands: Vec<Brand> = serde_json::from_str::<Vec<BrandRecord>>(brands)?
            .into_iter()
            .map(|r| r.normalize(now))
            .collect();
        let presets = serde_json::from_str::<Vec<PresetRecord>>(presets)?
            .into_iter()
            .map(PresetRecord::normalize)
            .collect();
        let contents = serde_json::from_str::<Vec<ContentRecord>>(contents)?
            .into_iter()
            .map(|r| r.normalize(now))
            .collect::<Result<Vec<_>, _>>()?;

        // At most one default tenant, and one default brand per tenant.
        let mut seen_default = false;
        for tenant in tenants.iter_mut().filter(|t| t.is_default) {
            tenant.is_default = !seen_default;
            seen_default = true;
        }
        let mut tenants_with_default = HashSet::new();
        for brand in brands.iter_mut().filter(|b| b.is_default) {
            if let Some(tenant_id) = brand.tenant_id
                && !tenants_with_default.insert(tenant_id)
            {
                brand.is_default = false;
            }
        }

        Ok(Self {
            tenants,
            brands,
            presets,
            contents,
        })
    }
}

/// Counts of records inserted by [`seed_fixtures`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub tenants: usize,
    pub brands: usize,
    pub presets: usize,
    pub contents: usize,
}

/// Inserts `fixtures` with their ids into an empty store.
///
/// Does nothing when the store already holds tenants, so it is safe to
/// call on every start.
pub async fn seed_fixtures<C: Connection>(
    db: &Surreal<C>,
    fixtures: &FixtureSet,
) -> Result<SeedSummary, DbError> {
    let mut result = db.query("SELECT VALUE meta::id(id) FROM tenant LIMIT 1").await?;
    let existing: Vec<i64> = result.take(0)?;
    if !existing.is_empty() {
        info!("Store already populated, skipping fixtures");
        return Ok(SeedSummary::default());
    }

    let tenants = SurrealTenantRepository::new(db.clone());
    for tenant in &fixtures.tenants {
        tenants.insert(tenant).await?;
    }
    let brands = SurrealBrandRepository::new(db.clone());
    for brand in &fixtures.brands {
        brands.insert(brand).await?;
    }
    let presets = SurrealPresetRepository::new(db.clone());
    for preset in &fixtures.presets {
        presets.insert(preset).await?;
    }
    let contents = SurrealContentRepository::new(db.clone());
    for content in &fixtures.contents {
        contents.insert(content).await?;
    }

    let summary = SeedSummary {
        tenants: fixtures.tenants.len(),
        brands: fixtures.brands.len(),
        presets: fixtures.presets.len(),
        contents: fixtures.contents.len(),
    };
    info!(
        tenants = summary.tenants,
        brands = summary.brands,
        presets = summary.presets,
        contents = summary.contents,
        "Fixtures seeded"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_fixtures_parse() {
        let set = FixtureSet::bundled().unwrap();
        assert_eq!(set.tenants.len(), 2);
        assert_eq!(set.brands.len(), 4);
        assert!(set.presets.iter().any(|p| p.suggested));
        assert_eq!(set.contents.len(), 3);
    }

    #[test]
    fn legacy_names_and_encoded_fields_are_normalized() {
        let set = FixtureSet::bundled().unwrap();
        let demo = &set.tenants[0];
        assert_eq!(demo.name, "ContentCraft Demo");
        assert!(demo.is_default);
        assert_eq!(demo.subscription.plan, "professional");
        assert_eq!(demo.settings.max_brands, 10);

        // Lookup object form of tenant_id_c.
        assert_eq!(set.brands[0].tenant_id, Some(TenantId(1)));
        // outputs_c arrives as a JSON string.
        assert_eq!(set.contents[0].outputs.len(), 2);
        assert!(set.contents[0].outputs.contains_key(&OutputType::SeoTags));
    }

    #[test]
    fn missing_counts_are_derived_from_outputs() {
        let set = FixtureSet::bundled().unwrap();
        let salads = &set.contents[1];
        assert_eq!(salads.output_count, 2);
        assert_eq!(salads.word_count, total_words(&salads.outputs));
    }

    #[test]
    fn duplicate_defaults_keep_the_first() {
        let tenants = r#"[
            {"Id": 1, "Name": "One", "is_default_c": true},
            {"Id": 2, "Name": "Two", "is_default_c": true}
        ]"#;
        let brands = r#"[
            {"id": 1, "name": "A", "isDefault": true, "tenantId": 1},
            {"id": 2, "name": "B", "isDefault": true, "tenantId": 1},
            {"id": 3, "name": "C", "isDefault": true, "tenantId": 2}
        ]"#;
        let set = FixtureSet::parse(tenants, brands, "[]", "[]").unwrap();
        assert!(set.tenants[0].is_default);
        assert!(!set.tenants[1].is_default);
        let flags: Vec<bool> = set.brands.iter().map(|b| b.is_default).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn tenant_owned_preset_is_custom() {
        let presets = r#"[{"id": 9, "name": "Mine", "category": "blog", "tenantId": 3}]"#;
        let set = FixtureSet::parse("[]", "[]", presets, "[]").unwrap();
        assert!(set.presets[0].is_custom);
        assert_eq!(set.presets[0].category, PresetCategory::Blog);
    }
}
