//! SurrealDB implementation of [`PresetRepository`].
//!
//! System presets are stored with no tenant and are read-only through this
//! repository; they only enter the store through fixtures.

use contentcraft_core::error::{CraftError, CraftResult};
use contentcraft_core::models::preset::{
    CreatePreset, Preset, PresetCategory, UpdatePreset,
};
use contentcraft_core::models::{PresetId, TenantId};
use contentcraft_core::repository::PresetRepository;
use contentcraft_core::selection::resolve_default;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use super::{require_tenant, sequence};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PresetRow {
    record_id: i64,
    tenant_id: Option<i64>,
    name: String,
    description: String,
    prompt: String,
    category: String,
    is_custom: bool,
    suggested: bool,
}

impl From<PresetRow> for Preset {
    fn from(row: PresetRow) -> Self {
        Preset {
            id: PresetId(row.record_id),
            name: row.name,
            description: row.description,
            prompt: row.prompt,
            category: PresetCategory::parse(&row.category),
            tenant_id: row.tenant_id.map(TenantId),
            is_custom: row.is_custom,
            suggested: row.suggested,
        }
    }
}

/// SurrealDB implementation of the Preset repository.
#[derive(Clone)]
pub struct SurrealPresetRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPresetRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn write(&self, statement: &str, preset: &Preset) -> Result<(), DbError> {
        let query = format!(
            "{statement} type::record('preset', $id) SET \
             tenant_id = $tenant_id, name = $name, description = $description, \
             prompt = $prompt, category = $category, is_custom = $is_custom, \
             suggested = $suggested"
        );

        self.db
            .query(query)
            .bind(("id", preset.id.get()))
            .bind(("tenant_id", preset.tenant_id.map(TenantId::get)))
            .bind(("name", preset.name.clone()))
            .bind(("description", preset.description.clone()))
            .bind(("prompt", preset.prompt.clone()))
            .bind(("category", preset.category.as_str()))
            .bind(("is_custom", preset.is_custom))
            .bind(("suggested", preset.suggested))
            .await?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;
        Ok(())
    }

    pub(crate) async fn insert(&self, preset: &Preset) -> Result<(), DbError> {
        self.write("CREATE", preset).await?;
        sequence::advance_to(&self.db, "preset", preset.id.get()).await
    }

    /// Loads a preset and rejects system presets.
    async fn get_custom(&self, id: PresetId) -> CraftResult<Preset> {
        let preset = self.get_by_id(id).await?;
        if preset.is_system() {
            return Err(CraftError::permission_denied(format!(
                "system preset {} cannot be modified",
                preset.name
            )));
        }
        Ok(preset)
    }
}

impl<C: Connection> PresetRepository for SurrealPresetRepository<C> {
    async fn get_all(&self, tenant_id: Option<TenantId>) -> CraftResult<Vec<Preset>> {
        // System presets have no tenant and belong to everyone.
        let query = match tenant_id {
            Some(tenant_id) => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM preset \
                     WHERE tenant_id = NONE OR tenant_id = $tenant_id ORDER BY id ASC",
                )
                .bind(("tenant_id", tenant_id.get())),
            None => self
                .db
                .query("SELECT meta::id(id) AS record_id, * FROM preset ORDER BY id ASC"),
        };
        let mut result = query.await.map_err(DbError::from)?;

        let rows: Vec<PresetRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(Preset::from).collect())
    }

    async fn get_by_id(&self, id: PresetId) -> CraftResult<Preset> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM preset \
                 WHERE id = type::record('preset', $id)",
            )
            .bind(("id", id.get()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PresetRow> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .next()
            .map(Preset::from)
            .ok_or_else(|| CraftError::not_found("preset", id))
    }

    async fn get_by_category(
        &self,
        category: PresetCategory,
        tenant_id: Option<TenantId>,
    ) -> CraftResult<Vec<Preset>> {
        let mut presets = self.get_all(tenant_id).await?;
        presets.retain(|p| p.category == category);
        Ok(presets)
    }

    async fn create(&self, input: CreatePreset) -> CraftResult<Preset> {
        let tenant_id = input
            .tenant_id
            .ok_or_else(|| CraftError::validation("custom presets require a tenant"))?;
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(CraftError::validation("preset name is required"));
        }
        require_tenant(&self.db, tenant_id.get()).await?;

        let preset = Preset {
            id: PresetId(sequence::next_id(&self.db, "preset").await?),
            name,
            description: input.description,
            prompt: input.prompt,
            category: input.category,
            tenant_id: Some(tenant_id),
            is_custom: true,
            suggested: input.suggested,
        };
        self.write("CREATE", &preset).await?;

        info!(preset_id = %preset.id, tenant_id = %tenant_id, "Custom preset created");
        Ok(preset)
    }

    async fn update(&self, id: PresetId, input: UpdatePreset) -> CraftResult<Preset> {
        let mut preset = self.get_custom(id).await?;

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(CraftError::validation("preset name is required"));
            }
            preset.name = name;
        }
        if let Some(description) = input.description {
            preset.description = description;
        }
        if let Some(prompt) = input.prompt {
            preset.prompt = prompt;
        }
        if let Some(category) = input.category {
            preset.category = category;
        }
        if let Some(suggested) = input.suggested {
            preset.suggested = suggested;
        }

        self.write("UPDATE", &preset).await?;
        Ok(preset)
    }

    async fn delete(&self, id: PresetId) -> CraftResult<()> {
        self.get_custom(id).await?;

        self.db
            .query("DELETE type::record('preset', $id)")
            .bind(("id", id.get()))
            .await
            .map_err(DbError::from)?;

        info!(preset_id = %id, "Custom preset deleted");
        Ok(())
    }

    async fn get_default(&self, tenant_id: Option<TenantId>) -> CraftResult<Option<Preset>> {
        let presets = self.get_all(tenant_id).await?;
        Ok(resolve_default(&presets).cloned())
    }
}
