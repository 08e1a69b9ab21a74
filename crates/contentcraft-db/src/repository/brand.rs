use chrono::{DateTime, Utc};
use contentcraft_core::error::{CraftError, CraftResult};
use contentcraft_core::models::brand::{
    Brand, CreateBrand, DEFAULT_BRAND_COLOR, DEFAULT_BRAND_EMOJI, UpdateBrand, normalize_name,
    same_name,
};
use contentcraft_core::models::{BrandId, TenantId};
use contentcraft_core::repository::BrandRepository;
use contentcraft_core::selection::resolve_default;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use super::{require_tenant, sequence};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct BrandRow {
    record_id: i64,
    tenant_id: Option<i64>,
    name: String,
    color: String,
    emoji: String,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl From<BrandRow> for Brand {
    fn from(row: BrandRow) -> Self {
        Brand {
            id: BrandId(row.record_id),
            tenant_id: row.tenant_id.map(TenantId),
            name: row.name,
            color: row.color,
            emoji: row.emoji,
            is_default: row.is_default,
            created_at: row.created_at,
        }
    }
}

/// SurrealDB implementation of the Brand repository.
#[derive(Clone)]
pub struct SurrealBrandRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBrandRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn write(&self, statement: &str, brand: &Brand) -> Result<(), DbError> {
        let query = format!(
            "{statement} type::record('brand', $id) SET \
             tenant_id = $tenant_id, name = $name, color = $color, \
             emoji = $emoji, is_default = $is_default, created_at = $created_at"
        );

        self.db
            .query(query)
            .bind(("id", brand.id.get()))
            .bind(("tenant_id", brand.tenant_id.map(TenantId::get)))
            .bind(("name", brand.name.clone()))
            .bind(("color", brand.color.clone()))
            .bind(("emoji", brand.emoji.clone()))
            .bind(("is_default", brand.is_default))
            .bind(("created_at", brand.created_at))
            .await?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;
        Ok(())
    }

    pub(crate) async fn insert(&self, brand: &Brand) -> Result<(), DbError> {
        self.write("CREATE", brand).await?;
        sequence::advance_to(&self.db, "brand", brand.id.get()).await
    }

    /// Clears the default flag on every brand of `tenant_id`.
    async fn clear_defaults(&self, tenant_id: TenantId) -> Result<(), DbError> {
        self.db
            .query(
                "UPDATE brand SET is_default = false \
                 WHERE tenant_id = $tenant_id AND is_default = true",
            )
            .bind(("tenant_id", tenant_id.get()))
            .await?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;
        Ok(())
    }

    async fn ensure_unique_name(
        &self,
        tenant_id: TenantId,
        name: &str,
        own: Option<BrandId>,
    ) -> CraftResult<()> {
        let siblings = self.get_all(Some(tenant_id)).await?;
        if siblings
            .iter()
            .any(|b| Some(b.id) != own && same_name(&b.name, name))
        {
            return Err(CraftError::validation(format!(
                "a brand named \"{name}\" already exists"
            )));
        }
        Ok(())
    }
}

impl<C: Connection> BrandRepository for SurrealBrandRepository<C> {
    async fn get_all(&self, tenant_id: Option<TenantId>) -> CraftResult<Vec<Brand>> {
        let query = match tenant_id {
            Some(tenant_id) => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM brand \
                     WHERE tenant_id = $tenant_id ORDER BY id ASC",
                )
                .bind(("tenant_id", tenant_id.get())),
            None => self
                .db
                .query("SELECT meta::id(id) AS record_id, * FROM brand ORDER BY id ASC"),
        };
        let mut result = query.await.map_err(DbError::from)?;

        let rows: Vec<BrandRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(Brand::from).collect())
    }

    async fn get_by_id(&self, id: BrandId) -> CraftResult<Brand> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM brand \
                 WHERE id = type::record('brand', $id)",
            )
            .bind(("id", id.get()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BrandRow> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .next()
            .map(Brand::from)
            .ok_or_else(|| CraftError::not_found("brand", id))
    }

    async fn create(&self, input: CreateBrand) -> CraftResult<Brand> {
        let name = normalize_name(&input.name)
            .ok_or_else(|| CraftError::validation("brand name is required"))?;
        require_tenant(&self.db, input.tenant_id.get()).await?;
        self.ensure_unique_name(input.tenant_id, &name, None).await?;

        if input.is_default {
            self.clear_defaults(input.tenant_id).await?;
        }

        let brand = Brand {
            id: BrandId(sequence::next_id(&self.db, "brand").await?),
            tenant_id: Some(input.tenant_id),
            name,
            color: input
                .color
                .unwrap_or_else(|| DEFAULT_BRAND_COLOR.to_string()),
            emoji: input
                .emoji
                .unwrap_or_else(|| DEFAULT_BRAND_EMOJI.to_string()),
            is_default: input.is_default,
            created_at: Utc::now(),
        };
        self.write("CREATE", &brand).await?;

        info!(brand_id = %brand.id, tenant_id = %input.tenant_id, "Brand created");
        Ok(brand)
    }

    async fn update(&self, id: BrandId, input: UpdateBrand) -> CraftResult<Brand> {
        let mut brand = self.get_by_id(id).await?;

        if let Some(name) = input.name {
            let name = normalize_name(&name)
                .ok_or_else(|| CraftError::validation("brand name is required"))?;
            if let Some(tenant_id) = brand.tenant_id {
                self.ensure_unique_name(tenant_id, &name, Some(id)).await?;
            }
            brand.name = name;
        }
        if let Some(color) = input.color {
            brand.color = color;
        }
        if let Some(emoji) = input.emoji {
            brand.emoji = emoji;
        }
        if let Some(is_default) = input.is_default {
            if is_default
                && !brand.is_default
                && let Some(tenant_id) = brand.tenant_id
            {
                self.clear_defaults(tenant_id).await?;
            }
            brand.is_default = is_default;
        }

        self.write("UPDATE", &brand).await?;
        Ok(brand)
    }

    async fn delete(&self, id: BrandId) -> CraftResult<()> {
        let brand = self.get_by_id(id).await?;
        if brand.is_default {
            return Err(CraftError::permission_denied(
                "the default brand cannot be deleted",
            ));
        }

        // Content generated under this brand keeps its brand_id.
        self.db
            .query("DELETE type::record('brand', $id)")
            .bind(("id", id.get()))
            .await
            .map_err(DbError::from)?;

        info!(brand_id = %id, "Brand deleted");
        Ok(())
    }

    async fn get_default(&self, tenant_id: Option<TenantId>) -> CraftResult<Option<Brand>> {
        let brands = self.get_all(tenant_id).await?;
        Ok(resolve_default(&brands).cloned())
    }
}
