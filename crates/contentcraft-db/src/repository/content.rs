use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use contentcraft_core::error::{CraftError, CraftResult};
use contentcraft_core::models::content::{Content, CreateContent, OutputType, total_words};
use contentcraft_core::models::{BrandId, ContentId, TenantId};
use contentcraft_core::repository::ContentRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use super::{require_tenant, sequence};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ContentRow {
    record_id: i64,
    tenant_id: Option<i64>,
    brand_id: Option<i64>,
    input: String,
    preset: String,
    output_count: i64,
    word_count: i64,
    outputs: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl ContentRow {
    fn try_into_content(self) -> Result<Content, DbError> {
        let id = self.record_id;
        let decode = |message: String| DbError::Decode {
            entity: "content",
            message: format!("content {id}: {message}"),
        };
        let outputs: BTreeMap<OutputType, String> =
            serde_json::from_value(self.outputs).map_err(|e| decode(e.to_string()))?;
        Ok(Content {
            id: ContentId(id),
            input: self.input,
            preset: self.preset,
            brand_id: self.brand_id.map(BrandId),
            tenant_id: self.tenant_id.map(TenantId),
            output_count: u32::try_from(self.output_count).map_err(|e| decode(e.to_string()))?,
            word_count: u32::try_from(self.word_count).map_err(|e| decode(e.to_string()))?,
            created_at: self.created_at,
            outputs,
        })
    }
}

/// SurrealDB implementation of the Content repository.
#[derive(Clone)]
pub struct SurrealContentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealContentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    pub(crate) async fn insert(&self, content: &Content) -> Result<(), DbError> {
        self.db
            .query(
                "CREATE type::record('content', $id) SET \
                 tenant_id = $tenant_id, brand_id = $brand_id, input = $input, \
                 preset = $preset, output_count = $output_count, \
                 word_count = $word_count, outputs = $outputs, \
                 created_at = $created_at",
            )
            .bind(("id", content.id.get()))
            .bind(("tenant_id", content.tenant_id.map(TenantId::get)))
            .bind(("brand_id", content.brand_id.map(BrandId::get)))
            .bind(("input", content.input.clone()))
            .bind(("preset", content.preset.clone()))
            .bind(("output_count", i64::from(content.output_count)))
            .bind(("word_count", i64::from(content.word_count)))
            .bind(("outputs", serde_json::to_value(&content.outputs)?))
            .bind(("created_at", content.created_at))
            .await?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        sequence::advance_to(&self.db, "content", content.id.get()).await
    }
}

impl<C: Connection> ContentRepository for SurrealContentRepository<C> {
    async fn get_all(&self, tenant_id: Option<TenantId>) -> CraftResult<Vec<Content>> {
        let query = match tenant_id {
            Some(tenant_id) => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM content \
                     WHERE tenant_id = $tenant_id ORDER BY id ASC",
                )
                .bind(("tenant_id", tenant_id.get())),
            None => self
                .db
                .query("SELECT meta::id(id) AS record_id, * FROM content ORDER BY id ASC"),
        };
        let mut result = query.await.map_err(DbError::from)?;

        let rows: Vec<ContentRow> = result.take(0).map_err(DbError::from)?;
        let contents = rows
            .into_iter()
            .map(ContentRow::try_into_content)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contents)
    }

    async fn get_by_id(&self, id: ContentId) -> CraftResult<Content> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM content \
                 WHERE id = type::record('content', $id)",
            )
            .bind(("id", id.get()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ContentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| CraftError::not_found("content", id))?;
        Ok(row.try_into_content()?)
    }

    async fn create(&self, input: CreateContent) -> CraftResult<Content> {
        if input.input.trim().is_empty() {
            return Err(CraftError::validation("content input is required"));
        }
        if input.preset.trim().is_empty() {
            return Err(CraftError::validation("content preset is required"));
        }
        require_tenant(&self.db, input.tenant_id.get()).await?;

        let output_count = input
            .output_count
            .unwrap_or_else(|| u32::try_from(input.outputs.len()).unwrap_or(u32::MAX));
        let word_count = input
            .word_count
            .unwrap_or_else(|| total_words(&input.outputs));

        let content = Content {
            id: ContentId(sequence::next_id(&self.db, "content").await?),
            input: input.input,
            preset: input.preset,
            brand_id: input.brand_id,
            tenant_id: Some(input.tenant_id),
            output_count,
            word_count,
            created_at: Utc::now(),
            outputs: input.outputs,
        };
        self.insert(&content).await?;

        info!(
            content_id = %content.id,
            tenant_id = %input.tenant_id,
            output_count,
            word_count,
            "Content saved"
        );
        Ok(content)
    }

    async fn delete(&self, id: ContentId) -> CraftResult<()> {
        self.get_by_id(id).await?;

        self.db
            .query("DELETE type::record('content', $id)")
            .bind(("id", id.get()))
            .await
            .map_err(DbError::from)?;

        info!(content_id = %id, "Content deleted");
        Ok(())
    }

    async fn get_default(&self, tenant_id: Option<TenantId>) -> CraftResult<Option<Content>> {
        Ok(self.get_all(tenant_id).await?.into_iter().next())
    }
}
