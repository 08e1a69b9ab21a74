//! Content generation and the content library.

use std::collections::BTreeMap;

use chrono::Utc;
use contentcraft_core::error::{CraftError, CraftResult};
use contentcraft_core::library::{
    self, ContentQuery, ContentStats, DailyActivity, LibraryCategory,
};
use contentcraft_core::models::content::{Content, CreateContent, OutputType};
use contentcraft_core::models::preset::Preset;
use contentcraft_core::models::{BrandId, ContentId, PresetId, TenantId};
use contentcraft_core::repository::{ContentRepository, PresetRepository};
use contentcraft_core::scope::TenantScoped;
use serde::Serialize;
use tracing::info;

use crate::config::SessionConfig;

/// What an assembler sees for one generation run.
#[derive(Debug, Clone)]
pub struct AssemblyInput<'a> {
    pub preset: &'a Preset,
    pub input: &'a str,
}

/// Produces the text of one output type. Real generation lives behind
/// this trait.
pub trait ContentAssembler: Send + Sync {
    fn assemble(
        &self,
        source: &AssemblyInput<'_>,
        output: OutputType,
    ) -> impl Future<Output = CraftResult<String>> + Send;
}

/// Fills a fixed template with the preset name and an excerpt of the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderAssembler;

const EXCERPT_CHARS: usize = 100;

impl ContentAssembler for PlaceholderAssembler {
    async fn assemble(
        &self,
        source: &AssemblyInput<'_>,
        output: OutputType,
    ) -> CraftResult<String> {
        let excerpt: String = source.input.chars().take(EXCERPT_CHARS).collect();
        Ok(format!(
            "{} ({})\n\nGenerated {} based on: {excerpt}",
            output.display_name(),
            source.preset.name,
            output.tag()
        ))
    }
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub tenant_id: TenantId,
    pub brand_id: Option<BrandId>,
    pub preset_id: Option<PresetId>,
    pub text: String,
    /// Name of an uploaded file, used when `text` is blank.
    pub file_name: Option<String>,
    /// Requested outputs. They are assembled in this order and stored keyed
    /// by type, so the saved map follows `OutputType` order. Duplicates are
    /// ignored.
    pub output_types: Vec<OutputType>,
}

/// Everything the dashboard and analytics views show for one scope.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryOverview {
    pub stats: ContentStats,
    pub activity: Vec<DailyActivity>,
    pub distribution: Vec<(OutputType, usize)>,
    pub categories: Vec<(LibraryCategory, usize)>,
}

pub struct ContentStudio<P: PresetRepository, C: ContentRepository, A: ContentAssembler> {
    presets: P,
    contents: C,
    assembler: A,
    config: SessionConfig,
}

impl<P, C, A> ContentStudio<P, C, A>
where
    P: PresetRepository,
    C: ContentRepository,
    A: ContentAssembler,
{
    pub fn new(presets: P, contents: C, assembler: A, config: SessionConfig) -> Self {
        Self {
            presets,
            contents,
            assembler,
            config,
        }
    }

    pub fn default_output_types(&self) -> &[OutputType] {
        &self.config.default_output_types
    }

    /// System presets plus the tenant's custom presets.
    pub async fn presets(&self, tenant_id: TenantId) -> CraftResult<Vec<Preset>> {
        self.presets.get_all(Some(tenant_id)).await
    }

    /// Validates the request, assembles every requested output and saves
    /// the result with a snapshot of the preset name.
    pub async fn generate(&self, request: GenerateRequest) -> CraftResult<Content> {
        let preset_id = request
            .preset_id
            .ok_or_else(|| CraftError::validation("select a preset"))?;
        let text = request.text.trim();
        let input = match request.file_name.as_deref().map(str::trim) {
            _ if !text.is_empty() => text.to_string(),
            Some(name) if !name.is_empty() => format!("File: {name}"),
            _ => return Err(CraftError::validation("provide text or upload a file")),
        };
        if request.output_types.is_empty() {
            return Err(CraftError::validation("select at least one output type"));
        }

        let preset = self.presets.get_by_id(preset_id).await?;
        if !preset.visible_to(request.tenant_id) {
            return Err(CraftError::not_found("preset", preset_id));
        }

        let source = AssemblyInput {
            preset: &preset,
            input: &input,
        };
        let mut outputs = BTreeMap::new();
        for output in request.output_types {
            if outputs.contains_key(&output) {
                continue;
            }
            let text = self.assembler.assemble(&source, output).await?;
            outputs.insert(output, text);
        }

        let content = self
            .contents
            .create(CreateContent {
                tenant_id: request.tenant_id,
                brand_id: request.brand_id,
                input,
                preset: preset.name.clone(),
                outputs,
                output_count: None,
                word_count: None,
            })
            .await?;

        info!(
            content_id = %content.id,
            preset = %preset.name,
            outputs = content.output_count,
            "Content generated"
        );
        Ok(content)
    }

    /// The tenant's content matching `query`, most recent first.
    pub async fn library(
        &self,
        tenant_id: TenantId,
        query: &ContentQuery,
    ) -> CraftResult<Vec<Content>> {
        let contents = self.contents.get_all(Some(tenant_id)).await?;
        Ok(library::history(&contents, query)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn recent(
        &self,
        tenant_id: TenantId,
        brand_id: Option<BrandId>,
    ) -> CraftResult<Vec<Content>> {
        let contents = self.contents.get_all(Some(tenant_id)).await?;
        let query = ContentQuery::for_brand(brand_id);
        Ok(library::recent(&contents, &query, self.config.recent_content_limit)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn overview(
        &self,
        tenant_id: TenantId,
        brand_id: Option<BrandId>,
    ) -> CraftResult<LibraryOverview> {
        let all = self.contents.get_all(Some(tenant_id)).await?;
        let query = ContentQuery::for_brand(brand_id);
        let contents: Vec<Content> = all.into_iter().filter(|c| query.matches(c)).collect();
        let now = Utc::now();

        Ok(LibraryOverview {
            stats: library::stats(&contents, now, self.config.stats_window_days),
            activity: library::daily_activity(&contents, now, self.config.activity_days),
            distribution: library::output_distribution(&contents),
            categories: library::category_counts(&contents),
        })
    }

    /// Deletes content owned by `tenant_id`.
    pub async fn delete_content(&self, tenant_id: TenantId, id: ContentId) -> CraftResult<()> {
        let content = self.contents.get_by_id(id).await?;
        if !content.visible_to(tenant_id) {
            return Err(CraftError::not_found("content", id));
        }
        self.contents.delete(id).await
    }

    /// Deletes one of the tenant's custom presets. System presets are
    /// refused by the store.
    pub async fn delete_preset(&self, tenant_id: TenantId, id: PresetId) -> CraftResult<()> {
        let preset = self.presets.get_by_id(id).await?;
        if !preset.visible_to(tenant_id) {
            return Err(CraftError::not_found("preset", id));
        }
        self.presets.delete(id).await
    }
}
