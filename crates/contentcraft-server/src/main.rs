//! ContentCraft — command-line entry point.
//!
//! Connects to the configured store, applies migrations, seeds fixtures
//! into an empty in-process store, resolves the tenant/brand selection and
//! prints a JSON summary of the selected scope.
//!
//! Logs go to stderr, so stdout carries nothing but the summary document.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use contentcraft_core::error::CraftError;
use contentcraft_core::models::TenantId;
use contentcraft_db::repository::{
    SurrealBrandRepository, SurrealContentRepository, SurrealPresetRepository,
    SurrealTenantRepository,
};
use contentcraft_db::{DbError, DbManager, FixtureSet, run_migrations, seed_fixtures};
use contentcraft_session::{
    ContentStudio, Phase, PlaceholderAssembler, SessionError, SessionHandle,
};
use serde_json::{Value, json};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "contentcraft", about = "Resolve and inspect a ContentCraft workspace")]
struct Cli {
    /// Configuration file (default: ./contentcraft.toml if present).
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Store endpoint, overriding the configuration (e.g. `mem://`).
    #[arg(long)]
    endpoint: Option<String>,

    /// Switch to this tenant after the default selection settles.
    #[arg(long)]
    tenant: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("store connection failed: {0}")]
    Connect(#[from] surrealdb::Error),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Craft(#[from] CraftError),

    #[error("summary serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("contentcraft=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "ContentCraft failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, AppError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.db.endpoint = endpoint;
    }
    let summary = summarize(&config, cli.tenant.map(TenantId)).await?;
    Ok(serde_json::to_string_pretty(&summary)?)
}

/// Bootstraps the store and session and describes the resolved scope.
async fn summarize(config: &AppConfig, tenant: Option<TenantId>) -> Result<Value, AppError> {
    let manager = DbManager::connect(&config.db).await?;
    let db = manager.client().clone();
    run_migrations(&db).await?;
    if config.should_seed() {
        seed_fixtures(&db, &FixtureSet::bundled()?).await?;
    }

    let session = SessionHandle::spawn(
        SurrealTenantRepository::new(db.clone()),
        SurrealBrandRepository::new(db.clone()),
    );
    session.start().await?;
    let mut state = session.wait_until_settled().await?;
    if let Some(tenant) = tenant {
        session.switch_tenant(tenant).await?;
        state = session.wait_until_settled().await?;
    }

    if let Phase::Error { fault } = state.phase() {
        return Err(fault.to_error().into());
    }
    if let Some(view_error) = state.view_error() {
        return Err(CraftError::Backend(view_error.message.clone()).into());
    }
    let Some(tenant) = state.current_tenant() else {
        return Err(SessionError::NoTenant.into());
    };
    info!(tenant_id = %tenant.id, tenant = %tenant.name, "Selection resolved");

    let studio = ContentStudio::new(
        SurrealPresetRepository::new(db.clone()),
        SurrealContentRepository::new(db),
        PlaceholderAssembler,
        config.session.clone(),
    );
    let brand_id = state.current_brand().map(|b| b.id);
    let overview = studio.overview(tenant.id, brand_id).await?;
    let library: Vec<Value> = overview
        .categories
        .iter()
        .map(|(category, count)| {
            json!({ "category": category, "label": category.label(), "count": count })
        })
        .collect();
    Ok(json!({
        "tenant": tenant,
        "brand": state.current_brand(),
        "brands": state.brands(),
        "presets": studio.presets(tenant.id).await?,
        "recent": studio.recent(tenant.id, brand_id).await?,
        "library": library,
        "overview": overview,
        "default_output_types": studio.default_output_types(),
    }))
}
