//! Layered application configuration.
//!
//! Sources, lowest priority first: built-in defaults, the TOML file
//! (`contentcraft.toml` or `--config`), then `CONTENTCRAFT__*` environment
//! variables (`CONTENTCRAFT__DB__ENDPOINT=ws://...`).

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use contentcraft_db::DbConfig;
use contentcraft_session::SessionConfig;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "contentcraft.toml";
const ENV_PREFIX: &str = "CONTENTCRAFT";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db: DbConfig,
    pub session: SessionConfig,
    /// Seed the bundled fixtures into an empty store. Defaults to on for
    /// in-process stores and off otherwise.
    pub seed_fixtures: Option<bool>,
}

impl AppConfig {
    /// Loads the configuration. A missing file is only an error when the
    /// path was given explicitly.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };
        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn should_seed(&self) -> bool {
        self.seed_fixtures.unwrap_or_else(|| self.db.is_in_process())
    }
}
