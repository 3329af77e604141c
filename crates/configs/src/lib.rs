//! # configs
//!
//! Layered settings for the Q&A board: built-in defaults, then an optional
//! `qa-board.toml`, then `QA_BOARD__*` environment variables (a `.env` file
//! is read first outside of tests).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use qb_core::Category;
use qb_import::NormalizeOptions;
use serde::Deserialize;

/// Config file looked up in the working directory; its extension is optional.
pub const CONFIG_FILE: &str = "qa-board";
pub const ENV_PREFIX: &str = "QA_BOARD";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    pub default_category: String,
    pub placeholder_author: String,
    pub id_prefix: String,
    pub dashboard_limit: usize,
    /// Where the board is persisted between runs
    pub board_file: PathBuf,
    /// Default target of `export`
    pub export_file: PathBuf,
    pub log_format: LogFormat,
    /// Start a missing board file with the sample questions
    pub seed_samples: bool,
}

impl BoardConfig {
    /// Loads `qa-board.{toml,..}` from the working directory when present.
    pub fn load() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::layered(File::with_name(CONFIG_FILE).required(false), Self::environment())
    }

    /// Loads with `path` as the config file, which then must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::layered(File::from(path).required(true), Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn layered(
        file: File<config::FileSourceFile, config::FileFormat>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let defaults = NormalizeOptions::default();
        let settings = Config::builder()
            .set_default("default_category", defaults.default_category.as_str())?
            .set_default("placeholder_author", defaults.placeholder_author)?
            .set_default("id_prefix", defaults.id_prefix)?
            .set_default("dashboard_limit", defaults.dashboard_limit as u64)?
            .set_default("board_file", "qa-data.json")?
            .set_default("export_file", "qa-data.json")?
            .set_default("log_format", "pretty")?
            .set_default("seed_samples", true)?
            .add_source(file)
            .add_source(env)
            .build()?;

        let config: BoardConfig = settings.try_deserialize()?;
        config.normalize_options()?;
        tracing::debug!(board_file = %config.board_file.display(), "configuration loaded");
        Ok(config)
    }

    /// Options handed to the import normalizer.
    pub fn normalize_options(&self) -> Result<NormalizeOptions, ConfigError> {
        let default_category: Category = self.default_category.parse().map_err(|_| {
            ConfigError::InvalidValue("default_category".to_string(), self.default_category.clone())
        })?;
        if self.dashboard_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "dashboard_limit".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(NormalizeOptions {
            default_category,
            placeholder_author: self.placeholder_author.clone(),
            id_prefix: self.id_prefix.clone(),
            dashboard_limit: self.dashboard_limit,
        })
    }
}
