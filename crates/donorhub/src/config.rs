//! Configuration management for donorhub.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::directory::SortKey;
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "donorhub";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "registry.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `DONORHUB_`)
/// 2. TOML config file at `~/.config/donorhub/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Intake configuration.
    pub intake: IntakeConfig,
    /// Directory listing configuration.
    pub directory: DirectoryConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/donorhub/registry.db`
    pub database_path: Option<PathBuf>,
}

/// Intake-related configuration.
///
/// The age window is a form hint surfaced at the input boundary; the
/// registry itself never rejects an application on age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Minimum donor age offered by intake forms.
    pub min_donor_age: u8,
    /// Maximum donor age offered by intake forms.
    pub max_donor_age: u8,
}

/// Directory-listing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Sort order used when none is requested.
    pub default_sort: SortKey,
    /// Maximum number of entries a listing prints.
    /// Set to 0 for unlimited.
    pub result_limit: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            min_donor_age: 18,
            max_donor_age: 65,
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            default_sort: SortKey::Newest,
            result_limit: 50,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `DONORHUB_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("DONORHUB_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.intake.min_donor_age > self.intake.max_donor_age {
            return Err(Error::ConfigValidation {
                message: format!(
                    "min_donor_age ({}) cannot be greater than max_donor_age ({})",
                    self.intake.min_donor_age, self.intake.max_donor_age
                ),
            });
        }

        if self.intake.min_donor_age == 0 {
            return Err(Error::ConfigValidation {
                message: "min_donor_age must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}
