//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (COVERCACHE_*)
//! 2. TOML config file (if COVERCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (COVERCACHE_*)
/// 2. TOML config file (if COVERCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cover cache.
    ///
    /// Set via COVERCACHE_DB_PATH environment variable. The cache location
    /// is always explicit; nothing is derived from the install directory.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Path to the publisher metadata CSV.
    ///
    /// Set via COVERCACHE_METADATA_CSV environment variable.
    /// Required only when a batch run starts.
    #[serde(default)]
    pub metadata_csv: Option<PathBuf>,

    /// Whether excluded rows appear in the output sequence as placeholders.
    ///
    /// Set via COVERCACHE_KEEP_SKIPPED_ROWS environment variable. Callers
    /// that index row output against input positions need this on.
    #[serde(default)]
    pub keep_skipped_rows: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./covercache.sqlite")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { db_path: default_db_path(), metadata_csv: None, keep_skipped_rows: false }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `COVERCACHE_`
    /// 2. TOML file from `COVERCACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("COVERCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("COVERCACHE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check that a metadata CSV is configured (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no metadata CSV path is set.
    pub fn require_metadata_csv(&self) -> Result<&Path, ConfigError> {
        self.metadata_csv.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "metadata_csv".into(),
            hint: "Set COVERCACHE_METADATA_CSV environment variable".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./covercache.sqlite"));
        assert!(config.metadata_csv.is_none());
        assert!(!config.keep_skipped_rows);
    }

    #[test]
    fn test_require_metadata_csv_missing() {
        let config = AppConfig::default();
        let result = config.require_metadata_csv();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_metadata_csv_present() {
        let config =
            AppConfig { metadata_csv: Some(PathBuf::from("books.csv")), ..Default::default() };
        let result = config.require_metadata_csv();
        assert_eq!(result.unwrap(), Path::new("books.csv"));
    }
}
