//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     HEMMA_DB_PATH=/tmp/hemma.db                                        │
//! │     HEMMA_MAX_CONNECTIONS=2                                            │
//! │     HEMMA_SEED_DEMO=false                                              │
//! │     HEMMA_LOG=debug                                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/hemma/hemma.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.hemma.storefront/hemma.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     <platform data dir>/hemma.db, demo catalog on                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/var/lib/hemma/hemma.db"
//! max_connections = 5
//! rebuild_on_schema_change = true
//!
//! [catalog]
//! seed_demo_products = true
//!
//! [service]
//! command_buffer = 64
//!
//! [logging]
//! filter = "info,hemma=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::service::ServiceConfig;
use hemma_db::DbConfig;

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info,hemma=debug,sqlx=warn";

const CONFIG_FILE_NAME: &str = "hemma.toml";
const DATABASE_FILE_NAME: &str = "hemma.db";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "hemma", "storefront")
}

// =============================================================================
// Sections
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. `None` means `<platform data dir>/hemma.db`.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Drop and recreate tables when the stored schema is incompatible.
    #[serde(default = "default_true")]
    pub rebuild_on_schema_change: bool,
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
            rebuild_on_schema_change: true,
        }
    }
}

/// `[catalog]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Write the demo products into an empty store on first load.
    #[serde(default = "default_true")]
    pub seed_demo_products: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            seed_demo_products: true,
        }
    }
}

/// `[service]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Capacity of the facade's command queue.
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,
}

fn default_command_buffer() -> usize {
    64
}

impl Default for ServiceSettings {
    fn default() -> Self {
        ServiceSettings {
            command_buffer: default_command_buffer(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive. `RUST_LOG` still wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub service: ServiceSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`hemma.toml`), if it exists
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| {
                    ConfigError::Read {
                        path: path.clone(),
                        source,
                    }
                })?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document; missing sections take their defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.service.command_buffer == 0 {
            return Err(ConfigError::Invalid(
                "service.command_buffer must be greater than 0".into(),
            ));
        }

        if matches!(&self.database.path, Some(p) if p.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid("database.path is empty".into()));
        }

        Ok(())
    }

    /// Applies `HEMMA_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("HEMMA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(max) = lookup("HEMMA_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring invalid HEMMA_MAX_CONNECTIONS"),
            }
        }

        if let Some(seed) = lookup("HEMMA_SEED_DEMO") {
            match parse_bool(&seed) {
                Some(b) => self.catalog.seed_demo_products = b,
                None => warn!(value = %seed, "Ignoring invalid HEMMA_SEED_DEMO"),
            }
        }

        if let Some(filter) = lookup("HEMMA_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Resolves the database file, creating the platform data dir if needed.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|source| ConfigError::Read {
            path: data_dir.to_path_buf(),
            source,
        })?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }

    /// Builds the database pool configuration.
    pub fn db_config(&self) -> ConfigResult<DbConfig> {
        Ok(DbConfig::new(self.database_path()?)
            .max_connections(self.database.max_connections)
            .min_connections(1)
            .rebuild_on_schema_change(self.database.rebuild_on_schema_change))
    }

    /// Builds the facade configuration.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            command_buffer: self.service.command_buffer,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.database.max_connections, 5);
        assert!(config.database.rebuild_on_schema_change);
        assert!(config.catalog.seed_demo_products);
        assert_eq!(config.service.command_buffer, 64);
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [database]
            path = "/tmp/shop.db"

            [catalog]
            seed_demo_products = false
            "#,
        )
        .unwrap();

        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(config.database.max_connections, 5);
        assert!(!config.catalog.seed_demo_products);
        assert_eq!(config.service, ServiceSettings::default());
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        assert!(matches!(
            AppConfig::from_toml("[database]\nmax_connections = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[
            ("HEMMA_DB_PATH", "/data/h.db"),
            ("HEMMA_MAX_CONNECTIONS", "2"),
            ("HEMMA_SEED_DEMO", "off"),
            ("HEMMA_LOG", "debug"),
        ]));

        assert_eq!(config.database.path, Some(PathBuf::from("/data/h.db")));
        assert_eq!(config.database.max_connections, 2);
        assert!(!config.catalog.seed_demo_products);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[
            ("HEMMA_MAX_CONNECTIONS", "lots"),
            ("HEMMA_SEED_DEMO", "maybe"),
        ]));

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.service.command_buffer = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.database.path = Some(PathBuf::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_path_used_for_db_config() {
        let mut config = AppConfig::default();
        config.database.path = Some(PathBuf::from(":memory:"));
        config.database.rebuild_on_schema_change = false;

        let db = config.db_config().unwrap();
        assert!(db.is_in_memory());
        assert!(!db.rebuild_on_schema_change);
        assert_eq!(config.service_config().command_buffer, 64);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load_or_default(Some(PathBuf::from(
            "/nonexistent/hemma/config.toml",
        )));
        assert_eq!(config.service, ServiceSettings::default());
    }
}
