//! Configuration management for qforum

use crate::error::{ForumError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Content lifecycle settings
    pub content: ContentConfig,
    /// Listing settings
    pub listing: ListingConfig,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ForumError::Toml(e.to_string()))
    }

    /// Load configuration from a file, falling back to defaults if it is missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| e.with_context(format!("{}", path.display())))
    }

    /// Render as pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ForumError::Toml(e.to_string()))
    }
}

/// Database-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL; when unset the CLI uses a file in the data directory
    pub url: Option<String>,
    /// Pool size
    pub max_connections: u32,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Log every SQL statement at debug level
    pub sql_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
            connect_timeout_secs: 8,
            sql_logging: false,
        }
    }
}

impl DatabaseConfig {
    /// Config pointing at a SQLite file, created on first connect
    pub fn sqlite_file(path: &Path) -> Self {
        Self {
            url: Some(sqlite_url(path)),
            ..Self::default()
        }
    }
}

/// SQLite URL for a database file, created if missing
pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

/// What happens to authored content when its user is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserDeletePolicy {
    /// Questions, answers and comments go with the user
    #[default]
    Cascade,
    /// Refuse while the user still authors anything
    Restrict,
}

/// Content lifecycle configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub user_delete: UserDeletePolicy,
}

/// Listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Questions per page
    pub per_page: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            per_page: crate::model::DEFAULT_PER_PAGE,
        }
    }
}
