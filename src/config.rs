//! Category table configuration.
//!
//! The organize operation ships with a built-in category table, but the
//! table can be overridden via a TOML configuration file. Order of the
//! `[[category]]` entries is the table order used for classification.
//!
//! # Configuration File Format
//!
//! ```toml
//! [[category]]
//! name = "图片"
//! extensions = [".jpg", ".jpeg", ".png"]
//!
//! [[category]]
//! name = "文档"
//! extensions = [".pdf", ".txt"]
//! ```

use crate::category::{CategoryTable, CategoryTableError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// The declared categories do not form a valid table.
    InvalidTable(CategoryTableError),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidTable(err) => write!(f, "Invalid category table: {}", err),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Category table declarations deserialized from TOML.
///
/// An empty configuration (no `[[category]]` entries) means "use the
/// built-in table".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Ordered category declarations.
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryDef>,
}

/// One `[[category]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    pub extensions: Vec<String>,
}

impl CategoryConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.batchkitrc.toml` in the current directory
    /// 3. Look for `~/.config/batchkit/config.toml` in home directory
    /// 4. Fall back to the empty (built-in table) configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".batchkitrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("batchkit")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds the category table this configuration describes.
    ///
    /// Validation (duplicate extensions, missing dots) happens here, at
    /// table-construction time, not during classification.
    pub fn into_table(self) -> Result<CategoryTable, ConfigError> {
        if self.categories.is_empty() {
            return Ok(CategoryTable::default());
        }

        CategoryTable::new(
            self.categories
                .into_iter()
                .map(|def| (def.name, def.extensions)),
        )
        .map_err(ConfigError::InvalidTable)
    }
}
