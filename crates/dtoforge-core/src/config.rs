//! Configuration types for dtoforge.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default limit on nested DTO construction.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Top-level configuration, read from `dtoforge.toml`.
///
/// The same file may carry `[[dto]]` schema sections; those are loaded
/// separately by [`crate::schema::load_schema_from_toml`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Settings for the built-in rule validator.
    #[serde(default)]
    pub validator: ValidatorConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }
}

/// Engine-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum nesting depth for nested and collection DTO fields.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

/// Input normalization applied by the built-in validator before rules run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Trim leading and trailing whitespace from every string.
    #[serde(default = "default_true")]
    pub trim_strings: bool,

    /// Treat empty strings as `null`.
    #[serde(default = "default_true")]
    pub empty_string_as_null: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            trim_strings: true,
            empty_string_as_null: true,
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_true() -> bool {
    true
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
