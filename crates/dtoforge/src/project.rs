//! A loaded `dtoforge.toml`: configuration, declared schema and engine.

use dtoforge_core::{
    load_schema_from_toml, Config, ConfigError, Dto, DtoError, DtoInstance, Engine, EngineError,
    LoadSchemaError, Schema,
};
use dtoforge_rules::RuleValidator;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Errors from loading a project file.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The `[engine]` or `[validator]` section is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The `[[dto]]` sections are invalid.
    #[error(transparent)]
    Schema(#[from] LoadSchemaError),

    /// The engine could not be built.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Configuration, schema and an engine built from them.
pub struct Project {
    config: Config,
    schema: Schema,
    engine: Engine,
}

impl Project {
    /// Builds a project from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or schema is invalid.
    pub fn from_toml(content: &str) -> Result<Self, ProjectError> {
        let config = Config::parse(content)?;
        let schema = load_schema_from_toml(content)?;
        let engine = Engine::builder()
            .config(&config)
            .validator(RuleValidator::from_config(&config))
            .build()?;

        debug!(
            classes = schema.len(),
            max_depth = engine.max_depth(),
            "project loaded"
        );
        Ok(Self {
            config,
            schema,
            engine,
        })
    }

    /// Reads and builds a project from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content = std::fs::read_to_string(path).map_err(|e| ProjectError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the declared schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the engine.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Constructs an instance of a declared class.
    ///
    /// # Errors
    ///
    /// See [`Engine::create_dynamic`].
    pub fn create(&self, class: &str, input: &Value) -> Result<DtoInstance, DtoError> {
        self.engine.create_dynamic(&self.schema, class, input)
    }

    /// Constructs a statically typed DTO with this project's settings.
    ///
    /// # Errors
    ///
    /// See [`Engine::create`].
    pub fn create_typed<T: Dto>(&self, input: &Value) -> Result<T, DtoError> {
        self.engine.create(input)
    }
}
