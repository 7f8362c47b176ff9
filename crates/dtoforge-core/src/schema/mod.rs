//! Schema-declared DTO classes driven by TOML configuration.
//!
//! Classes declared here are constructed by
//! [`Engine::create_dynamic`](crate::Engine::create_dynamic) into
//! [`DtoInstance`](crate::DtoInstance) values.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! schema_dto types
//!   ↓ validate + convert
//! Schema (pure domain model, rule sets precomputed)
//! ```

use tracing::{info, warn};

pub mod loader;
pub mod model;
pub mod schema_dto;

pub use model::{ClassName, DanglingReference, DtoClass, Schema};

/// Errors from parsing TOML and loading a schema.
#[derive(Debug, thiserror::Error)]
pub enum LoadSchemaError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),
}

/// Parses TOML content and builds the schema of its `[[dto]]` sections.
///
/// Returns an empty schema if no classes are declared. Collection fields
/// naming undeclared classes are logged as warnings.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_schema_from_toml(content: &str) -> Result<Schema, LoadSchemaError> {
    let dto: schema_dto::SchemaDto = toml::from_str(content)?;
    let schema = loader::load(dto)?;

    for dangling in schema.dangling_references() {
        warn!(
            class = %dangling.class,
            field = %dangling.field,
            target = %dangling.target,
            "collection field names an undeclared class"
        );
    }
    info!(classes = schema.len(), "loaded DTO schema");

    Ok(schema)
}
