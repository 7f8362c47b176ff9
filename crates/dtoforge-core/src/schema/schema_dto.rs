//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;

/// Raw TOML representation of a schema.
///
/// Reads the `[[dto]]` sections of `dtoforge.toml`; every other section is
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaDto {
    /// Declared classes.
    #[serde(rename = "dto", default)]
    pub classes: Vec<ClassDto>,
}

/// TOML representation of one class.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassDto {
    /// Class name (e.g., "Customer" or "billing::Address").
    pub name: String,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDto>,
}

/// TOML representation of one field.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDto {
    /// Field name.
    pub name: String,
    /// Input key (default: the field name).
    #[serde(default)]
    pub input: Option<String>,
    /// Type signature (e.g., "?string", "Collection<Address>").
    #[serde(rename = "type")]
    pub signature: String,
    /// Explicit pipe-separated rules.
    #[serde(default)]
    pub rules: Option<String>,
}
