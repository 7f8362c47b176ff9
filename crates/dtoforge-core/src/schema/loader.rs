//! DTO → Domain model conversion with validation.

use crate::field::{FieldMeta, ModelError};

use super::model::{ClassName, DtoClass, Schema};
use super::schema_dto::{ClassDto, FieldDto, SchemaDto};

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "dto[0].fields[1].type").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// Errors from aggregate root construction.
    #[error("schema validation errors:\n{}", format_errors(.0))]
    CrossRef(Vec<ModelError>),
}

fn format_errors(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts a `SchemaDto` to a validated `Schema`.
///
/// # Errors
///
/// Returns the first field-level error, or every duplicate class.
pub fn load(dto: SchemaDto) -> Result<Schema, LoadError> {
    let classes = dto
        .classes
        .iter()
        .enumerate()
        .map(|(i, c)| convert_class(c, i))
        .collect::<Result<Vec<_>, _>>()?;

    Schema::new(classes).map_err(LoadError::CrossRef)
}

fn convert_class(dto: &ClassDto, index: usize) -> Result<DtoClass, LoadError> {
    let ctx = format!("dto[{index}]");
    let name = ClassName::new(&dto.name).map_err(|e| LoadError::Validation {
        context: format!("{ctx}.name"),
        source: e,
    })?;

    let fields = dto
        .fields
        .iter()
        .enumerate()
        .map(|(j, f)| convert_field(f, &format!("{ctx}.fields[{j}]")))
        .collect::<Result<Vec<_>, _>>()?;

    DtoClass::new(name, fields).map_err(|e| LoadError::Validation {
        context: ctx,
        source: e,
    })
}

fn convert_field(dto: &FieldDto, ctx: &str) -> Result<FieldMeta, LoadError> {
    let field = FieldMeta::new(&dto.name, &dto.signature).map_err(|e| {
        let part = if matches!(e, ModelError::EmptyFieldName) {
            "name"
        } else {
            "type"
        };
        LoadError::Validation {
            context: format!("{ctx}.{part}"),
            source: e,
        }
    })?;

    let field = match &dto.input {
        Some(input) => field.with_input(input).map_err(|e| LoadError::Validation {
            context: format!("{ctx}.input"),
            source: e,
        })?,
        None => field,
    };

    Ok(match &dto.rules {
        Some(rules) => field.with_rules(rules.as_str()),
        None => field,
    })
}
