//! Errors raised by DTO construction.

use crate::validator::FieldErrors;
use miette::Diagnostic;

/// Why a DTO could not be constructed.
///
/// Construction is all-or-nothing: every variant is returned straight to
/// the caller of `create`, never recovered internally.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Diagnostic)]
pub enum DtoError {
    /// Input broke a composed rule. Fix the input and retry.
    #[error("{class}: {message}")]
    #[diagnostic(
        code(dtoforge::validation),
        help("the input does not satisfy the DTO schema")
    )]
    Validation {
        /// Class whose rules failed.
        class: String,
        /// First message of the first failing field.
        message: String,
        /// Every reported field error.
        errors: FieldErrors,
    },

    /// The DTO declaration itself is wrong (for example `Collection<string>`
    /// or an unknown rule name).
    #[error("{class}.{field}: {message}")]
    #[diagnostic(
        code(dtoforge::schema_configuration),
        help("this is a defect in the DTO declaration, not in the input")
    )]
    SchemaConfiguration {
        /// Owning class.
        class: String,
        /// Field whose declaration is wrong.
        field: String,
        /// What is wrong.
        message: String,
    },

    /// A validated key has no field metadata.
    ///
    /// Rule composition and hydration read the same metadata, so this only
    /// happens if a validator returns keys it was never given.
    #[error("{class}: validated key `{key}` has no field metadata")]
    #[diagnostic(
        code(dtoforge::metadata_lookup),
        help("the validator returned a key outside the rule set")
    )]
    MetadataLookup {
        /// Owning class.
        class: String,
        /// Key without metadata.
        key: String,
    },

    /// A validated value does not fit the field's Rust type.
    #[error("{class}.{field}: {message}")]
    #[diagnostic(
        code(dtoforge::conversion),
        help("tighten the field rules so validation rejects this value")
    )]
    Conversion {
        /// Owning class.
        class: String,
        /// Field being assigned.
        field: String,
        /// Deserialization error.
        message: String,
    },

    /// Nested construction went deeper than the engine allows.
    #[error("{class}: nesting exceeds the maximum depth of {max_depth}")]
    #[diagnostic(code(dtoforge::depth_exceeded))]
    DepthExceeded {
        /// Class that would have been constructed.
        class: String,
        /// Configured limit.
        max_depth: usize,
    },

    /// No class of that name is registered in the schema.
    #[error("unknown DTO class `{class}`")]
    #[diagnostic(code(dtoforge::unknown_class))]
    UnknownClass {
        /// Requested class name.
        class: String,
    },
}

impl DtoError {
    /// Creates a validation error from reported field errors.
    ///
    /// The message is the first message of the first failing field.
    #[must_use]
    pub fn validation(class: impl Into<String>, errors: FieldErrors) -> Self {
        let message = errors
            .first()
            .map_or_else(|| "validation failed".to_string(), |(_, m)| m.to_string());
        Self::Validation {
            class: class.into(),
            message,
            errors,
        }
    }

    /// Returns the class the error belongs to.
    #[must_use]
    pub fn class(&self) -> &str {
        match self {
            Self::Validation { class, .. }
            | Self::SchemaConfiguration { class, .. }
            | Self::MetadataLookup { class, .. }
            | Self::Conversion { class, .. }
            | Self::DepthExceeded { class, .. }
            | Self::UnknownClass { class } => class,
        }
    }

    /// Returns the human-readable message without the class prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message, .. }
            | Self::SchemaConfiguration { message, .. }
            | Self::Conversion { message, .. } => message.clone(),
            Self::MetadataLookup { key, .. } => {
                format!("validated key `{key}` has no field metadata")
            }
            Self::DepthExceeded { max_depth, .. } => {
                format!("nesting exceeds the maximum depth of {max_depth}")
            }
            Self::UnknownClass { class } => format!("unknown DTO class `{class}`"),
        }
    }

    /// Returns the field errors of a validation failure.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// True if the caller can fix this by resupplying input.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::DepthExceeded { .. })
    }
}
