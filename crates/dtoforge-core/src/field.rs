//! Field metadata records.

use crate::signature::{FieldKind, TypeSignature};

/// Metadata describing one declared DTO field.
///
/// Built once per field by metadata discovery (the `Dto` derive or the
/// TOML schema loader) and immutable afterwards. The [`FieldKind`] is
/// classified at construction so hydration never re-inspects the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
    name: String,
    input_name: String,
    signature: TypeSignature,
    rules: Option<String>,
    kind: FieldKind,
}

impl FieldMeta {
    /// Creates metadata for a field whose input key equals its name.
    ///
    /// # Errors
    ///
    /// Returns error if the name or the signature is empty.
    pub fn new(name: &str, signature: &str) -> Result<Self, ModelError> {
        if name.trim().is_empty() {
            return Err(ModelError::EmptyFieldName);
        }
        let signature = TypeSignature::new(signature)?;
        let kind = FieldKind::classify(&signature);
        Ok(Self {
            name: name.to_string(),
            input_name: name.to_string(),
            signature,
            rules: None,
            kind,
        })
    }

    /// Creates metadata from parts already checked at compile time.
    ///
    /// Used by the `Dto` derive, which rejects empty names and signatures
    /// before emitting this call.
    #[doc(hidden)]
    #[must_use]
    pub fn declared(
        name: &str,
        input_name: &str,
        signature: &str,
        rules: Option<&str>,
    ) -> Self {
        let signature = TypeSignature::trusted(signature);
        let kind = FieldKind::classify(&signature);
        Self {
            name: name.to_string(),
            input_name: input_name.to_string(),
            signature,
            rules: rules.map(str::to_string),
            kind,
        }
    }

    /// Sets the external input key.
    ///
    /// # Errors
    ///
    /// Returns error if the key is empty.
    pub fn with_input(mut self, input_name: &str) -> Result<Self, ModelError> {
        if input_name.trim().is_empty() {
            return Err(ModelError::EmptyInputName {
                field: self.name.clone(),
            });
        }
        self.input_name = input_name.to_string();
        Ok(self)
    }

    /// Sets the explicit rule string. Blank strings count as absent.
    #[must_use]
    pub fn with_rules(mut self, rules: impl Into<String>) -> Self {
        let rules = rules.into();
        self.rules = if rules.trim().is_empty() {
            None
        } else {
            Some(rules)
        };
        self
    }

    /// Returns the internal field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the external input key.
    #[must_use]
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Returns the declared type signature.
    #[must_use]
    pub fn signature(&self) -> &TypeSignature {
        &self.signature
    }

    /// Returns the explicit rule string, if any.
    #[must_use]
    pub fn rules(&self) -> Option<&str> {
        self.rules.as_deref()
    }

    /// Returns the hydration kind.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}

/// Errors in metadata and schema model construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Field name is empty.
    #[error("field name must not be empty")]
    EmptyFieldName,

    /// Input key is empty.
    #[error("input name of field `{field}` must not be empty")]
    EmptyInputName {
        /// The field being declared.
        field: String,
    },

    /// Type signature is empty.
    #[error("type signature must not be empty")]
    EmptySignature,

    /// Class name is empty.
    #[error("class name must not be empty")]
    EmptyClassName,

    /// Class name is not a valid identifier.
    #[error("invalid class name `{name}`: expected identifier segments joined by `::`")]
    InvalidClassName {
        /// The invalid name.
        name: String,
    },

    /// Two fields of a class share a name.
    #[error("class `{class}` declares field `{field}` more than once")]
    DuplicateField {
        /// Owning class.
        class: String,
        /// Repeated field name.
        field: String,
    },

    /// Two fields of a class read the same input key.
    #[error("class `{class}` maps input key `{key}` to more than one field")]
    DuplicateInputKey {
        /// Owning class.
        class: String,
        /// Repeated input key.
        key: String,
    },

    /// A class is declared twice in one schema.
    #[error("class `{name}` is declared more than once")]
    DuplicateClass {
        /// Repeated class name.
        name: String,
    },
}
