//! The construction orchestrator.
//!
//! ```text
//! metadata ─▶ compose rules ─▶ validate ─┬▶ hydrate ─┬▶ instance
//!                                         │           └▶ SchemaConfiguration
//!                                         └▶ Validation
//! ```
//!
//! Every call is a single synchronous attempt that touches no shared
//! mutable state, so one [`Engine`] can serve many threads.

use crate::config::{Config, EngineConfig};
use crate::dto::Dto;
use crate::error::DtoError;
use crate::field::FieldMeta;
use crate::hydrate::{hydrate_instance, Hydration};
use crate::instance::DtoInstance;
use crate::rules::{compose, RuleSet};
use crate::schema::{DtoClass, Schema};
use crate::validator::{FieldErrors, ValidationFailure, Validator, ValidatorBox};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error};

/// Errors that can occur while building an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No validator was supplied.
    #[error("an engine needs a validator")]
    MissingValidator,
}

/// Builder for configuring an [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    validator: Option<ValidatorBox>,
    config: EngineConfig,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the validation delegate.
    #[must_use]
    pub fn validator<V: Validator + 'static>(mut self, validator: V) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Sets a boxed validation delegate.
    #[must_use]
    pub fn validator_box(mut self, validator: ValidatorBox) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Applies the engine section of a configuration.
    #[must_use]
    pub fn config(mut self, config: &Config) -> Self {
        self.config = config.engine.clone();
        self
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if no validator was set.
    pub fn build(self) -> Result<Engine, EngineError> {
        let validator = self.validator.ok_or(EngineError::MissingValidator)?;
        Ok(Engine {
            validator,
            max_depth: self.config.max_depth,
        })
    }
}

/// Validates input and constructs DTO instances.
///
/// Use [`Engine::new`] or [`Engine::builder()`] to construct an instance.
pub struct Engine {
    validator: ValidatorBox,
    max_depth: usize,
}

impl Engine {
    /// Creates an engine with the given validator and default settings.
    #[must_use]
    pub fn new<V: Validator + 'static>(validator: V) -> Self {
        Self {
            validator: Box::new(validator),
            max_depth: EngineConfig::default().max_depth,
        }
    }

    /// Creates a new builder for configuring an engine.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Returns the maximum nesting depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the validator's name.
    #[must_use]
    pub fn validator_name(&self) -> &'static str {
        self.validator.name()
    }

    /// Returns the composed rule set of a static DTO.
    #[must_use]
    pub fn rules_for<T: Dto>() -> RuleSet {
        compose(T::fields())
    }

    /// Constructs `T` from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DtoError::Validation`] if the input breaks a rule (the
    /// message is the first error of the first failing field), or another
    /// [`DtoError`] for schema defects.
    pub fn create<T: Dto>(&self, input: &Value) -> Result<T, DtoError> {
        self.create_at(input, 0)
    }

    /// Constructs `T` from a JSON object.
    ///
    /// # Errors
    ///
    /// See [`Engine::create`].
    pub fn create_from_map<T: Dto>(&self, input: &Map<String, Value>) -> Result<T, DtoError> {
        self.create_fields(input, 0)
    }

    /// Constructs an instance of a schema-declared class.
    ///
    /// # Errors
    ///
    /// Returns [`DtoError::UnknownClass`] if `class` is not in `schema`,
    /// otherwise see [`Engine::create`].
    pub fn create_dynamic(
        &self,
        schema: &Schema,
        class: &str,
        input: &Value,
    ) -> Result<DtoInstance, DtoError> {
        let dto_class = schema.class(class).ok_or_else(|| DtoError::UnknownClass {
            class: class.to_string(),
        })?;
        self.create_class(schema, dto_class, input, 0)
    }

    pub(crate) fn create_at<T: Dto>(&self, input: &Value, depth: usize) -> Result<T, DtoError> {
        let object = expect_object(T::CLASS, input)?;
        self.create_fields(object, depth)
    }

    fn create_fields<T: Dto>(&self, input: &Map<String, Value>, depth: usize) -> Result<T, DtoError> {
        self.enter(T::CLASS, depth)?;
        let fields = T::fields();
        let rules = compose(fields);
        let values = self.validate(T::CLASS, fields, input, &rules)?;

        let mut hydration = Hydration::new(self, T::CLASS, depth, values);
        let dto = T::hydrate(&mut hydration)?;
        debug!(class = T::CLASS, depth, "constructed DTO");
        Ok(dto)
    }

    pub(crate) fn create_class(
        &self,
        schema: &Schema,
        class: &DtoClass,
        input: &Value,
        depth: usize,
    ) -> Result<DtoInstance, DtoError> {
        let name = class.name().as_str();
        let object = expect_object(name, input)?;
        self.enter(name, depth)?;
        let values = self.validate(name, class.fields(), object, class.rules())?;

        let instance = hydrate_instance(self, schema, class, values, depth)?;
        debug!(class = name, depth, "constructed DTO");
        Ok(instance)
    }

    fn enter(&self, class: &str, depth: usize) -> Result<(), DtoError> {
        if depth > self.max_depth {
            return Err(DtoError::DepthExceeded {
                class: class.to_string(),
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }

    /// Runs the validator and checks that every validated key maps back to
    /// a field.
    fn validate(
        &self,
        class: &str,
        fields: &[FieldMeta],
        input: &Map<String, Value>,
        rules: &RuleSet,
    ) -> Result<Map<String, Value>, DtoError> {
        debug!(
            class,
            rules = rules.len(),
            validator = self.validator.name(),
            "validating input"
        );

        let values = self
            .validator
            .validate(input, rules)
            .map_err(|failure| match failure {
                ValidationFailure::Fields(errors) => {
                    debug!(class, failing = errors.len(), "validation failed");
                    DtoError::validation(class, errors)
                }
                ValidationFailure::InvalidRule { key, rule, reason } => {
                    let field = fields
                        .iter()
                        .find(|f| f.input_name() == key)
                        .map_or(key.clone(), |f| f.name().to_string());
                    DtoError::SchemaConfiguration {
                        class: class.to_string(),
                        field,
                        message: format!("rule `{rule}` cannot be evaluated: {reason}"),
                    }
                }
            })?;

        if let Some(key) = values
            .keys()
            .find(|key| !fields.iter().any(|f| f.input_name() == key.as_str()))
        {
            error!(class, key = %key, "validated key has no field metadata");
            return Err(DtoError::MetadataLookup {
                class: class.to_string(),
                key: key.clone(),
            });
        }

        Ok(values)
    }
}

fn expect_object<'v>(class: &str, input: &'v Value) -> Result<&'v Map<String, Value>, DtoError> {
    input.as_object().ok_or_else(|| DtoError::Validation {
        class: class.to_string(),
        message: format!("The input for {class} must be an object."),
        errors: FieldErrors::new(),
    })
}
