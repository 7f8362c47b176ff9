//! Hydration of validated values into DTO instances.

use crate::dto::Dto;
use crate::engine::Engine;
use crate::error::DtoError;
use crate::instance::{DtoInstance, FieldValue};
use crate::schema::{DtoClass, Schema};
use crate::signature::FieldKind;
use crate::validator::FieldErrors;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::trace;

/// Validated values of one statically typed DTO, handed to [`Dto::hydrate`].
///
/// Each accessor consumes the value stored under an input key. Keys the
/// validator did not return read as `null`.
pub struct Hydration<'a> {
    engine: &'a Engine,
    class: &'static str,
    depth: usize,
    values: Map<String, Value>,
}

impl<'a> Hydration<'a> {
    pub(crate) fn new(
        engine: &'a Engine,
        class: &'static str,
        depth: usize,
        values: Map<String, Value>,
    ) -> Self {
        Self {
            engine,
            class,
            depth,
            values,
        }
    }

    /// Returns the class being hydrated.
    #[must_use]
    pub fn class(&self) -> &'static str {
        self.class
    }

    /// Returns the nesting depth (0 for the outermost DTO).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Assigns a validated value, deserialized into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`DtoError::Conversion`] if the value does not fit `T`.
    pub fn scalar<T: DeserializeOwned>(&mut self, key: &str) -> Result<T, DtoError> {
        let value = self.take(key);
        serde_json::from_value(value).map_err(|e| DtoError::Conversion {
            class: self.class.to_string(),
            field: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Constructs a nested DTO from the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object or the nested
    /// construction fails.
    pub fn nested<T: Dto>(&mut self, key: &str) -> Result<T, DtoError> {
        let value = self.take(key);
        self.nested_value(key, &value)
    }

    /// Like [`Self::nested`], mapping `null` to `None`.
    ///
    /// # Errors
    ///
    /// See [`Self::nested`].
    pub fn nested_opt<T: Dto>(&mut self, key: &str) -> Result<Option<T>, DtoError> {
        let value = self.take(key);
        if value.is_null() {
            return Ok(None);
        }
        self.nested_value(key, &value).map(Some)
    }

    /// Constructs every element of the list under `key`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a list, an element is not an
    /// object, or an element construction fails.
    pub fn collection<T: Dto>(&mut self, key: &str) -> Result<Vec<T>, DtoError> {
        let value = self.take(key);
        self.collection_value(key, &value)
    }

    /// Like [`Self::collection`], mapping `null` to `None`.
    ///
    /// # Errors
    ///
    /// See [`Self::collection`].
    pub fn collection_opt<T: Dto>(&mut self, key: &str) -> Result<Option<Vec<T>>, DtoError> {
        let value = self.take(key);
        if value.is_null() {
            return Ok(None);
        }
        self.collection_value(key, &value).map(Some)
    }

    fn take(&mut self, key: &str) -> Value {
        self.values.remove(key).unwrap_or(Value::Null)
    }

    fn nested_value<T: Dto>(&self, key: &str, value: &Value) -> Result<T, DtoError> {
        if !value.is_object() {
            return Err(shape_error(self.class, key, "must be an object"));
        }
        trace!(class = self.class, field = key, nested = T::CLASS, "hydrating nested DTO");
        self.engine.create_at::<T>(value, self.depth + 1)
    }

    fn collection_value<T: Dto>(&self, key: &str, value: &Value) -> Result<Vec<T>, DtoError> {
        let Value::Array(items) = value else {
            return Err(shape_error(self.class, key, "must be a list"));
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.nested_value(&format!("{key}.{index}"), item))
            .collect()
    }
}

/// Hydrates a schema-declared class from its validated values.
///
/// Fields are visited in declaration order, each exactly once.
pub(crate) fn hydrate_instance(
    engine: &Engine,
    schema: &Schema,
    class: &DtoClass,
    mut values: Map<String, Value>,
    depth: usize,
) -> Result<DtoInstance, DtoError> {
    let class_name = class.name().as_str();
    let mut instance = DtoInstance::new(class_name);

    for field in class.fields() {
        let key = field.input_name();
        let value = values.remove(key).unwrap_or(Value::Null);

        let hydrated = match field.kind() {
            FieldKind::NestedDto(target) => match schema.resolve(target) {
                Some(_) if value.is_null() => FieldValue::Scalar(Value::Null),
                Some(nested) => {
                    if !value.is_object() {
                        return Err(shape_error(class_name, key, "must be an object"));
                    }
                    trace!(class = class_name, field = key, nested = %target, "hydrating nested DTO");
                    let child = engine.create_class(schema, nested, &value, depth + 1)?;
                    FieldValue::Nested(Box::new(child))
                }
                None => FieldValue::Scalar(value),
            },
            FieldKind::DtoCollection(target) => {
                let Some(element) = schema.resolve(target) else {
                    return Err(DtoError::SchemaConfiguration {
                        class: class_name.to_string(),
                        field: field.name().to_string(),
                        message: format!(
                            "`{}` must name a DTO class, but `{target}` is not one",
                            field.signature()
                        ),
                    });
                };
                match &value {
                    Value::Null => FieldValue::Scalar(Value::Null),
                    Value::Array(items) => {
                        let mut elements = Vec::with_capacity(items.len());
                        for (index, item) in items.iter().enumerate() {
                            if !item.is_object() {
                                return Err(shape_error(
                                    class_name,
                                    &format!("{key}.{index}"),
                                    "must be an object",
                                ));
                            }
                            elements.push(engine.create_class(schema, element, item, depth + 1)?);
                        }
                        FieldValue::Collection(elements)
                    }
                    _ => return Err(shape_error(class_name, key, "must be a list")),
                }
            }
            FieldKind::Primitive | FieldKind::PrimitiveArray(_) => FieldValue::Scalar(value),
        };

        instance.push(field.name(), hydrated);
    }

    Ok(instance)
}

fn shape_error(class: &str, key: &str, expectation: &str) -> DtoError {
    let message = format!("The {} field {expectation}.", key.replace('_', " "));
    DtoError::validation(class, FieldErrors::single(key, message))
}
