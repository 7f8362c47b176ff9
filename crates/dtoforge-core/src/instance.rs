//! Dynamically typed DTO instances, produced from schema-declared classes.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// The value held by one field of a [`DtoInstance`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A validated scalar or primitive array, as normalized by the validator.
    Scalar(Value),
    /// A nested DTO, owned by its parent.
    Nested(Box<DtoInstance>),
    /// An ordered collection of DTOs, in input order.
    Collection(Vec<DtoInstance>),
}

impl FieldValue {
    /// Returns the scalar value, if this is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the nested instance, if this is one.
    #[must_use]
    pub fn as_nested(&self) -> Option<&DtoInstance> {
        match self {
            Self::Nested(instance) => Some(instance),
            _ => None,
        }
    }

    /// Returns the collection elements, if this is a collection.
    #[must_use]
    pub fn as_collection(&self) -> Option<&[DtoInstance]> {
        match self {
            Self::Collection(items) => Some(items),
            _ => None,
        }
    }

    /// True for `Scalar(Value::Null)`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Value::Null))
    }

    /// Converts to plain JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::Nested(instance) => instance.to_json(),
            Self::Collection(items) => Value::Array(items.iter().map(DtoInstance::to_json).collect()),
        }
    }
}

/// A constructed instance of a schema-declared DTO class.
///
/// Fields are kept in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct DtoInstance {
    class: String,
    fields: Vec<(String, FieldValue)>,
}

impl DtoInstance {
    pub(crate) fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.push((name.into(), value));
    }

    /// Returns the class name.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Returns a field value by field name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Iterates `(field name, value)` in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True for a class without fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Converts to a JSON object keyed by field name.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl Serialize for DtoInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(value) => value.serialize(serializer),
            Self::Nested(instance) => instance.serialize(serializer),
            Self::Collection(items) => items.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn address(city: &str) -> DtoInstance {
        let mut instance = DtoInstance::new("Address");
        instance.push("city", FieldValue::Scalar(json!(city)));
        instance.push("floor", FieldValue::Scalar(Value::Null));
        instance
    }

    #[test]
    fn accessors() {
        let instance = address("Town");
        assert_eq!(instance.class(), "Address");
        assert_eq!(instance.len(), 2);
        assert_eq!(
            instance.get("city").and_then(FieldValue::as_scalar),
            Some(&json!("Town"))
        );
        assert!(instance.get("floor").is_some_and(FieldValue::is_null));
        assert!(instance.get("missing").is_none());
    }

    #[test]
    fn serializes_in_declaration_order() {
        let mut customer = DtoInstance::new("Customer");
        customer.push("fullName", FieldValue::Scalar(json!("Jane")));
        customer.push(
            "addresses",
            FieldValue::Collection(vec![address("A"), address("B")]),
        );
        customer.push("billing", FieldValue::Nested(Box::new(address("C"))));

        let text = serde_json::to_string(&customer).unwrap();
        assert_eq!(
            text,
            r#"{"fullName":"Jane","addresses":[{"city":"A","floor":null},{"city":"B","floor":null}],"billing":{"city":"C","floor":null}}"#
        );
        assert_eq!(serde_json::to_value(&customer).unwrap(), customer.to_json());
    }
}
