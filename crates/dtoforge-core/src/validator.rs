//! The validation delegate contract.
//!
//! The engine composes rule strings but never evaluates them. Any
//! [`Validator`] implementation can be plugged in; `dtoforge-rules`
//! provides the default one.

use crate::rules::RuleSet;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Evaluates a [`RuleSet`] against raw input.
///
/// # Contract
///
/// On success the returned map contains exactly the non-wildcard keys of
/// `rules`, absent inputs as `Value::Null`, with values normalized per rule
/// semantics. On failure at least one error is reported per offending key,
/// in rule-set order.
///
/// # Example
///
/// ```ignore
/// use dtoforge_core::{RuleSet, ValidationFailure, Validator};
/// use serde_json::{Map, Value};
///
/// struct AcceptAll;
///
/// impl Validator for AcceptAll {
///     fn validate(&self, input: &Map<String, Value>, rules: &RuleSet)
///         -> Result<Map<String, Value>, ValidationFailure>
///     {
///         Ok(rules
///             .field_keys()
///             .map(|k| (k.to_string(), input.get(k).cloned().unwrap_or(Value::Null)))
///             .collect())
///     }
/// }
/// ```
pub trait Validator: Send + Sync {
    /// Returns a short name for logging.
    fn name(&self) -> &'static str {
        "validator"
    }

    /// Validates `input` against `rules`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure::Fields`] when the input breaks a rule,
    /// or [`ValidationFailure::InvalidRule`] when a rule string cannot be
    /// evaluated at all.
    fn validate(
        &self,
        input: &Map<String, Value>,
        rules: &RuleSet,
    ) -> Result<Map<String, Value>, ValidationFailure>;
}

/// Type alias for boxed Validator trait objects.
pub type ValidatorBox = Box<dyn Validator>;

impl<F> Validator for F
where
    F: Fn(&Map<String, Value>, &RuleSet) -> Result<Map<String, Value>, ValidationFailure>
        + Send
        + Sync,
{
    fn validate(
        &self,
        input: &Map<String, Value>,
        rules: &RuleSet,
    ) -> Result<Map<String, Value>, ValidationFailure> {
        self(input, rules)
    }
}

/// Why a validator rejected the input.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationFailure {
    /// One or more fields broke their rules.
    Fields(FieldErrors),
    /// A rule string is unknown or malformed (a schema defect).
    InvalidRule {
        /// Input key the rule is registered under.
        key: String,
        /// The offending rule.
        rule: String,
        /// Why it cannot be evaluated.
        reason: String,
    },
}

/// Per-key error messages, in the order they were reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl FieldErrors {
    /// Creates an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error set holding one message.
    #[must_use]
    pub fn single(key: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(key, message);
        errors
    }

    /// Appends a message for `key`.
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        let key = key.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((key, vec![message])),
        }
    }

    /// Returns the first message of the first failing key.
    #[must_use]
    pub fn first(&self) -> Option<(&str, &str)> {
        self.entries.iter().find_map(|(key, messages)| {
            messages
                .first()
                .map(|message| (key.as_str(), message.as_str()))
        })
    }

    /// Returns the messages recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, messages)| messages.as_slice())
    }

    /// Iterates `(key, messages)` in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, m)| (k.as_str(), m.as_slice()))
    }

    /// Returns the number of failing keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves every entry of `other` into `self`.
    pub fn extend(&mut self, other: Self) {
        for (key, messages) in other.entries {
            for message in messages {
                self.add(key.clone(), message);
            }
        }
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, messages) in &self.entries {
            map.serialize_entry(key, messages)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_follows_report_order() {
        let mut errors = FieldErrors::new();
        errors.add("floor", "The floor field is required.");
        errors.add("city", "The city field is required.");
        errors.add("floor", "The floor field must be a string.");

        assert_eq!(
            errors.first(),
            Some(("floor", "The floor field is required."))
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("floor").map(<[String]>::len), Some(2));
    }

    #[test]
    fn empty_errors_have_no_first() {
        assert!(FieldErrors::new().first().is_none());
    }

    #[test]
    fn serializes_as_object() {
        let errors = FieldErrors::single("groups.0", "The groups.0 field must be a string.");
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"groups.0":["The groups.0 field must be a string."]}"#);
    }

    #[test]
    fn closures_are_validators() {
        let validator = |_: &Map<String, Value>,
                         rules: &RuleSet|
         -> Result<Map<String, Value>, ValidationFailure> {
            Ok(rules
                .field_keys()
                .map(|k| (k.to_string(), Value::Null))
                .collect())
        };
        let mut rules = RuleSet::new();
        rules.insert("city", "required|string");

        let out = Validator::validate(&validator, &Map::new(), &rules).unwrap();
        assert_eq!(out.get("city"), Some(&Value::Null));
        assert_eq!(validator.name(), "validator");
    }
}
