//! The built-in rule validator.

use crate::catalog::{rule_catalog, RuleInfo};
use crate::checks::{
    attribute, comparable_text, is_alpha, is_alpha_dash, is_alpha_num, is_email, is_empty_value,
    is_integer, is_url, is_uuid, parse_bool, parse_number, size_of,
};
use crate::rule::{parse_rules, Limit, Rule};
use dtoforge_core::rules::{is_wildcard, wildcard_parent};
use dtoforge_core::{
    Config, FieldErrors, RuleSet, ValidationFailure, Validator, ValidatorConfig,
};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Evaluates composed rule strings against input.
///
/// Strings are normalized first (trimmed, blank strings become `null`, as
/// configured). Fields that are empty and not required are skipped. Every
/// failing rule of a field is reported, keyed by input key; list items are
/// keyed `key.<index>`.
///
/// ```ignore
/// use dtoforge_core::Engine;
/// use dtoforge_rules::RuleValidator;
///
/// let engine = Engine::new(RuleValidator::new());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleValidator {
    config: ValidatorConfig,
}

impl RuleValidator {
    /// Creates a validator with default normalization.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with the given normalization settings.
    #[must_use]
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Creates a validator from the `[validator]` section of a configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::with_config(config.validator.clone())
    }

    /// Returns the normalization settings.
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Returns the rules this validator understands.
    #[must_use]
    pub fn rule_catalog() -> &'static [RuleInfo] {
        rule_catalog()
    }

    fn normalize(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => {
                let s = if self.config.trim_strings { s.trim() } else { s.as_str() };
                if s.is_empty() && self.config.empty_string_as_null {
                    Value::Null
                } else {
                    Value::String(s.to_string())
                }
            }
            Value::Array(items) => Value::Array(items.iter().map(|v| self.normalize(v)).collect()),
            other => other.clone(),
        }
    }
}

impl Validator for RuleValidator {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn validate(
        &self,
        input: &Map<String, Value>,
        rules: &RuleSet,
    ) -> Result<Map<String, Value>, ValidationFailure> {
        let compiled = rules
            .iter()
            .map(|(key, rule_string)| {
                parse_rules(rule_string)
                    .map(|parsed| (key, parsed))
                    .map_err(|e| ValidationFailure::InvalidRule {
                        key: key.to_string(),
                        rule: e.rule,
                        reason: e.reason,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        trace!(keys = compiled.len(), "parsed rule set");

        let data: Map<String, Value> = input
            .iter()
            .map(|(k, v)| (k.clone(), self.normalize(v)))
            .collect();
        let scope = Scope {
            data: &data,
            rules,
        };

        let mut errors = FieldErrors::new();
        let mut validated = Map::new();

        for (key, field_rules) in compiled.iter().filter(|(k, _)| !is_wildcard(k)) {
            let present = data.contains_key(*key);
            let value = data.get(*key).cloned().unwrap_or(Value::Null);
            let mut value = scope.check(key, present, value, field_rules, true, &mut errors);

            let item_rules = compiled
                .iter()
                .find(|(k, _)| wildcard_parent(k) == Some(*key))
                .map(|(_, r)| r.as_slice());
            if let (Some(item_rules), Value::Array(items)) = (item_rules, &mut value) {
                let skip_empty = item_rules.iter().any(|r| matches!(r, Rule::Nullable));
                for (index, item) in items.iter_mut().enumerate() {
                    let item_key = format!("{key}.{index}");
                    let checked = scope.check(
                        &item_key,
                        true,
                        std::mem::take(item),
                        item_rules,
                        skip_empty,
                        &mut errors,
                    );
                    *item = checked;
                }
            }

            validated.insert((*key).to_string(), value);
        }

        if errors.is_empty() {
            Ok(validated)
        } else {
            debug!(failing = errors.len(), "rule validation failed");
            Err(ValidationFailure::Fields(errors))
        }
    }
}

/// The normalized input of one validation call, for cross-field rules.
struct Scope<'a> {
    data: &'a Map<String, Value>,
    rules: &'a RuleSet,
}

impl Scope<'_> {
    /// Value of another field, named by field name or input key.
    fn other(&self, reference: &str) -> &Value {
        self.data
            .get(self.rules.resolve_key(reference))
            .unwrap_or(&Value::Null)
    }

    /// Checks one value, records failures and returns it converted.
    fn check(
        &self,
        key: &str,
        present: bool,
        value: Value,
        rules: &[Rule],
        skip_empty: bool,
        errors: &mut FieldErrors,
    ) -> Value {
        if !present && rules.iter().any(|r| matches!(r, Rule::Sometimes)) {
            return value;
        }

        let missing = is_empty_value(&value);
        for rule in rules.iter().filter(|r| r.is_presence()) {
            if let Some(message) = self.presence_failure(rule, key, present, missing) {
                errors.add(key, message);
                return value;
            }
        }
        if missing && (skip_empty || rules.iter().any(|r| matches!(r, Rule::Nullable))) {
            return value;
        }

        let value = convert(value, rules);
        for rule in rules.iter().filter(|r| !r.is_presence()) {
            if let Some(message) = self.value_failure(rule, key, &value) {
                errors.add(key, message);
            }
        }
        value
    }

    fn presence_failure(&self, rule: &Rule, key: &str, present: bool, missing: bool) -> Option<String> {
        let a = attribute(key);
        match rule {
            Rule::Required => missing.then(|| format!("The {a} field is required.")),
            Rule::Filled => (present && missing).then(|| format!("The {a} field must have a value.")),
            Rule::Present => (!present).then(|| format!("The {a} field must be present.")),
            Rule::RequiredWith(others) => (missing
                && others.iter().any(|o| !is_empty_value(self.other(o))))
            .then(|| format!("The {a} field is required when {} is present.", others.join(" / "))),
            Rule::RequiredWithout(others) => (missing
                && others.iter().any(|o| is_empty_value(self.other(o))))
            .then(|| {
                format!("The {a} field is required when {} is not present.", others.join(" / "))
            }),
            Rule::RequiredIf(other, values) => {
                let current = comparable_text(self.other(other));
                (missing && values.contains(&current))
                    .then(|| format!("The {a} field is required when {other} is {current}."))
            }
            Rule::RequiredUnless(other, values) => {
                let current = comparable_text(self.other(other));
                (missing && !values.contains(&current)).then(|| {
                    format!("The {a} field is required unless {other} is in {}.", values.join(", "))
                })
            }
            _ => None,
        }
    }

    fn value_failure(&self, rule: &Rule, key: &str, value: &Value) -> Option<String> {
        let a = attribute(key);
        let text = value.as_str();
        let fails_text = |check: fn(&str) -> bool| !text.is_some_and(check);

        match rule {
            Rule::String => (!value.is_string()).then(|| format!("The {a} field must be a string.")),
            Rule::Numeric | Rule::Float => {
                (!value.is_number()).then(|| format!("The {a} field must be a number."))
            }
            Rule::Integer => {
                (!is_integer(value)).then(|| format!("The {a} field must be an integer."))
            }
            Rule::Boolean => {
                (!value.is_boolean()).then(|| format!("The {a} field must be true or false."))
            }
            Rule::Array => (!(value.is_array() || value.is_object()))
                .then(|| format!("The {a} field must be an array.")),
            Rule::Email => fails_text(is_email)
                .then(|| format!("The {a} field must be a valid email address.")),
            Rule::Url => fails_text(is_url).then(|| format!("The {a} field must be a valid URL.")),
            Rule::Uuid => fails_text(is_uuid).then(|| format!("The {a} field must be a valid UUID.")),
            Rule::Alpha => {
                fails_text(is_alpha).then(|| format!("The {a} field must only contain letters."))
            }
            Rule::AlphaNum => fails_text(is_alpha_num)
                .then(|| format!("The {a} field must only contain letters and numbers.")),
            Rule::AlphaDash => fails_text(is_alpha_dash).then(|| {
                format!("The {a} field must only contain letters, numbers, dashes and underscores.")
            }),
            Rule::Regex(pattern) => (!text.is_some_and(|s| pattern.is_match(s)))
                .then(|| format!("The {a} field format is invalid.")),
            Rule::NotRegex(pattern) => (!text.is_some_and(|s| !pattern.is_match(s)))
                .then(|| format!("The {a} field format is invalid.")),
            Rule::Min(n) => size_failure(&a, value, |s| s >= n.value, |unit| match unit {
                Unit::Number => format!("must be at least {n}"),
                Unit::Characters => format!("must be at least {n} characters"),
                Unit::Items => format!("must have at least {n} items"),
            }),
            Rule::Max(n) => size_failure(&a, value, |s| s <= n.value, |unit| match unit {
                Unit::Number => format!("must not be greater than {n}"),
                Unit::Characters => format!("must not be greater than {n} characters"),
                Unit::Items => format!("must not have more than {n} items"),
            }),
            Rule::Between(lo, hi) => {
                size_failure(&a, value, |s| s >= lo.value && s <= hi.value, |unit| {
                    between_phrase(lo, hi, unit)
                })
            }
            Rule::Size(n) => size_failure(&a, value, |s| (s - n.value).abs() < f64::EPSILON, |unit| {
                match unit {
                    Unit::Number => format!("must be {n}"),
                    Unit::Characters => format!("must be {n} characters"),
                    Unit::Items => format!("must contain {n} items"),
                }
            }),
            Rule::In(values) => (!each_element(value, |v| values.contains(&comparable_text(v))))
                .then(|| format!("The selected {a} is invalid.")),
            Rule::NotIn(values) => (!each_element(value, |v| !values.contains(&comparable_text(v))))
                .then(|| format!("The selected {a} is invalid.")),
            Rule::StartsWith(prefixes) => {
                (!text.is_some_and(|s| prefixes.iter().any(|p| s.starts_with(p.as_str())))).then(
                    || {
                        format!(
                            "The {a} field must start with one of the following: {}.",
                            prefixes.join(", ")
                        )
                    },
                )
            }
            Rule::EndsWith(suffixes) => {
                (!text.is_some_and(|s| suffixes.iter().any(|p| s.ends_with(p.as_str())))).then(
                    || {
                        format!(
                            "The {a} field must end with one of the following: {}.",
                            suffixes.join(", ")
                        )
                    },
                )
            }
            Rule::Same(other) => (self.data.get(key) != Some(self.other(other)))
                .then(|| format!("The {a} field must match {other}.")),
            Rule::Different(other) => (self.data.get(key) == Some(self.other(other)))
                .then(|| format!("The {a} field and {other} must be different.")),
            Rule::Confirmed => {
                let confirmation = self.data.get(&format!("{key}_confirmation"));
                (confirmation != self.data.get(key))
                    .then(|| format!("The {a} field confirmation does not match."))
            }
            Rule::Nullable
            | Rule::Sometimes
            | Rule::Mixed
            | Rule::Required
            | Rule::Filled
            | Rule::Present
            | Rule::RequiredWith(_)
            | Rule::RequiredWithout(_)
            | Rule::RequiredIf(..)
            | Rule::RequiredUnless(..) => None,
        }
    }
}

/// What a size is measured in.
#[derive(Clone, Copy)]
enum Unit {
    Number,
    Characters,
    Items,
}

fn size_failure(
    attribute: &str,
    value: &Value,
    accept: impl Fn(f64) -> bool,
    phrase: impl Fn(Unit) -> String,
) -> Option<String> {
    let unit = match value {
        Value::String(_) => Unit::Characters,
        Value::Array(_) | Value::Object(_) => Unit::Items,
        _ => Unit::Number,
    };
    if size_of(value).is_some_and(accept) {
        None
    } else {
        Some(format!("The {attribute} field {}.", phrase(unit)))
    }
}

fn between_phrase(lo: &Limit, hi: &Limit, unit: Unit) -> String {
    match unit {
        Unit::Number => format!("must be between {lo} and {hi}"),
        Unit::Characters => format!("must be between {lo} and {hi} characters"),
        Unit::Items => format!("must have between {lo} and {hi} items"),
    }
}

/// Applies `check` to a scalar, or to every element of a list.
fn each_element(value: &Value, check: impl Fn(&Value) -> bool) -> bool {
    match value {
        Value::Array(items) => items.iter().all(check),
        other => check(other),
    }
}

/// Converts numeric strings and boolean literals when the rules ask for
/// numbers or booleans.
fn convert(value: Value, rules: &[Rule]) -> Value {
    if rules.iter().any(Rule::is_numeric) {
        if let Value::String(s) = &value {
            if let Some(number) = parse_number(s) {
                return Value::Number(number);
            }
        }
    }
    if rules.iter().any(|r| matches!(r, Rule::Boolean)) && !value.is_boolean() {
        if let Some(b) = parse_bool(&value) {
            return Value::Bool(b);
        }
    }
    value
}
