//! Implicit rule derivation and rule-set composition.
//!
//! ```text
//! FieldMeta { input_name, rules: "max:255", signature: "?string" }
//!   ↓ derive_implicit_rules(signature)     "|nullable|string"
//!   ↓ compose_field_rules                   "max:255|nullable|string"
//! RuleSet["address_one"]
//! ```

use crate::field::FieldMeta;
use crate::signature::{alternatives, is_nullable, FieldKind, NULL_ALTERNATIVE};
use std::collections::BTreeMap;

/// Separator between rules in a rule string.
pub const RULE_SEPARATOR: char = '|';

/// Suffix of item-level rule keys (`groups.*`).
pub const WILDCARD_SUFFIX: &str = ".*";

const NUMERIC_NAMES: &[&str] = &["int", "integer", "float", "double"];
const STRING_NAMES: &[&str] = &["string"];
const BOOLEAN_NAMES: &[&str] = &["bool", "boolean"];
const ARRAY_TOKEN: &str = "array";

/// Returns the rule names implied by a type signature, in fixed order:
/// `required`/`nullable`, `numeric`, `string`, `boolean`, `array`.
///
/// Exactly one of `required` and `nullable` is always present.
#[must_use]
pub fn implicit_rule_names(signature: &str) -> Vec<&'static str> {
    let mut names = Vec::with_capacity(3);

    if is_nullable(signature) {
        names.push("nullable");
    } else {
        names.push("required");
    }

    let outer_has = |set: &[&str]| alternatives(signature).any(|a| set.contains(&a));
    if outer_has(NUMERIC_NAMES) {
        names.push("numeric");
    }
    if outer_has(STRING_NAMES) {
        names.push("string");
    }
    if outer_has(BOOLEAN_NAMES) {
        names.push("boolean");
    }
    if contains_array_token(signature) {
        names.push("array");
    }

    names
}

/// Derives the implicit rules for a signature as a pipe-prefixed string
/// (`"|required|string"`).
#[must_use]
pub fn derive_implicit_rules(signature: &str) -> String {
    implicit_rule_names(signature)
        .into_iter()
        .fold(String::new(), |mut acc, name| {
            acc.push(RULE_SEPARATOR);
            acc.push_str(name);
            acc
        })
}

/// Joins explicit rules (first) with the implicit rules of `signature`.
///
/// The explicit text is kept verbatim, so `regex:` patterns reach the
/// validator unchanged. Only surrounding whitespace and a trailing `|`
/// are dropped.
#[must_use]
pub fn compose_field_rules(explicit: Option<&str>, signature: &str) -> String {
    let implicit = derive_implicit_rules(signature);
    let explicit = explicit
        .unwrap_or_default()
        .trim()
        .trim_end_matches(RULE_SEPARATOR)
        .trim_end();
    if explicit.is_empty() {
        implicit.trim_start_matches(RULE_SEPARATOR).to_string()
    } else {
        format!("{explicit}{implicit}")
    }
}

/// Rules checked on every element of an `array<T>` field: the item types
/// of `T`, preceded by `nullable` when `T` admits `null` (`?int`,
/// `int|null`).
#[must_use]
pub fn item_rules(item: &str) -> String {
    let nullable = is_nullable(item).then_some("nullable");
    nullable
        .into_iter()
        .chain(alternatives(item).filter(|a| !a.eq_ignore_ascii_case(NULL_ALTERNATIVE)))
        .collect::<Vec<_>>()
        .join("|")
}

/// Composes the rule set for a list of field metadata records.
#[must_use]
pub fn compose(fields: &[FieldMeta]) -> RuleSet {
    let mut set = RuleSet::new();

    for field in fields {
        let rules = compose_field_rules(field.rules(), field.signature().as_str());
        set.insert(field.input_name(), rules);

        if let FieldKind::PrimitiveArray(item) = field.kind() {
            set.insert(
                format!("{}{WILDCARD_SUFFIX}", field.input_name()),
                item_rules(item),
            );
        }
        if field.name() != field.input_name() {
            set.alias(field.name(), field.input_name());
        }
    }

    set
}

/// `array` appearing as a whole identifier token anywhere in the signature.
fn contains_array_token(signature: &str) -> bool {
    signature
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|token| token == ARRAY_TOKEN)
}

/// An ordered mapping from input key to rule string.
///
/// Iteration follows field declaration order, with every `key.*` entry
/// directly after `key`. Field-name aliases let cross-field rules such as
/// `required_with:buildingNumber` name a field instead of its input key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    entries: Vec<(String, String)>,
    aliases: BTreeMap<String, String>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `rules` under `key`, replacing in place if present.
    pub fn insert(&mut self, key: impl Into<String>, rules: impl Into<String>) {
        let key = key.into();
        let rules = rules.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = rules,
            None => self.entries.push((key, rules)),
        }
    }

    /// Records that field `name` is read from input key `key`.
    pub fn alias(&mut self, name: impl Into<String>, key: impl Into<String>) {
        self.aliases.insert(name.into(), key.into());
    }

    /// Returns the rule string for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, rules)| rules.as_str())
    }

    /// Iterates `(key, rules)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r.as_str()))
    }

    /// Iterates the non-wildcard keys in registration order.
    pub fn field_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(|(k, _)| k.as_str())
            .filter(|k| !is_wildcard(k))
    }

    /// Maps a field name or input key referenced by a rule to its input key.
    #[must_use]
    pub fn resolve_key<'a>(&'a self, reference: &'a str) -> &'a str {
        if self.entries.iter().any(|(k, _)| k == reference) {
            return reference;
        }
        self.aliases.get(reference).map_or(reference, String::as_str)
    }

    /// Returns the number of entries, wildcard entries included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns the parent key of a wildcard key (`groups.*` → `groups`).
#[must_use]
pub fn wildcard_parent(key: &str) -> Option<&str> {
    key.strip_suffix(WILDCARD_SUFFIX)
}

/// True for item-level keys.
#[must_use]
pub fn is_wildcard(key: &str) -> bool {
    key.ends_with(WILDCARD_SUFFIX)
}
