//! Type signatures and their classification.
//!
//! A signature is the textual type of a DTO field:
//!
//! ```text
//! string            ?string           string|null
//! int               float             bool
//! Address           billing::Address  ?Address
//! array<string>     array<?int>       Collection<Address>
//! array<string>|null                  ?Collection<Address>
//! ```
//!
//! All predicates work on the signature text alone. Generic arguments are
//! never classified recursively; they are opaque names.

use crate::field::ModelError;
use std::fmt;

const NULLABLE_MARKER: char = '?';
const UNION_SEPARATOR: char = '|';
pub(crate) const NULL_ALTERNATIVE: &str = "null";
const COLLECTION_KEYWORD: &str = "Collection";
const ARRAY_KEYWORD: &str = "array";

/// Names that denote primitive kinds rather than DTO classes.
const PRIMITIVE_NAMES: &[&str] = &[
    "string", "int", "integer", "float", "double", "bool", "boolean", "array", "mixed", "null",
    "object", "true", "false",
];

/// A validated, whitespace-free type signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSignature(String);

impl TypeSignature {
    /// Creates a new signature, stripping all whitespace.
    ///
    /// # Errors
    ///
    /// Returns error if the signature is empty.
    pub fn new(signature: &str) -> Result<Self, ModelError> {
        let compact: String = signature.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(ModelError::EmptySignature);
        }
        Ok(Self(compact))
    }

    /// Builds a signature without the emptiness check.
    pub(crate) fn trusted(signature: &str) -> Self {
        Self(signature.chars().filter(|c| !c.is_whitespace()).collect())
    }

    /// Returns the signature as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// See [`is_nullable`].
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        is_nullable(&self.0)
    }

    /// See [`generic_argument`].
    #[must_use]
    pub fn generic_argument(&self) -> Option<&str> {
        generic_argument(&self.0)
    }

    /// Classifies this signature into a [`FieldKind`].
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        FieldKind::classify(self)
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw reference to a DTO class, as written inside a signature.
///
/// Whether the name actually denotes a DTO is decided by whoever resolves
/// it: the schema registry at hydration time, or the compiler for derived
/// DTOs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassRef(String);

impl ClassRef {
    /// Creates a class reference from its raw text.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the reference as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last path segment (`billing::Address` → `Address`).
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.0
            .rsplit(|c| c == ':' || c == '\\')
            .next()
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a field is hydrated, decided once from its signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Scalar or untyped value, assigned as validated.
    Primitive,
    /// A single nested DTO.
    NestedDto(ClassRef),
    /// `array<T>` of a primitive item type (`T` kept verbatim, so `?int`
    /// marks nullable items).
    PrimitiveArray(String),
    /// `Collection<T>`, an ordered sequence of DTO instances.
    DtoCollection(ClassRef),
}

impl FieldKind {
    /// Classifies a signature.
    #[must_use]
    pub fn classify(signature: &TypeSignature) -> Self {
        let Some(only) = sole_alternative(signature.as_str()) else {
            return Self::Primitive;
        };
        match single_generic(only) {
            Some((COLLECTION_KEYWORD, arg)) => Self::DtoCollection(ClassRef::new(arg)),
            Some((ARRAY_KEYWORD, arg)) => Self::PrimitiveArray(arg.to_string()),
            _ if only.contains('<') => Self::Primitive,
            _ if is_class_identifier(only) && !is_primitive_name(only) => {
                Self::NestedDto(ClassRef::new(only))
            }
            _ => Self::Primitive,
        }
    }

    /// Returns the referenced class for DTO-bearing kinds.
    #[must_use]
    pub fn class_ref(&self) -> Option<&ClassRef> {
        match self {
            Self::NestedDto(class) | Self::DtoCollection(class) => Some(class),
            Self::Primitive | Self::PrimitiveArray(_) => None,
        }
    }
}

/// True if the signature starts with `?` or has a `null` union alternative.
#[must_use]
pub fn is_nullable(signature: &str) -> bool {
    signature.starts_with(NULLABLE_MARKER)
        || alternatives(signature).any(|a| a.eq_ignore_ascii_case(NULL_ALTERNATIVE))
}

/// True if the signature is `Collection<...>`, optionally made nullable with
/// `?` or a `null` alternative.
#[must_use]
pub fn is_generic_collection_of_dto(signature: &str) -> bool {
    sole_alternative(signature)
        .and_then(single_generic)
        .is_some_and(|(keyword, _)| keyword == COLLECTION_KEYWORD)
}

/// True if the signature is `array<...>`, optionally made nullable with `?`
/// or a `null` alternative.
#[must_use]
pub fn is_generic_array_of_primitive(signature: &str) -> bool {
    sole_alternative(signature)
        .and_then(single_generic)
        .is_some_and(|(keyword, _)| keyword == ARRAY_KEYWORD)
}

/// Returns the text strictly between the first `<` and its matching `>`.
#[must_use]
pub fn generic_argument(signature: &str) -> Option<&str> {
    let open = signature.find('<')?;
    let mut depth = 0usize;
    for (offset, c) in signature[open..].char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&signature[open + 1..open + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Returns the signature text with every `<...>` section removed.
#[must_use]
pub fn outer_text(signature: &str) -> String {
    let mut depth = 0usize;
    signature
        .chars()
        .filter(|c| match c {
            '<' => {
                depth += 1;
                false
            }
            '>' => {
                depth = depth.saturating_sub(1);
                false
            }
            _ => depth == 0,
        })
        .collect()
}

/// Union alternatives split at bracket depth 0, without the leading `?`.
///
/// `array<int|null>|null` yields `array<int|null>` and `null`.
pub(crate) fn alternatives(signature: &str) -> impl Iterator<Item = &str> {
    let body = signature.trim_start_matches(NULLABLE_MARKER);
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            UNION_SEPARATOR if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts.into_iter().filter(|a| !a.is_empty())
}

/// The only non-`null` alternative, if there is exactly one.
fn sole_alternative(signature: &str) -> Option<&str> {
    let mut candidates =
        alternatives(signature).filter(|a| !a.eq_ignore_ascii_case(NULL_ALTERNATIVE));
    match (candidates.next(), candidates.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

/// Splits `keyword<arg>` into keyword and argument. The argument must be
/// non-empty and contain no further brackets.
fn single_generic(signature: &str) -> Option<(&str, &str)> {
    let (keyword, rest) = signature.split_once('<')?;
    let arg = rest.strip_suffix('>')?;
    if arg.is_empty() || arg.contains(['<', '>']) {
        return None;
    }
    Some((keyword, arg))
}

fn is_primitive_name(name: &str) -> bool {
    PRIMITIVE_NAMES.contains(&name)
}

/// `[A-Za-z_][A-Za-z0-9_]*` segments joined by `::` or `\`.
pub(crate) fn is_class_identifier(name: &str) -> bool {
    let normalized = name.replace("::", "\\");
    !normalized.is_empty()
        && normalized.split('\\').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
