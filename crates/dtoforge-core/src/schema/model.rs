//! Pure domain model for schema-declared DTO classes.
//!
//! This module contains no serde and no I/O. All invariants are enforced
//! at construction time via validated newtypes.

use crate::field::{FieldMeta, ModelError};
use crate::rules::{compose, RuleSet};
use crate::signature::{is_class_identifier, ClassRef, FieldKind};
use std::collections::HashMap;
use std::fmt;

/// A validated class name (identifier segments joined by `::` or `\`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassName(String);

impl ClassName {
    /// Creates a new class name.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or not an identifier path.
    pub fn new(name: &str) -> Result<Self, ModelError> {
        if name.is_empty() {
            return Err(ModelError::EmptyClassName);
        }
        if !is_class_identifier(name) {
            return Err(ModelError::InvalidClassName {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last path segment.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.0
            .rsplit(|c| c == ':' || c == '\\')
            .next()
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A declared DTO class with its precomputed rule set.
#[derive(Debug, Clone)]
pub struct DtoClass {
    name: ClassName,
    fields: Vec<FieldMeta>,
    rules: RuleSet,
}

impl DtoClass {
    /// Creates a class, composing its rule set once.
    ///
    /// # Errors
    ///
    /// Returns error if two fields share a name or an input key.
    pub fn new(name: ClassName, fields: Vec<FieldMeta>) -> Result<Self, ModelError> {
        for (i, field) in fields.iter().enumerate() {
            let earlier = &fields[..i];
            if earlier.iter().any(|f| f.name() == field.name()) {
                return Err(ModelError::DuplicateField {
                    class: name.to_string(),
                    field: field.name().to_string(),
                });
            }
            if earlier.iter().any(|f| f.input_name() == field.input_name()) {
                return Err(ModelError::DuplicateInputKey {
                    class: name.to_string(),
                    key: field.input_name().to_string(),
                });
            }
        }

        let rules = compose(&fields);
        Ok(Self {
            name,
            fields,
            rules,
        })
    }

    /// Returns the class name.
    #[must_use]
    pub fn name(&self) -> &ClassName {
        &self.name
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldMeta] {
        &self.fields
    }

    /// Returns the field declared under `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the composed rule set.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

/// A collection field whose element class is not declared in the schema.
///
/// Construction through such a field fails with a schema configuration
/// error, so loaders report these up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Owning class.
    pub class: String,
    /// Field name.
    pub field: String,
    /// The unresolved element class.
    pub target: ClassRef,
}

/// A registry of DTO classes (aggregate root).
#[derive(Debug, Clone, Default)]
pub struct Schema {
    classes: Vec<DtoClass>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Creates a schema with full validation.
    ///
    /// # Errors
    ///
    /// Returns every repeated class name.
    pub fn new(classes: Vec<DtoClass>) -> Result<Self, Vec<ModelError>> {
        let mut index = HashMap::new();
        let mut errors = Vec::new();

        for (i, class) in classes.iter().enumerate() {
            if index.insert(class.name.as_str().to_string(), i).is_some() {
                errors.push(ModelError::DuplicateClass {
                    name: class.name.to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(Self { classes, index })
        } else {
            Err(errors)
        }
    }

    /// Creates an empty schema.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up a class by its declared name, falling back to a unique
    /// short-name match.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&DtoClass> {
        self.resolve(&ClassRef::new(name))
    }

    /// Resolves a class reference taken from a type signature.
    ///
    /// A qualified reference (`billing::Address`) must match a declared
    /// name exactly. An unqualified one (`Address`) also matches the only
    /// class whose short name is `Address`.
    #[must_use]
    pub fn resolve(&self, reference: &ClassRef) -> Option<&DtoClass> {
        if let Some(&i) = self.index.get(reference.as_str()) {
            return self.classes.get(i);
        }
        let short = reference.short_name();
        if short != reference.as_str() {
            return None;
        }
        let mut matches = self.classes.iter().filter(|c| c.name.short_name() == short);
        match (matches.next(), matches.next()) {
            (Some(class), None) => Some(class),
            _ => None,
        }
    }

    /// Returns the rule set of a class.
    #[must_use]
    pub fn rules_for(&self, name: &str) -> Option<&RuleSet> {
        self.class(name).map(DtoClass::rules)
    }

    /// Iterates classes in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = &DtoClass> {
        self.classes.iter()
    }

    /// Returns the collection fields whose element class is not declared.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        for class in &self.classes {
            for field in &class.fields {
                if let FieldKind::DtoCollection(target) = field.kind() {
                    if self.resolve(target).is_none() {
                        dangling.push(DanglingReference {
                            class: class.name.to_string(),
                            field: field.name().to_string(),
                            target: target.clone(),
                        });
                    }
                }
            }
        }
        dangling
    }

    /// Returns the number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if no classes are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, signature: &str) -> FieldMeta {
        FieldMeta::new(name, signature).unwrap()
    }

    fn class(name: &str, fields: Vec<FieldMeta>) -> DtoClass {
        DtoClass::new(ClassName::new(name).unwrap(), fields).unwrap()
    }

    #[test]
    fn class_name_validation() {
        assert!(ClassName::new("Address").is_ok());
        assert!(ClassName::new("billing::Address").is_ok());
        assert!(ClassName::new("App\\Dto\\Address").is_ok());
        assert_eq!(ClassName::new(""), Err(ModelError::EmptyClassName));
        assert!(matches!(
            ClassName::new("9lives"),
            Err(ModelError::InvalidClassName { .. })
        ));
        assert!(matches!(
            ClassName::new("Has Space"),
            Err(ModelError::InvalidClassName { .. })
        ));
    }

    #[test]
    fn short_name() {
        assert_eq!(ClassName::new("billing::Address").unwrap().short_name(), "Address");
        assert_eq!(ClassName::new("App\\Dto\\Address").unwrap().short_name(), "Address");
    }

    #[test]
    fn duplicate_fields_rejected() {
        let name = ClassName::new("Address").unwrap();
        let err = DtoClass::new(name.clone(), vec![field("city", "string"), field("city", "?string")])
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateField { .. }));

        let err = DtoClass::new(
            name,
            vec![
                field("city", "string"),
                field("town", "string").with_input("city").unwrap(),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateInputKey { ref key, .. } if key == "city"));
    }

    #[test]
    fn rules_are_precomputed() {
        let address = class("Address", vec![field("city", "?string")]);
        assert_eq!(address.rules().get("city"), Some("nullable|string"));
    }

    #[test]
    fn duplicate_classes_collected() {
        let errors = Schema::new(vec![
            class("Address", vec![]),
            class("Address", vec![]),
        ])
        .unwrap_err();
        assert_eq!(
            errors,
            vec![ModelError::DuplicateClass {
                name: "Address".to_string()
            }]
        );
    }

    #[test]
    fn resolves_exact_then_unique_short_name() {
        let schema = Schema::new(vec![
            class("billing::Address", vec![]),
            class("shipping::Parcel", vec![]),
            class("Parcel", vec![]),
        ])
        .unwrap();

        assert!(schema.resolve(&ClassRef::new("billing::Address")).is_some());
        assert_eq!(
            schema.class("Address").map(|c| c.name().as_str()),
            Some("billing::Address")
        );
        assert_eq!(
            schema.class("Parcel").map(|c| c.name().as_str()),
            Some("Parcel")
        );
        assert!(schema.class("other::Parcel").is_none());
        assert!(schema.class("Missing").is_none());
    }

    #[test]
    fn qualified_reference_never_matches_another_namespace() {
        let schema = Schema::new(vec![
            class("billing::Address", vec![]),
            class("Customer", vec![field("addresses", "Collection<other::Address>")]),
        ])
        .unwrap();

        assert!(schema.resolve(&ClassRef::new("other::Address")).is_none());
        assert!(schema.class("shop::Customer").is_none());
        assert!(schema.resolve(&ClassRef::new("Address")).is_some());

        let dangling = schema.dangling_references();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].target.as_str(), "other::Address");
    }

    #[test]
    fn dangling_collection_targets() {
        let schema = Schema::new(vec![class(
            "Customer",
            vec![
                field("addresses", "Collection<Address>"),
                field("tags", "Collection<string>"),
                field("billing", "?Address"),
            ],
        )])
        .unwrap();

        let dangling: Vec<_> = schema
            .dangling_references()
            .into_iter()
            .map(|d| (d.field, d.target.to_string()))
            .collect();
        assert_eq!(
            dangling,
            vec![
                ("addresses".to_string(), "Address".to_string()),
                ("tags".to_string(), "string".to_string()),
            ]
        );
    }
}
