//! End-to-end construction of schema-declared classes with the built-in
//! rule validator.

use dtoforge::rules::{derive_implicit_rules, implicit_rule_names};
use dtoforge::{
    load_schema_from_toml, DtoError, Engine, FieldValue, RuleValidator, Schema, Validator,
};
use serde_json::{json, Value};
use std::sync::Arc;

const SCHEMA: &str = r#"
[[dto]]
name = "Address"

[[dto.fields]]
name = "addressOne"
input = "address_one"
type = "string"
rules = "max:255"

[[dto.fields]]
name = "buildingNumber"
input = "building_number"
type = "?string"
rules = "max:10"

[[dto.fields]]
name = "floor"
type = "?string"
rules = "required_with:buildingNumber"

[[dto.fields]]
name = "city"
type = "string"

[[dto.fields]]
name = "phone"
type = "string"

[[dto]]
name = "Customer"

[[dto.fields]]
name = "fullName"
input = "full_name"
type = "string"

[[dto.fields]]
name = "addresses"
type = "Collection<Address>"

[[dto.fields]]
name = "billing"
type = "?Address"

[[dto]]
name = "Tagged"

[[dto.fields]]
name = "tags"
type = "Collection<string>"

[[dto]]
name = "Member"

[[dto.fields]]
name = "groups"
type = "array<string>"

[[dto]]
name = "Node"

[[dto.fields]]
name = "label"
type = "string"

[[dto.fields]]
name = "child"
type = "?Node"
"#;

fn schema() -> Schema {
    load_schema_from_toml(SCHEMA).unwrap()
}

fn engine() -> Engine {
    Engine::new(RuleValidator::new())
}

fn address_input() -> Value {
    json!({"address_one": "Main St", "city": "Town", "phone": "+10000000000"})
}

#[test]
fn address_round_trip() {
    let address = engine()
        .create_dynamic(&schema(), "Address", &address_input())
        .unwrap();

    assert_eq!(address.class(), "Address");
    assert_eq!(
        address.to_json(),
        json!({
            "addressOne": "Main St",
            "buildingNumber": null,
            "floor": null,
            "city": "Town",
            "phone": "+10000000000"
        })
    );
    let names: Vec<_> = address.fields().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec!["addressOne", "buildingNumber", "floor", "city", "phone"]
    );
}

#[test]
fn floor_is_required_with_building_number() {
    let mut input = address_input();
    input["building_number"] = json!("12");

    let err = engine()
        .create_dynamic(&schema(), "Address", &input)
        .unwrap_err();
    assert_eq!(err.class(), "Address");
    assert_eq!(
        err.message(),
        "The floor field is required when buildingNumber is present."
    );
    assert!(err.is_input_error());

    input["floor"] = json!("3");
    let address = engine().create_dynamic(&schema(), "Address", &input).unwrap();
    assert_eq!(
        address.get("floor").and_then(FieldValue::as_scalar),
        Some(&json!("3"))
    );
}

#[test]
fn customer_with_nested_addresses() {
    let customer = engine()
        .create_dynamic(
            &schema(),
            "Customer",
            &json!({
                "full_name": "Jane",
                "addresses": [{"address_one": "A", "city": "C", "phone": "+10000000000"}]
            }),
        )
        .unwrap();

    let addresses = customer
        .get("addresses")
        .and_then(FieldValue::as_collection)
        .unwrap();
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0].class(), "Address");
    assert_eq!(
        addresses[0].get("addressOne").and_then(FieldValue::as_scalar),
        Some(&json!("A"))
    );
    assert!(customer.get("billing").is_some_and(FieldValue::is_null));
}

#[test]
fn collection_keeps_input_order() {
    let customer = engine()
        .create_dynamic(
            &schema(),
            "Customer",
            &json!({
                "full_name": "Jane",
                "addresses": [
                    {"address_one": "First", "city": "C", "phone": "1"},
                    {"address_one": "Second", "city": "C", "phone": "2"},
                    {"address_one": "Third", "city": "C", "phone": "3"}
                ],
                "billing": {"address_one": "Bill", "city": "C", "phone": "4"}
            }),
        )
        .unwrap();

    let lines: Vec<_> = customer
        .get("addresses")
        .and_then(FieldValue::as_collection)
        .unwrap()
        .iter()
        .map(|a| a.get("addressOne").and_then(FieldValue::as_scalar).cloned())
        .collect();
    assert_eq!(
        lines,
        vec![Some(json!("First")), Some(json!("Second")), Some(json!("Third"))]
    );
    assert_eq!(
        customer
            .get("billing")
            .and_then(FieldValue::as_nested)
            .map(|b| b.class()),
        Some("Address")
    );
}

#[test]
fn nested_failure_reports_nested_class() {
    let err = engine()
        .create_dynamic(
            &schema(),
            "Customer",
            &json!({"full_name": "Jane", "addresses": [{"address_one": "A", "phone": "1"}]}),
        )
        .unwrap_err();
    assert_eq!(err.class(), "Address");
    assert_eq!(err.message(), "The city field is required.");
}

#[test]
fn collection_of_non_dto_is_a_schema_error() {
    let err = engine()
        .create_dynamic(&schema(), "Tagged", &json!({"tags": ["a", "b"]}))
        .unwrap_err();
    assert!(matches!(
        err,
        DtoError::SchemaConfiguration { ref class, ref field, .. }
            if class == "Tagged" && field == "tags"
    ));
    assert!(!err.is_input_error());
}

#[test]
fn primitive_arrays() {
    let member = engine()
        .create_dynamic(&schema(), "Member", &json!({"groups": ["a", "b"]}))
        .unwrap();
    assert_eq!(
        member.get("groups").and_then(FieldValue::as_scalar),
        Some(&json!(["a", "b"]))
    );

    let err = engine()
        .create_dynamic(&schema(), "Member", &json!({"groups": [1, 2]}))
        .unwrap_err();
    assert_eq!(err.message(), "The groups.0 field must be a string.");
    assert_eq!(err.field_errors().map(|e| e.len()), Some(2));
}

#[test]
fn construction_succeeds_iff_validation_passes() {
    let schema = schema();
    let rules = schema.rules_for("Address").unwrap();
    let validator = RuleValidator::new();
    let inputs = [
        address_input(),
        json!({"address_one": "Main St", "city": "Town"}),
        json!({"address_one": "x".repeat(256), "city": "Town", "phone": "1"}),
        json!({"address_one": "A", "city": "B", "phone": "1", "building_number": "12", "floor": "2"}),
        json!({"address_one": "A", "city": "B", "phone": "1", "building_number": "12"}),
        json!({}),
    ];

    for input in &inputs {
        let validated = validator.validate(input.as_object().unwrap(), rules);
        let created = engine().create_dynamic(&schema, "Address", input);
        assert_eq!(validated.is_ok(), created.is_ok(), "input: {input}");
    }
}

#[test]
fn construction_is_idempotent() {
    let schema = schema();
    let engine = engine();
    let first = engine.create_dynamic(&schema, "Address", &address_input()).unwrap();
    let second = engine.create_dynamic(&schema, "Address", &address_input()).unwrap();
    assert_eq!(first, second);

    let input = json!({"address_one": "A"});
    assert_eq!(
        engine.create_dynamic(&schema, "Address", &input).unwrap_err(),
        engine.create_dynamic(&schema, "Address", &input).unwrap_err()
    );
}

#[test]
fn implicit_rules_are_pure_and_exclusive() {
    for signature in ["string", "?string", "int|null", "?array<int>", "Collection<Address>", "Address"] {
        assert_eq!(derive_implicit_rules(signature), derive_implicit_rules(signature));
        let names = implicit_rule_names(signature);
        assert_ne!(
            names.contains(&"required"),
            names.contains(&"nullable"),
            "signature: {signature}"
        );
    }
}

#[test]
fn composed_rule_sets() {
    let schema = schema();
    let render = |class: &str| {
        schema
            .rules_for(class)
            .unwrap()
            .iter()
            .map(|(key, rules)| format!("{key} => {rules}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    insta::assert_snapshot!(render("Address"), @r"
    address_one => max:255|required|string
    building_number => max:10|nullable|string
    floor => required_with:buildingNumber|nullable|string
    city => required|string
    phone => required|string
    ");
    insta::assert_snapshot!(render("Member"), @r"
    groups => required|array
    groups.* => string
    ");
}

#[test]
fn self_reference_is_bounded_by_depth() {
    let engine = Engine::builder()
        .validator(RuleValidator::new())
        .max_depth(2)
        .build()
        .unwrap();
    let schema = schema();

    let shallow = json!({"label": "a", "child": {"label": "b", "child": {"label": "c"}}});
    assert!(engine.create_dynamic(&schema, "Node", &shallow).is_ok());

    let deep = json!({"label": "a", "child": {"label": "b", "child": {"label": "c", "child": {"label": "d"}}}});
    assert_eq!(
        engine.create_dynamic(&schema, "Node", &deep).unwrap_err(),
        DtoError::DepthExceeded {
            class: "Node".to_string(),
            max_depth: 2
        }
    );
}

#[test]
fn input_must_be_an_object() {
    let err = engine()
        .create_dynamic(&schema(), "Address", &json!("Main St"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Address: The input for Address must be an object.");

    let err = engine()
        .create_dynamic(&schema(), "Customer", &json!({"full_name": "Jane", "addresses": "none"}))
        .unwrap_err();
    assert_eq!(err.class(), "Customer");
}

#[test]
fn unknown_rule_is_a_schema_error() {
    let schema = load_schema_from_toml(
        r#"
[[dto]]
name = "Broken"

[[dto.fields]]
name = "value"
input = "the_value"
type = "string"
rules = "shiny"
"#,
    )
    .unwrap();

    let err = engine()
        .create_dynamic(&schema, "Broken", &json!({"the_value": "x"}))
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Broken.value: rule `shiny` cannot be evaluated: unknown rule");
}

#[test]
fn unknown_class() {
    let err = engine()
        .create_dynamic(&schema(), "Invoice", &json!({}))
        .unwrap_err();
    assert_eq!(
        err,
        DtoError::UnknownClass {
            class: "Invoice".to_string()
        }
    );
}

#[test]
fn shared_engine_across_threads() {
    let engine = Arc::new(engine());
    let schema = Arc::new(schema());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let schema = Arc::clone(&schema);
            std::thread::spawn(move || {
                let input = json!({"address_one": format!("Street {i}"), "city": "Town", "phone": "1"});
                engine
                    .create_dynamic(&schema, "Address", &input)
                    .map(|a| a.to_json()["addressOne"].clone())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap().unwrap(), json!(format!("Street {i}")));
    }
}

const OPTIONAL_LISTS: &str = r#"
[[dto]]
name = "Address"

[[dto.fields]]
name = "city"
type = "string"

[[dto]]
name = "Roster"

[[dto.fields]]
name = "groups"
type = "array<string>|null"

[[dto.fields]]
name = "addresses"
type = "Collection<Address>|null"

[[dto.fields]]
name = "pet"
type = "?string"
rules = "regex:/^(big |small )cat$/"
"#;

#[test]
fn null_alternative_after_generic_is_optional() {
    let schema = load_schema_from_toml(OPTIONAL_LISTS).unwrap();
    assert!(schema.dangling_references().is_empty());

    let empty = engine().create_dynamic(&schema, "Roster", &json!({})).unwrap();
    assert!(empty.get("groups").is_some_and(FieldValue::is_null));
    assert!(empty.get("addresses").is_some_and(FieldValue::is_null));

    let full = engine()
        .create_dynamic(
            &schema,
            "Roster",
            &json!({"groups": ["a"], "addresses": [{"city": "Oslo"}]}),
        )
        .unwrap();
    assert_eq!(full.get("addresses").and_then(FieldValue::as_collection).map(<[_]>::len), Some(1));

    let err = engine()
        .create_dynamic(&schema, "Roster", &json!({"groups": [1]}))
        .unwrap_err();
    assert_eq!(err.message(), "The groups.0 field must be a string.");
}

#[test]
fn pattern_rules_reach_the_validator_verbatim() {
    let schema = load_schema_from_toml(OPTIONAL_LISTS).unwrap();
    insta::assert_snapshot!(
        schema.rules_for("Roster").unwrap().get("pet").unwrap(),
        @"regex:/^(big |small )cat$/|nullable|string"
    );

    let roster = engine()
        .create_dynamic(&schema, "Roster", &json!({"pet": "big cat"}))
        .unwrap();
    assert_eq!(roster.get("pet").and_then(FieldValue::as_scalar), Some(&json!("big cat")));

    let err = engine()
        .create_dynamic(&schema, "Roster", &json!({"pet": "bigcat"}))
        .unwrap_err();
    assert_eq!(err.message(), "The pet field format is invalid.");
}
