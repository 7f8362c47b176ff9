//! Statically typed DTOs declared with `#[derive(Dto)]`.

use dtoforge::{Dto, DtoError, Engine, FieldKind, Project, RuleValidator};
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Dto)]
struct Address {
    #[dto(rules = "max:255")]
    address_one: String,
    #[dto(rules = "max:10")]
    building_number: Option<String>,
    #[dto(rules = "required_with:building_number")]
    floor: Option<String>,
    city: String,
    phone: String,
}

#[derive(Debug, PartialEq, Dto)]
#[dto(class = "shop::Customer")]
struct Customer {
    #[dto(input = "fullName", rules = "max:100")]
    full_name: String,
    addresses: Vec<Address>,
    billing: Option<Address>,
}

#[derive(Debug, PartialEq, Dto)]
struct Member {
    groups: Vec<String>,
    #[dto(rules = "between:0,100")]
    score: u8,
    active: bool,
    nickname: Option<String>,
}

#[derive(Debug, PartialEq, Dto)]
struct Envelope {
    payload: Value,
    headers: HashMap<String, String>,
    #[dto(rules = "min:1")]
    recipients: Option<Vec<Address>>,
}

#[derive(Debug, PartialEq, Dto)]
struct Scores {
    scores: Vec<Option<i64>>,
    matrix: Vec<Vec<i64>>,
}

#[derive(Debug, PartialEq, Dto)]
struct Tiny {
    value: u8,
}

fn address_input() -> Value {
    json!({"address_one": "Main St", "city": "Town", "phone": "+10000000000"})
}

#[test]
fn address_round_trip() {
    let address: Address = dtoforge::create(&address_input()).unwrap();
    assert_eq!(
        address,
        Address {
            address_one: "Main St".to_string(),
            building_number: None,
            floor: None,
            city: "Town".to_string(),
            phone: "+10000000000".to_string(),
        }
    );
}

#[test]
fn floor_is_required_with_building_number() {
    let mut input = address_input();
    input["building_number"] = json!("12");

    let err = dtoforge::create::<Address>(&input).unwrap_err();
    assert_eq!(err.class(), "Address");
    assert_eq!(
        err.message(),
        "The floor field is required when building_number is present."
    );
}

#[test]
fn nested_customer() {
    let customer: Customer = dtoforge::create(&json!({
        "fullName": "Jane",
        "addresses": [{"address_one": "A", "city": "C", "phone": "+10000000000"}]
    }))
    .unwrap();

    assert_eq!(customer.full_name, "Jane");
    assert_eq!(customer.addresses.len(), 1);
    assert_eq!(customer.addresses[0].address_one, "A");
    assert!(customer.billing.is_none());
}

#[test]
fn class_attribute_names_errors() {
    let err = dtoforge::create::<Customer>(&json!({"addresses": []})).unwrap_err();
    assert_eq!(err.class(), "shop::Customer");
    insta::assert_snapshot!(err.to_string(), @"shop::Customer: The fullName field is required.");
}

#[test]
fn primitive_fields_are_converted() {
    let member: Member = dtoforge::create(&json!({
        "groups": ["a", "b"],
        "score": "42",
        "active": "yes"
    }))
    .unwrap();
    assert_eq!(
        member,
        Member {
            groups: vec!["a".to_string(), "b".to_string()],
            score: 42,
            active: true,
            nickname: None,
        }
    );

    let err = dtoforge::create::<Member>(&json!({
        "groups": [1, 2],
        "score": 1,
        "active": true
    }))
    .unwrap_err();
    assert_eq!(err.message(), "The groups.0 field must be a string.");
}

#[test]
fn untyped_and_optional_collections() {
    let envelope: Envelope = dtoforge::create(&json!({
        "payload": {"any": ["thing"]},
        "headers": {"x-id": "1"}
    }))
    .unwrap();
    assert_eq!(envelope.payload, json!({"any": ["thing"]}));
    assert_eq!(envelope.headers.get("x-id").map(String::as_str), Some("1"));
    assert!(envelope.recipients.is_none());

    let envelope: Envelope = dtoforge::create(&json!({
        "payload": 1,
        "headers": {"a": "b"},
        "recipients": [address_input()]
    }))
    .unwrap();
    assert_eq!(envelope.recipients.map(|r| r.len()), Some(1));
}

#[test]
fn conversion_error_when_rules_are_too_loose() {
    let err = dtoforge::create::<Tiny>(&json!({"value": 300})).unwrap_err();
    assert!(matches!(
        err,
        DtoError::Conversion { ref class, ref field, .. } if class == "Tiny" && field == "value"
    ));
}

#[test]
fn derived_metadata() {
    let fields: Vec<_> = Customer::fields()
        .iter()
        .map(|f| (f.name(), f.input_name(), f.signature().as_str()))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("full_name", "fullName", "string"),
            ("addresses", "addresses", "Collection<Address>"),
            ("billing", "billing", "?Address"),
        ]
    );
    assert!(matches!(Customer::fields()[1].kind(), FieldKind::DtoCollection(_)));
    assert!(std::ptr::eq(Customer::fields(), Customer::fields()));
}

#[test]
fn derived_rule_sets() {
    let rules = Engine::rules_for::<Member>();
    let rendered = rules
        .iter()
        .map(|(key, rules)| format!("{key} => {rules}"))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(rendered, @r"
    groups => required|array
    groups.* => string
    score => between:0,100|required|numeric
    active => required|boolean
    nickname => nullable|string
    ");
}

#[test]
fn create_from_map_and_idempotence() {
    let engine = Engine::new(RuleValidator::new());
    let Value::Object(map) = address_input() else {
        unreachable!()
    };
    let first: Address = engine.create_from_map(&map).unwrap();
    let second: Address = engine.create_from_map(&map).unwrap();
    assert_eq!(first, second);
}

#[test]
fn project_settings_apply_to_static_dtos() {
    let project = Project::from_toml("[engine]\nmax_depth = 0\n").unwrap();
    let err = project
        .create_typed::<Customer>(&json!({
            "fullName": "Jane",
            "addresses": [address_input()]
        }))
        .unwrap_err();
    assert_eq!(
        err,
        DtoError::DepthExceeded {
            class: "Address".to_string(),
            max_depth: 0
        }
    );
}

#[test]
fn optional_items_accept_null() {
    let scores: Scores = dtoforge::create(&json!({
        "scores": [1, null],
        "matrix": [[1, 2], [3]],
    }))
    .unwrap();
    assert_eq!(scores.scores, vec![Some(1), None]);
    assert_eq!(scores.matrix, vec![vec![1, 2], vec![3]]);

    let rules = Engine::rules_for::<Scores>();
    assert_eq!(rules.get("scores.*"), Some("nullable|int"));
    assert_eq!(rules.get("matrix"), Some("required|array"));
    assert!(rules.get("matrix.*").is_none());

    let err = dtoforge::create::<Scores>(&json!({"scores": [1, "x"], "matrix": [[1]]}))
        .unwrap_err();
    assert_eq!(err.message(), "The scores.1 field must be an integer.");
}
