//! End-to-end tests for the validation entry points.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::json;
use verdict::{
    rules, validate_map, validate_map_list, validate_struct, validate_struct_list,
    validate_value, RulesMap, Validator, ValidatorConfig, ValidatorError,
};

fn login_rules() -> RulesMap {
    rules! {
        "email" => ["required", "email"],
        "password" => ["required", "string"],
    }
}

#[test]
fn test_valid_login_passes() {
    let report = validate_map(
        &json!({"email": "user@example.com", "password": "mySecurePassword"}),
        &login_rules(),
    )
    .unwrap();

    assert!(!report.failed());
    assert!(report.errors().is_empty());
}

#[test]
fn test_invalid_login_reports_each_field() {
    let report = validate_map(&json!({"email": "invalidEmail"}), &login_rules()).unwrap();

    assert!(report.failed());
    assert_eq!(
        report.errors().get("email").unwrap(),
        ["The field email must be a valid email."]
    );
    assert_eq!(
        report.errors().get("password").unwrap(),
        ["The field password is required."]
    );
}

#[test]
fn test_map_list_validates_elements_independently() {
    let report = validate_map_list(
        &[json!({"email": "bad"}), json!({"password": false})],
        &login_rules(),
    )
    .unwrap();

    let errors = report.errors();
    assert_eq!(errors.len(), 4);
    assert_eq!(errors.first_of("0.email"), Some("The field email must be a valid email."));
    assert_eq!(errors.first_of("0.password"), Some("The field password is required."));
    assert_eq!(errors.first_of("1.email"), Some("The field email is required."));
    assert_eq!(
        errors.first_of("1.password"),
        Some("The field password must have an string value.")
    );
}

#[test]
fn test_dotted_and_wildcard_selectors_resolve() {
    let report = validate_map(
        &json!({"map": {"field1": "value1"}, "array": ["val1", "val2"]}),
        &rules! {
            "map.field1" => ["required"],
            "array.*" => ["string"],
        },
    )
    .unwrap();

    assert!(report.passed());
}

#[test]
fn test_missing_params_is_a_configuration_fault() {
    let err = validate_map(&json!({"code": 13839}), &rules! { "code" => ["digitsBetween:5"] })
        .unwrap_err();

    assert!(matches!(
        err,
        ValidatorError::MissingParams { ref rule, required: 2, given: 1 } if rule == "digitsBetween"
    ));
}

#[test]
fn test_fault_discards_partial_report() {
    let err = validate_map(
        &json!({"email": "bad"}),
        &rules! {
            "email" => ["required", "email"],
            "age" => ["integer", "btween:1,2"],
        },
    )
    .unwrap_err();
    assert_eq!(err.rule_name(), Some("btween"));
}

#[test]
fn test_absent_field_never_fails_non_presence_rules() {
    let report = validate_map(
        &json!({"present": 1, "nulled": null}),
        &rules! {
            "missing" => ["email", "integer", "between:5,10", "alpha", "sameAs:present"],
            "nulled" => ["string", "min:3"],
            "deep.path.0" => ["uuid"],
        },
    )
    .unwrap();

    assert!(report.passed());
}

#[test]
fn test_stop_on_first_failure_is_local_to_selector() {
    let validator = Validator::new().with_config(ValidatorConfig::new().stop_on_first_failure(true));
    let report = validator
        .validate_map(
            &json!({"a": "text", "b": "x"}),
            &rules! {
                "a" => ["integer", "min:10"],
                "b" => ["string", "length:3", "alphaNum"],
            },
        )
        .unwrap();

    assert_eq!(
        report.errors().get("a").unwrap(),
        ["The field a must have an integer value."]
    );
    assert_eq!(
        report.errors().get("b").unwrap(),
        ["The field b must have exact length of 3."]
    );
}

#[test]
fn test_all_failures_collected_by_default() {
    let report = Validator::new()
        .with_config(ValidatorConfig::new())
        .validate_map(&json!({"a": "text"}), &rules! { "a" => ["integer", "min:10"] })
        .unwrap();

    assert_eq!(report.errors().get("a").unwrap().len(), 2);
}

#[test]
fn test_runs_are_idempotent() {
    let input = json!({
        "users": [
            {"email": "x", "age": 17},
            {"email": "ok@example.com", "age": "old"},
            {}
        ]
    });
    let rules = rules! {
        "users.*.email" => ["required", "email"],
        "users.*.age" => ["required", "integer", "between:18,99"],
    };

    let first = validate_map(&input, &rules).unwrap();
    let second = validate_map(&input, &rules).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.errors().selectors().collect::<Vec<_>>(),
        second.errors().selectors().collect::<Vec<_>>()
    );
}

#[test]
fn test_nested_wildcards_key_errors_by_index() {
    let report = validate_map(
        &json!({
            "teams": [
                {"members": [{"name": "Ann"}, {"name": ""}]},
                {"members": [{}]}
            ]
        }),
        &rules! { "teams.*.members.*.name" => ["required", "alpha"] },
    )
    .unwrap();

    let keys: Vec<&str> = report.errors().selectors().collect();
    assert_eq!(keys, vec!["teams.0.members.1.name", "teams.1.members.0.name"]);
    assert_eq!(
        report.errors().first_of("teams.1.members.0.name"),
        Some("The field teams.1.members.0.name is required.")
    );
}

#[test]
fn test_wildcard_over_missing_sequence_is_vacuous() {
    let report = validate_map(&json!({"users": "none"}), &rules! { "users.*.email" => ["required"] })
        .unwrap();
    assert!(report.passed());
}

#[test]
fn test_validate_value() {
    let report = validate_value(&json!("not-an-email"), &["required", "email"]).unwrap();
    assert_eq!(
        report.errors().first_of("variable"),
        Some("The field variable must be a valid email.")
    );

    let report = validate_value(&json!(7), &["integer", "between:1,10"]).unwrap();
    assert!(report.passed());

    let rules = vec!["required".to_string()];
    let report = validate_value(&json!(null), &rules).unwrap();
    assert!(report.errors().has("variable"));
}

#[derive(Serialize)]
struct Address {
    city: String,
    zip: String,
}

#[derive(Serialize)]
struct Customer {
    name: String,
    email: Option<String>,
    addresses: Vec<Address>,
}

fn customer_rules() -> RulesMap {
    rules! {
        "name" => ["required", "alphaSpace"],
        "email" => ["required", "email"],
        "addresses.*.zip" => ["required", "digits:5"],
    }
}

#[test]
fn test_validate_struct() {
    let customer = Customer {
        name: "Ada Lovelace".to_string(),
        email: None,
        addresses: vec![
            Address {
                city: "London".to_string(),
                zip: "12345".to_string(),
            },
            Address {
                city: "Paris".to_string(),
                zip: "750".to_string(),
            },
        ],
    };

    let report = validate_struct(&customer, &customer_rules()).unwrap();
    let keys: Vec<&str> = report.errors().selectors().collect();
    assert_eq!(keys, vec!["email", "addresses.1.zip"]);
    assert_eq!(
        report.errors().first_of("addresses.1.zip"),
        Some("The field addresses.1.zip must have exactly 5 digits.")
    );
}

#[test]
fn test_validate_struct_list() {
    let customers = vec![
        Customer {
            name: "Grace Hopper".to_string(),
            email: Some("grace@navy.mil".to_string()),
            addresses: vec![],
        },
        Customer {
            name: "R2-D2".to_string(),
            email: Some("beep".to_string()),
            addresses: vec![],
        },
    ];

    let report = validate_struct_list(&customers, &customer_rules()).unwrap();
    let keys: Vec<&str> = report.errors().selectors().collect();
    assert_eq!(keys, vec!["1.name", "1.email"]);
}

#[test]
fn test_struct_entry_point_rejects_non_structs() {
    let err = validate_struct(&vec![1, 2, 3], &customer_rules()).unwrap_err();
    assert!(matches!(err, ValidatorError::NotAStruct { kind: "array" }));

    let err = validate_struct("text", &customer_rules()).unwrap_err();
    assert!(matches!(err, ValidatorError::NotAStruct { kind: "string" }));
}

#[test]
fn test_struct_entry_point_rejects_maps() {
    let mut fields = HashMap::new();
    fields.insert("name", "Ada Lovelace");
    fields.insert("email", "ada@example.com");

    let err = validate_struct(&fields, &customer_rules()).unwrap_err();
    assert!(matches!(err, ValidatorError::NotAStruct { kind: "map" }));

    let err = validate_struct_list(&[fields.clone()], &customer_rules()).unwrap_err();
    assert!(matches!(err, ValidatorError::NotAStruct { kind: "map" }));

    let as_value = serde_json::to_value(&fields).unwrap();
    assert!(validate_map(&as_value, &rules! { "name" => ["required"] }).unwrap().passed());
}

#[test]
fn test_struct_entry_point_sees_through_wrappers() {
    let customer = Customer {
        name: "Ada Lovelace".to_string(),
        email: Some("ada@example.com".to_string()),
        addresses: vec![],
    };

    assert!(validate_struct(&Some(&customer), &customer_rules()).unwrap().passed());
    assert!(validate_struct(&Box::new(customer), &customer_rules()).unwrap().passed());
}

#[test]
fn test_map_list_keeps_index_order_across_many_elements() {
    let inputs: Vec<_> = (0..64)
        .map(|i| if i % 3 == 0 { json!({"n": "x"}) } else { json!({"n": i}) })
        .collect();

    let report = validate_map_list(&inputs, &rules! { "n" => ["integer"] }).unwrap();
    let keys: Vec<String> = report.errors().selectors().map(String::from).collect();
    let expected: Vec<String> = (0..64).filter(|i| i % 3 == 0).map(|i| format!("{}.n", i)).collect();
    assert_eq!(keys, expected);
}

#[test]
fn test_report_into_validation() {
    let report = validate_map(&json!({}), &rules! { "a" => ["required"] }).unwrap();
    let validation = report.into_validation();
    assert!(validation.is_failure());
}
