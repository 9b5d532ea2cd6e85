use serde_json::{Value, json};
use shapeguard::{Schema, ValidateError, ValidationOptions, Validator};

fn two_error_case() -> (Schema, Value) {
    let schema = Schema::from_value(&json!({
        "properties": {
            "town": {"type": "string"},
            "country": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "name": {"type": "string"}
                },
                "default": {"id": 1, "name": "New Zealand"}
            },
            "planet": {"type": "string", "default": "Earth"}
        }
    }))
    .expect("compile schema");
    (schema, json!({"town": 1, "planet": 2}))
}

#[test]
fn exit_on_first_error_keeps_one_violation() {
    let (schema, mut document) = two_error_case();
    let options = ValidationOptions::new().exit_on_first_error(true);
    let verdict = Validator::new()
        .validate_with(&mut document, &schema, &options)
        .expect("verdict");
    assert!(!verdict.valid);
    assert_eq!(verdict.errors.len(), 1);
    assert_eq!(verdict.errors[0].property.as_deref(), Some("town"));
}

#[test]
fn without_the_option_both_violations_are_reported() {
    let (schema, mut document) = two_error_case();
    let verdict = Validator::new()
        .validate(&mut document, &schema)
        .expect("verdict");
    assert!(!verdict.valid);
    assert_eq!(verdict.errors.len(), 2);
}

#[test]
fn fail_on_first_error_aborts_with_a_descriptive_error() {
    let (schema, mut document) = two_error_case();
    let options = ValidationOptions::new().fail_on_first_error(true);
    let error = Validator::new()
        .validate_with(&mut document, &schema, &options)
        .expect_err("abort");

    assert_eq!(
        error.to_string(),
        "validation aborted: attribute `type` of property `town` failed: \
         expected `string`, actual `number`: must be of string type"
    );
    let violation = error.violation().expect("violation");
    assert_eq!(violation.attribute, "type");
    assert_eq!(violation.expected, json!("string"));
    assert_eq!(violation.actual, json!("number"));
    assert!(matches!(error, ValidateError::Aborted(_)));
}

#[test]
fn fail_fast_wins_over_exit_on_first_error() {
    let (schema, mut document) = two_error_case();
    let options = ValidationOptions::new()
        .exit_on_first_error(true)
        .fail_on_first_error(true);
    assert!(
        Validator::new()
            .validate_with(&mut document, &schema, &options)
            .is_err()
    );
}

#[test]
fn a_failed_container_skips_its_own_children() {
    let schema = Schema::from_value(&json!({
        "properties": {
            "tags": {"type": "array", "minItems": 3, "items": {"type": "string"}}
        }
    }))
    .expect("compile schema");

    let options = ValidationOptions::new().exit_on_first_error(true);
    let mut document = json!({"tags": [1, 2]});
    let verdict = Validator::new()
        .validate_with(&mut document, &schema, &options)
        .expect("verdict");
    let attributes: Vec<_> = verdict
        .errors
        .iter()
        .map(|error| error.attribute.as_str())
        .collect();
    assert_eq!(attributes, vec!["minItems"]);

    let mut document = json!({"tags": [1, 2]});
    let verdict = Validator::new()
        .validate(&mut document, &schema)
        .expect("verdict");
    assert_eq!(verdict.errors.len(), 3);
}
