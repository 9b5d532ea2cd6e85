use serde_json::{Value, json};
use shapeguard::{Schema, ValidationOptions, Validator};

fn town_schema() -> Schema {
    Schema::from_value(&json!({
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
    .expect("compile schema")
}

#[test]
fn absent_properties_receive_independent_defaults() {
    let schema = town_schema();
    let validator = Validator::new();
    let options = ValidationOptions::new().apply_default_value(true);

    let mut first = json!({"town": "Auckland"});
    let mut second = json!({"town": "Wellington"});
    assert!(validator.validate_with(&mut first, &schema, &options).expect("verdict").valid);
    assert!(validator.validate_with(&mut second, &schema, &options).expect("verdict").valid);

    first["country"]["name"] = json!("Aotearoa");
    assert_eq!(
        second,
        json!({
            "town": "Wellington",
            "country": {"id": 1, "name": "New Zealand"},
            "planet": "Earth"
        })
    );
    assert_eq!(
        schema.property("country").and_then(|country| country.default.clone()),
        Some(json!({"id": 1, "name": "New Zealand"}))
    );
}

#[test]
fn present_values_are_preserved() {
    let schema = town_schema();
    let mut document = json!({
        "town": "Auckland",
        "country": {"id": 2, "name": "USA"},
        "planet": "Mars"
    });
    let original = document.clone();
    let options = ValidationOptions::new().apply_default_value(true);
    let verdict = Validator::new()
        .validate_with(&mut document, &schema, &options)
        .expect("verdict");
    assert!(verdict.valid);
    assert_eq!(document, original);
}

#[test]
fn defaults_stay_out_without_the_option() {
    let mut document = json!({"town": "Auckland"});
    Validator::new()
        .validate(&mut document, &town_schema())
        .expect("verdict");
    assert_eq!(document, json!({"town": "Auckland"}));
}

fn broken_default_schema() -> Schema {
    Schema::from_value(&json!({
        "properties": {
            "country": {
                "type": "object",
                "properties": {"id": {"type": "integer"}},
                "default": {"id": "abc"}
            }
        }
    }))
    .expect("compile schema")
}

#[test]
fn declared_defaults_are_checked_on_request() {
    let schema = broken_default_schema();
    let validator = Validator::new();

    let mut quiet = json!({});
    assert!(validator.validate(&mut quiet, &schema).expect("verdict").valid);

    let mut checked = json!({});
    let options = ValidationOptions::new().validate_default_value(true);
    let verdict = validator
        .validate_with(&mut checked, &schema, &options)
        .expect("verdict");
    assert!(!verdict.valid);
    assert_eq!(verdict.errors[0].attribute, "type");
    assert_eq!(verdict.errors[0].property.as_deref(), Some("country.id"));
    assert_eq!(checked, json!({}));
}

#[test]
fn injected_defaults_are_checked_like_any_value() {
    let schema = broken_default_schema();
    let mut document: Value = json!({});
    let options = ValidationOptions::new().apply_default_value(true);
    let verdict = Validator::new()
        .validate_with(&mut document, &schema, &options)
        .expect("verdict");
    assert_eq!(verdict.errors.len(), 1);
    assert_eq!(document, json!({"country": {"id": "abc"}}));
}

#[test]
fn explicit_null_defaults_are_injected() {
    let schema = Schema::from_value(&json!({
        "properties": {"note": {"type": ["string", "null"], "default": null}}
    }))
    .expect("compile schema");
    let mut document = json!({});
    let options = ValidationOptions::new().apply_default_value(true);
    assert!(
        Validator::new()
            .validate_with(&mut document, &schema, &options)
            .expect("verdict")
            .valid
    );
    assert_eq!(document, json!({"note": null}));
}
