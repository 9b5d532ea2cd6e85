use serde_json::{Value, json};
use shapeguard::{Schema, SchemaError, ValidationOptions, Verdict, validate};

fn check(schema: Value, mut document: Value) -> Verdict {
    let schema = Schema::from_value(&schema).expect("compile schema");
    validate(&mut document, &schema, &ValidationOptions::new()).expect("verdict")
}

fn check_field(field: Value, value: Value) -> Verdict {
    check(
        json!({"properties": {"field": field}}),
        json!({"field": value}),
    )
}

#[test]
fn every_tag_accepts_its_own_runtime_type() {
    let cases = [
        ("string", json!("text")),
        ("number", json!(1.5)),
        ("integer", json!(42)),
        ("boolean", json!(false)),
        ("object", json!({"a": 1})),
        ("array", json!([1, 2])),
        ("null", Value::Null),
        ("any", json!("anything")),
    ];
    for (tag, value) in cases {
        let verdict = check_field(json!({"type": tag}), value);
        assert!(verdict.valid, "{tag}: {:?}", verdict.errors);
    }
}

#[test]
fn other_runtime_types_report_a_type_violation() {
    let cases = [
        ("string", json!(1), "number"),
        ("number", json!("1"), "string"),
        ("integer", json!(1.5), "number"),
        ("boolean", json!(0), "number"),
        ("object", json!([1]), "array"),
        ("array", json!({"0": 1}), "object"),
        ("null", json!(false), "boolean"),
    ];
    for (tag, value, actual) in cases {
        let verdict = check_field(json!({"type": tag}), value);
        assert!(!verdict.valid, "{tag} should fail");
        let error = &verdict.errors[0];
        assert_eq!(error.attribute, "type");
        assert_eq!(error.expected, json!(tag));
        assert_eq!(error.actual, json!(actual));
        assert_eq!(error.message, format!("must be of {tag} type"));
    }
}

#[test]
fn whole_floats_count_as_integers() {
    assert!(check_field(json!({"type": "integer"}), json!(3.0)).valid);
}

#[test]
fn union_types_report_every_tag_once() {
    let verdict = check_field(json!({"type": ["string", "null"]}), json!(7));
    assert_eq!(verdict.errors.len(), 1);
    assert_eq!(verdict.errors[0].expected, json!(["string", "null"]));
    assert_eq!(verdict.errors[0].message, "must be of string, null type");
    assert!(check_field(json!({"type": ["string", "null"]}), Value::Null).valid);
}

#[test]
fn decimal_divisors_avoid_binary_rounding() {
    let field = json!({"type": "number", "divisibleBy": 0.01});
    assert!(check_field(field.clone(), json!(0.2)).valid);
    assert!(check_field(field.clone(), json!(10.35)).valid);
    let verdict = check_field(field, json!(0.009));
    assert_eq!(verdict.errors[0].attribute, "divisibleBy");
}

#[test]
fn numeric_bounds_are_inclusive_unless_exclusive() {
    let field = json!({"minimum": 1, "maximum": 10});
    assert!(check_field(field.clone(), json!(1)).valid);
    assert!(check_field(field.clone(), json!(10)).valid);
    assert_eq!(
        check_field(field, json!(11)).errors[0].message,
        "must be less than or equal to 10"
    );

    let exclusive = json!({"exclusiveMinimum": 1});
    assert_eq!(
        check_field(exclusive, json!(1)).errors[0].attribute,
        "exclusiveMinimum"
    );
}

#[test]
fn enum_and_string_rules() {
    let field = json!({"enum": ["red", "green", 3]});
    assert!(check_field(field.clone(), json!(3.0)).valid);
    assert_eq!(
        check_field(field, json!("blue")).errors[0].attribute,
        "enum"
    );

    let field = json!({"type": "string", "minLength": 2, "allowEmpty": false});
    let verdict = check_field(field, json!(""));
    let attributes: Vec<_> = verdict
        .errors
        .iter()
        .map(|error| error.attribute.as_str())
        .collect();
    assert_eq!(attributes, vec!["allowEmpty", "minLength"]);
}

#[test]
fn pattern_fails_non_strings() {
    let verdict = check_field(json!({"pattern": "^a"}), json!(5));
    assert_eq!(verdict.errors[0].attribute, "pattern");
    assert_eq!(verdict.errors[0].actual, json!("number"));
}

#[test]
fn malformed_schemas_are_configuration_errors() {
    let unknown_format = Schema::from_value(&json!({"format": "zipcode"}));
    assert!(matches!(
        unknown_format,
        Err(SchemaError::UnknownFormat { name }) if name == "zipcode"
    ));

    let bad_pattern = Schema::from_value(&json!({"properties": {"a": {"pattern": "("}}}));
    match bad_pattern {
        Err(SchemaError::Pattern { location, .. }) => assert_eq!(location, "#/properties/a"),
        other => panic!("unexpected result: {other:?}"),
    }

    assert!(matches!(
        Schema::from_value(&json!({"type": "text"})),
        Err(SchemaError::UnknownType { .. })
    ));
    assert!(matches!(
        Schema::from_value(&json!({"divisibleBy": 0})),
        Err(SchemaError::Keyword { keyword: "divisibleBy", .. })
    ));
}
