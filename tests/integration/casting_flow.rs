use serde_json::{Value, json};
use shapeguard::{Schema, ValidationOptions, Verdict, validate};

fn answer_schema() -> Schema {
    Schema::from_value(&json!({
        "properties": {
            "answer": {"type": "integer"},
            "is_ready": {"type": "boolean"}
        }
    }))
    .expect("compile schema")
}

fn run(document: &mut Value, schema: &Schema, options: ValidationOptions) -> Verdict {
    validate(document, schema, &options).expect("verdict")
}

#[test]
fn castable_strings_pass_with_cast() {
    let schema = answer_schema();
    let cast = ValidationOptions::new().cast(true);

    assert!(run(&mut json!({"answer": "42"}), &schema, cast).valid);
    assert!(!run(&mut json!({"answer": "forty2"}), &schema, cast).valid);
    assert!(!run(&mut json!({"answer": "42"}), &schema, ValidationOptions::new()).valid);
}

#[test]
fn cast_without_cast_source_leaves_the_document() {
    let schema = answer_schema();
    let mut document = json!({"answer": "42", "is_ready": "true"});
    let verdict = run(&mut document, &schema, ValidationOptions::new().cast(true));
    assert!(verdict.valid);
    assert_eq!(document, json!({"answer": "42", "is_ready": "true"}));
}

#[test]
fn cast_source_writes_converted_values_back() {
    let schema = Schema::from_value(&json!({
        "properties": {
            "answer": {"type": "integer"},
            "answer2": {"type": "number"},
            "answer3": {"type": "array", "items": {"type": "string"}},
            "answer4": {"type": "array", "items": {"type": "integer"}},
            "is_ready1": {"type": "boolean"},
            "is_ready2": {"type": "boolean"},
            "is_ready3": {"type": "boolean"},
            "is_ready4": {"type": "boolean"}
        }
    }))
    .expect("compile schema");
    let mut document = json!({
        "answer": "42",
        "answer2": "42.2",
        "answer3": ["yep"],
        "answer4": ["1", "2", "3"],
        "is_ready1": "true",
        "is_ready2": "1",
        "is_ready3": 0,
        "is_ready4": "false"
    });
    let options = ValidationOptions::new().cast(true).cast_source(true);
    let verdict = run(&mut document, &schema, options);

    assert!(verdict.valid, "unexpected errors: {:?}", verdict.errors);
    assert_eq!(
        document,
        json!({
            "answer": 42,
            "answer2": 42.2,
            "answer3": ["yep"],
            "answer4": [1, 2, 3],
            "is_ready1": true,
            "is_ready2": true,
            "is_ready3": false,
            "is_ready4": false
        })
    );
}

#[test]
fn boolean_casts_accept_only_the_known_forms() {
    let schema = answer_schema();
    let options = ValidationOptions::new().cast(true).cast_source(true);

    let mut zero = json!({"is_ready": "0"});
    assert!(run(&mut zero, &schema, options).valid);
    assert_eq!(zero["is_ready"], json!(false));

    let mut one = json!({"is_ready": 1});
    assert!(run(&mut one, &schema, options).valid);
    assert_eq!(one["is_ready"], json!(true));

    let mut other = json!({"is_ready": 42});
    let verdict = run(&mut other, &schema, options);
    assert_eq!(verdict.errors[0].attribute, "type");
    assert_eq!(other["is_ready"], json!(42));
}

#[test]
fn uncastable_array_items_stay_and_fail() {
    let schema = Schema::from_value(&json!({
        "properties": {"ids": {"type": "array", "items": {"type": "integer"}}}
    }))
    .expect("compile schema");
    let mut document = json!({"ids": ["1", "x", "2.5"]});
    let options = ValidationOptions::new().cast(true).cast_source(true);
    let verdict = run(&mut document, &schema, options);

    assert_eq!(document["ids"], json!([1, "x", "2.5"]));
    let failing: Vec<_> = verdict
        .errors
        .iter()
        .map(|error| error.property.as_deref())
        .collect();
    assert_eq!(failing, vec![Some("ids[1]"), Some("ids[2]")]);
}
