use std::sync::Arc;
use std::thread;

use serde_json::json;
use shapeguard::{SchemaCatalog, ValidationOptions, Validator};

fn catalog() -> SchemaCatalog {
    let mut catalog = SchemaCatalog::new();
    catalog
        .add_document(
            "town",
            &json!({
                "name": "Town",
                "properties": {
                    "name": {"type": "string", "filter": "trim", "minLength": 2},
                    "population": {"type": "integer", "minimum": 0}
                },
                "additionalProperties": false
            }),
        )
        .expect("compile town");
    catalog
}

#[test]
fn catalog_schemas_validate_by_id() {
    let catalog = catalog();
    let schema = catalog.get("town").expect("town schema");
    let validator = Validator::new();

    let mut good = json!({"name": " Napier ", "population": 66000});
    assert!(validator.validate(&mut good, schema).expect("verdict").valid);
    assert_eq!(good["name"], json!("Napier"));

    let mut bad = json!({"name": "N", "population": -1, "mayor": "x"});
    let verdict = validator.validate(&mut bad, schema).expect("verdict");
    let attributes: Vec<_> = verdict
        .errors
        .iter()
        .map(|error| error.attribute.as_str())
        .collect();
    assert_eq!(attributes, vec!["minLength", "minimum", "additionalProperties"]);
}

#[test]
fn one_validator_serves_many_threads() {
    let schema = Arc::new(catalog().get("town").expect("town schema").clone());
    let validator = Arc::new(
        Validator::builder()
            .default_options(ValidationOptions::new().cast(true).cast_source(true))
            .build(),
    );

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let schema = Arc::clone(&schema);
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                let mut document = json!({"name": "Hastings", "population": index.to_string()});
                let verdict = validator.validate(&mut document, &schema).expect("verdict");
                (verdict.valid, document["population"].clone())
            })
        })
        .collect();

    for (index, handle) in handles.into_iter().enumerate() {
        let (valid, population) = handle.join().expect("thread");
        assert!(valid);
        assert_eq!(population, json!(index));
    }
}
