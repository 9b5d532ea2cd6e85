use serde_json::{Value, json};

use crate::engine::Validator;
use crate::engine::format::SemanticFormat;

/// Names accepted by the `format` and `filter` keywords.
pub fn run(validator: &Validator) -> Value {
    let formats: Vec<&str> = SemanticFormat::ALL
        .iter()
        .map(|format| format.as_str())
        .collect();
    let filters: Vec<&str> = validator.filters().names().collect();
    json!({
        "formats": formats,
        "filters": filters,
    })
}
