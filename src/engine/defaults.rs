use serde_json::{Map, Value};

use crate::domain::options::Settings;
use crate::domain::schema::Schema;

/// Injects a deep copy of the declared default into an absent property.
/// Returns whether the document changed.
pub fn apply_default(
    schema: &Schema,
    parent: &mut Map<String, Value>,
    name: &str,
    settings: &Settings,
) -> bool {
    if !settings.apply_default_value || parent.contains_key(name) {
        return false;
    }
    let Some(default) = &schema.default else {
        return false;
    };
    parent.insert(name.to_string(), default.clone());
    true
}

/// Copy of the declared default to check in place of an absent property.
pub fn default_to_validate(schema: &Schema, settings: &Settings) -> Option<Value> {
    if !settings.validate_default_value {
        return None;
    }
    schema.default.clone()
}
