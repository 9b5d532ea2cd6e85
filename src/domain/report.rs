use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Single failed constraint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Violation {
    pub attribute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    pub expected: Value,
    pub actual: Value,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attribute `{}`", self.attribute)?;
        if let Some(property) = &self.property {
            write!(f, " of property `{property}`")?;
        }
        write!(
            f,
            " failed: expected `{}`, actual `{}`: {}",
            display_value(&self.expected),
            display_value(&self.actual),
            self.message
        )
    }
}

/// Outcome of one validation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    pub valid: bool,
    pub errors: Vec<Violation>,
}

impl Verdict {
    pub fn from_errors(errors: Vec<Violation>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Violations raised by one rule, in report order.
    pub fn errors_for<'a>(&'a self, attribute: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.errors
            .iter()
            .filter(move |violation| violation.attribute == attribute)
    }
}

/// Substitutes `%{expected}` and `%{actual}` in a message template.
pub fn render_message(template: &str, expected: &Value, actual: &Value) -> String {
    template
        .replace("%{expected}", &display_value(expected))
        .replace("%{actual}", &display_value(actual))
}

/// Human form of a rule operand: bare strings, comma-joined lists.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
