use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::SchemaError;

/// Runtime type tag accepted by the `type` keyword.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
    Any,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
            Self::Any => "any",
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => is_whole_number(value),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Null => value.is_null(),
            Self::Any => true,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "integer" => Ok(Self::Integer),
            "boolean" => Ok(Self::Boolean),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            "null" => Ok(Self::Null),
            "any" => Ok(Self::Any),
            other => Err(SchemaError::UnknownType {
                name: other.to_string(),
            }),
        }
    }
}

/// Ordered union of type tags; a value conforms when any tag matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSet {
    tags: Vec<TypeTag>,
}

impl TypeSet {
    pub fn new(tags: Vec<TypeTag>) -> Self {
        Self { tags }
    }

    pub fn single(tag: TypeTag) -> Self {
        Self { tags: vec![tag] }
    }

    pub fn tags(&self) -> &[TypeTag] {
        &self.tags
    }

    pub fn matches(&self, value: &Value) -> bool {
        self.tags.is_empty() || self.tags.iter().any(|tag| tag.matches(value))
    }

    pub fn contains(&self, tag: TypeTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Expected value reported by a `type` violation.
    pub fn expected(&self) -> Value {
        match self.tags.as_slice() {
            [single] => Value::String(single.as_str().to_string()),
            many => Value::Array(
                many.iter()
                    .map(|tag| Value::String(tag.as_str().to_string()))
                    .collect(),
            ),
        }
    }
}

/// Name of the runtime shape of `value`, as reported in `actual` fields.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_whole_number(value: &Value) -> bool {
    match value {
        Value::Number(number) => {
            number.is_i64()
                || number.is_u64()
                || number
                    .as_f64()
                    .is_some_and(|float| float.is_finite() && float.fract() == 0.0)
        }
        _ => false,
    }
}
