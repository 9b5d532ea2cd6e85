use thiserror::Error;

use super::report::Violation;

/// Malformed schema; raised while compiling, never attributed to the data.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema document does not fit the schema model.
    #[error("invalid schema document: {source}")]
    Document {
        #[source]
        source: serde_json::Error,
    },

    /// `type` names a tag outside the supported set.
    #[error("unknown type tag `{name}`")]
    UnknownType { name: String },

    /// `format` names an unsupported semantic format.
    #[error("unknown format `{name}`")]
    UnknownFormat { name: String },

    /// `pattern` or a `patternProperties` key is not a valid regex.
    #[error("invalid regular expression `{pattern}` at `{location}`: {source}")]
    Pattern {
        location: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Keyword value is out of its domain (negative bound, zero divisor...).
    #[error("invalid `{keyword}` at `{location}`: {reason}")]
    Keyword {
        keyword: &'static str,
        location: String,
        reason: String,
    },
}

/// Errors that replace a verdict.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// Schema references a filter name missing from the registry.
    #[error("unknown filter `{name}`")]
    UnknownFilter { name: String },

    /// `failOnFirstError` stopped evaluation at the first violation.
    #[error("validation aborted: {0}")]
    Aborted(Box<Violation>),
}

impl ValidateError {
    /// The violation carried by an abort, if this is one.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Aborted(violation) => Some(violation),
            Self::UnknownFilter { .. } => None,
        }
    }
}
