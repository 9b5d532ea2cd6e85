use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::domain::error::ValidateError;
use crate::domain::schema::{FilterSpec, Schema};
use crate::domain::types::json_type_name;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<.*?>").expect("static tag pattern"));

/// Failure raised by a filter invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct FilterError {
    message: String,
}

impl FilterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Value transform applied before a node is checked.
pub trait Filter: Send + Sync {
    /// Whether the filter can process `value`; text filters take strings only.
    fn accepts(&self, value: &Value) -> bool {
        value.is_string()
    }

    fn apply(&self, value: Value) -> Result<Value, FilterError>;
}

impl<F> Filter for F
where
    F: Fn(&str) -> Result<String, FilterError> + Send + Sync,
{
    fn apply(&self, value: Value) -> Result<Value, FilterError> {
        match value {
            Value::String(text) => self(&text).map(Value::String),
            other => Err(FilterError::new(format!(
                "expected string input, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

/// Wraps an infallible string transform as a [`Filter`].
pub fn text_filter<F>(transform: F) -> impl Filter
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    move |text: &str| -> Result<String, FilterError> { Ok(transform(text)) }
}

/// Named filters a schema may reference through `filter`.
#[derive(Clone)]
pub struct FilterRegistry {
    filters: BTreeMap<String, Arc<dyn Filter>>,
}

impl FilterRegistry {
    /// Registry without any filter.
    pub fn empty() -> Self {
        Self {
            filters: BTreeMap::new(),
        }
    }

    /// Registry preloaded with `trim`, `lowercase`, `uppercase` and `stripTags`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("trim", text_filter(|text| text.trim().to_string()));
        registry.register("lowercase", text_filter(str::to_lowercase));
        registry.register("uppercase", text_filter(str::to_uppercase));
        registry.register(
            "stripTags",
            text_filter(|text| TAG_PATTERN.replace_all(text, "").into_owned()),
        );
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, filter: impl Filter + 'static) {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Filter>> {
        self.filters.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    /// Resolves every named filter of `schema` and its subschemas, so an
    /// unknown name fails whether or not the document reaches that node.
    pub fn ensure_known(&self, schema: &Schema) -> Result<(), ValidateError> {
        for spec in &schema.filters {
            self.resolve(spec)?;
        }
        schema
            .children()
            .try_for_each(|child| self.ensure_known(child))
    }

    fn resolve(&self, spec: &FilterSpec) -> Result<Arc<dyn Filter>, ValidateError> {
        match spec {
            FilterSpec::Named(name) => self.get(name).ok_or_else(|| ValidateError::UnknownFilter {
                name: name.clone(),
            }),
            FilterSpec::Inline(filter) => Ok(Arc::clone(filter)),
        }
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.filters.keys()).finish()
    }
}

/// Why a filter chain stopped early.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterFailure {
    /// The value's runtime type is not accepted by the filter.
    Unfilterable { actual: &'static str },
    /// The filter itself failed.
    Failed { error: FilterError },
}

impl FilterFailure {
    pub fn message(&self) -> String {
        match self {
            Self::Unfilterable { actual } => format!("bad property type for filtering: {actual}"),
            Self::Failed { error } => format!("filter failed: {error}"),
        }
    }

    pub fn actual(&self) -> &str {
        match self {
            Self::Unfilterable { actual } => actual,
            Self::Failed { .. } => "error",
        }
    }
}

/// Runs `chain` left to right over `value` in place.
///
/// On failure `value` holds the result of the last filter that succeeded.
/// Unknown filter names are configuration faults and surface as `Err`.
pub fn apply_filters(
    registry: &FilterRegistry,
    chain: &[FilterSpec],
    value: &mut Value,
) -> Result<Option<FilterFailure>, ValidateError> {
    for spec in chain {
        let filter = registry.resolve(spec)?;
        if !filter.accepts(value) {
            return Ok(Some(FilterFailure::Unfilterable {
                actual: json_type_name(value),
            }));
        }
        let input = std::mem::take(value);
        match filter.apply(input.clone()) {
            Ok(output) => *value = output,
            Err(error) => {
                *value = input;
                return Ok(Some(FilterFailure::Failed { error }));
            }
        }
    }
    Ok(None)
}
