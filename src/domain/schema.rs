use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use super::error::SchemaError;
use super::types::{TypeSet, TypeTag};
use crate::engine::filter::Filter;
use crate::engine::format::SemanticFormat;

/// `conform` predicate: `(value, enclosing value)`.
pub type Conform = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// `conditions.optional` predicate over the enclosing object.
pub type Condition = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// One entry of a `filter` chain.
#[derive(Clone)]
pub enum FilterSpec {
    Named(String),
    Inline(Arc<dyn Filter>),
}

impl fmt::Debug for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Inline(_) => f.write_str("Inline(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Dependencies {
    /// Sibling properties that must be present alongside the owner.
    Names(Vec<String>),
    /// Schema the enclosing object must satisfy when the owner is present.
    Schema(Box<Schema>),
}

#[derive(Debug, Clone)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<Schema>),
}

#[derive(Debug, Clone)]
pub struct PatternProperty {
    pub pattern: Regex,
    pub schema: Schema,
}

/// Compiled schema node.
#[derive(Clone, Default)]
pub struct Schema {
    pub name: Option<String>,
    pub types: Option<TypeSet>,
    pub properties: Option<IndexMap<String, Schema>>,
    pub pattern_properties: Vec<PatternProperty>,
    pub additional_properties: Option<AdditionalProperties>,
    pub items: Option<Box<Schema>>,
    pub required: bool,
    pub default: Option<Value>,
    pub dependencies: Option<Dependencies>,
    pub optional_when: Option<Condition>,
    pub conform: Option<Conform>,
    pub filters: Vec<FilterSpec>,
    pub pattern: Option<Regex>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub allow_empty: Option<bool>,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub exclusive_minimum: Option<Number>,
    pub exclusive_maximum: Option<Number>,
    pub divisible_by: Option<Number>,
    pub enumeration: Option<Vec<Value>>,
    pub unique_items: bool,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub format: Option<SemanticFormat>,
    pub messages: BTreeMap<String, String>,
    /// Keywords the schema model does not know; read by custom rules.
    pub extra: Map<String, Value>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and compiles a schema from an in-memory JSON value.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let document: SchemaDocument = serde_json::from_value(value.clone())
            .map_err(|source| SchemaError::Document { source })?;
        Self::compile(document)
    }

    pub fn compile(document: SchemaDocument) -> Result<Self, SchemaError> {
        compile_node(document, "#")
    }

    pub fn with_type(mut self, tag: TypeTag) -> Self {
        self.types = Some(TypeSet::single(tag));
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), schema);
        self
    }

    pub fn with_conform<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.conform = Some(Arc::new(predicate));
        self
    }

    pub fn with_optional_when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.optional_when = Some(Arc::new(condition));
        self
    }

    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(FilterSpec::Inline(Arc::new(filter)));
        self
    }

    pub fn with_named_filter(mut self, name: impl Into<String>) -> Self {
        self.filters.push(FilterSpec::Named(name.into()));
        self
    }

    /// Declared property schema, for attaching predicates after parsing.
    pub fn property_mut(&mut self, name: &str) -> Option<&mut Schema> {
        self.properties.as_mut()?.get_mut(name)
    }

    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.as_ref()?.get(name)
    }

    /// Raw value of a keyword kept in [`Schema::extra`].
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    pub fn has_object_rules(&self) -> bool {
        self.properties.is_some()
            || !self.pattern_properties.is_empty()
            || self.additional_properties.is_some()
    }

    pub fn custom_message(&self, attribute: &str) -> Option<&str> {
        self.messages.get(attribute).map(String::as_str)
    }

    /// Direct subschemas: properties, pattern and additional properties,
    /// items and a dependency schema.
    pub fn children(&self) -> impl Iterator<Item = &Schema> {
        let additional = match &self.additional_properties {
            Some(AdditionalProperties::Schema(schema)) => Some(schema.as_ref()),
            _ => None,
        };
        let dependency = match &self.dependencies {
            Some(Dependencies::Schema(schema)) => Some(schema.as_ref()),
            _ => None,
        };
        self.properties
            .iter()
            .flat_map(|properties| properties.values())
            .chain(self.pattern_properties.iter().map(|entry| &entry.schema))
            .chain(additional)
            .chain(self.items.as_deref())
            .chain(dependency)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("types", &self.types)
            .field("properties", &self.properties)
            .field("pattern_properties", &self.pattern_properties)
            .field("additional_properties", &self.additional_properties)
            .field("items", &self.items)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("dependencies", &self.dependencies)
            .field("optional_when", &self.optional_when.is_some())
            .field("conform", &self.conform.is_some())
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

/// Declarative schema model, as read from JSON, YAML or TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaDocument {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_tags: Option<OneOrMany>,
    pub properties: Option<IndexMap<String, SchemaDocument>>,
    pub pattern_properties: Option<IndexMap<String, SchemaDocument>>,
    pub additional_properties: Option<AdditionalDocument>,
    pub items: Option<Box<SchemaDocument>>,
    pub required: Option<RequiredDocument>,
    #[serde(deserialize_with = "present")]
    pub default: Option<Value>,
    pub dependencies: Option<DependenciesDocument>,
    pub filter: Option<OneOrMany>,
    pub pattern: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub allow_empty: Option<bool>,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub exclusive_minimum: Option<Number>,
    pub exclusive_maximum: Option<Number>,
    pub divisible_by: Option<Number>,
    #[serde(rename = "enum")]
    pub enumeration: Option<Vec<Value>>,
    pub unique_items: bool,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub format: Option<String>,
    pub messages: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(single) => vec![single],
            Self::Many(many) => many,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AdditionalDocument {
    Allowed(bool),
    Schema(Box<SchemaDocument>),
}

/// `required` as a per-property flag or as an object-level list of names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RequiredDocument {
    Flag(bool),
    Names(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DependenciesDocument {
    Name(String),
    Names(Vec<String>),
    Schema(Box<SchemaDocument>),
}

// Keeps an explicit `null` default distinct from an absent one.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn compile_node(document: SchemaDocument, location: &str) -> Result<Schema, SchemaError> {
    let types = document
        .type_tags
        .map(|tags| {
            tags.into_vec()
                .iter()
                .map(|tag| tag.parse::<TypeTag>())
                .collect::<Result<Vec<_>, _>>()
                .map(TypeSet::new)
        })
        .transpose()?;

    let (required, required_names) = match document.required {
        Some(RequiredDocument::Flag(flag)) => (flag, Vec::new()),
        Some(RequiredDocument::Names(names)) => (false, names),
        None => (false, Vec::new()),
    };

    let mut properties = document
        .properties
        .map(|properties| {
            properties
                .into_iter()
                .map(|(name, child)| {
                    let child_location = format!("{location}/properties/{name}");
                    compile_node(child, &child_location).map(|schema| (name, schema))
                })
                .collect::<Result<IndexMap<_, _>, _>>()
        })
        .transpose()?;
    for name in required_names {
        let declared = properties.get_or_insert_with(IndexMap::new);
        declared.entry(name).or_default().required = true;
    }

    let pattern_properties = document
        .pattern_properties
        .unwrap_or_default()
        .into_iter()
        .map(|(source, child)| {
            let child_location = format!("{location}/patternProperties/{source}");
            let pattern = compile_regex(&source, &child_location)?;
            let schema = compile_node(child, &child_location)?;
            Ok(PatternProperty { pattern, schema })
        })
        .collect::<Result<Vec<_>, SchemaError>>()?;

    let additional_properties = document
        .additional_properties
        .map(|additional| match additional {
            AdditionalDocument::Allowed(allowed) => Ok(AdditionalProperties::Allowed(allowed)),
            AdditionalDocument::Schema(child) => {
                compile_node(*child, &format!("{location}/additionalProperties"))
                    .map(|schema| AdditionalProperties::Schema(Box::new(schema)))
            }
        })
        .transpose()?;

    let items = document
        .items
        .map(|child| compile_node(*child, &format!("{location}/items")).map(Box::new))
        .transpose()?;

    let dependencies = document
        .dependencies
        .map(|dependencies| match dependencies {
            DependenciesDocument::Name(name) => Ok(Dependencies::Names(vec![name])),
            DependenciesDocument::Names(names) => Ok(Dependencies::Names(names)),
            DependenciesDocument::Schema(child) => {
                compile_node(*child, &format!("{location}/dependencies"))
                    .map(|schema| Dependencies::Schema(Box::new(schema)))
            }
        })
        .transpose()?;

    let pattern = document
        .pattern
        .map(|source| compile_regex(&source, location))
        .transpose()?;

    let format = document
        .format
        .map(|name| name.parse::<SemanticFormat>())
        .transpose()?;

    if let Some(divisor) = &document.divisible_by {
        if divisor.as_f64().is_none_or(|value| value <= 0.0) {
            return Err(SchemaError::Keyword {
                keyword: "divisibleBy",
                location: location.to_string(),
                reason: format!("divisor must be positive, got {divisor}"),
            });
        }
    }
    check_bounds("minLength", document.min_length, document.max_length, location)?;
    check_bounds("minItems", document.min_items, document.max_items, location)?;

    Ok(Schema {
        name: document.name,
        types,
        properties,
        pattern_properties,
        additional_properties,
        items,
        required,
        default: document.default,
        dependencies,
        optional_when: None,
        conform: None,
        filters: document
            .filter
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(FilterSpec::Named)
            .collect(),
        pattern,
        min_length: document.min_length,
        max_length: document.max_length,
        allow_empty: document.allow_empty,
        minimum: document.minimum,
        maximum: document.maximum,
        exclusive_minimum: document.exclusive_minimum,
        exclusive_maximum: document.exclusive_maximum,
        divisible_by: document.divisible_by,
        enumeration: document.enumeration,
        unique_items: document.unique_items,
        min_items: document.min_items,
        max_items: document.max_items,
        format,
        messages: document.messages,
        extra: document.extra,
    })
}

fn compile_regex(source: &str, location: &str) -> Result<Regex, SchemaError> {
    Regex::new(source).map_err(|source_error| SchemaError::Pattern {
        location: location.to_string(),
        pattern: source.to_string(),
        source: source_error,
    })
}

fn check_bounds(
    keyword: &'static str,
    min: Option<usize>,
    max: Option<usize>,
    location: &str,
) -> Result<(), SchemaError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(SchemaError::Keyword {
            keyword,
            location: location.to_string(),
            reason: format!("minimum {min} exceeds maximum {max}"),
        }),
        _ => Ok(()),
    }
}
