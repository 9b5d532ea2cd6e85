use std::collections::BTreeMap;

use serde_json::Value;

use super::error::SchemaError;
use super::schema::Schema;

/// Named store of compiled schemas. The engine only ever sees the resolved
/// [`Schema`]; identifiers stay on this side.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `schema` under `id`, returning the schema it replaced.
    pub fn add(&mut self, id: impl Into<String>, schema: Schema) -> Option<Schema> {
        self.schemas.insert(id.into(), schema)
    }

    /// Compiles a schema document and registers it under `id`.
    pub fn add_document(
        &mut self,
        id: impl Into<String>,
        document: &Value,
    ) -> Result<(), SchemaError> {
        let schema = Schema::from_value(document)?;
        self.schemas.insert(id.into(), schema);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Schema> {
        self.schemas.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
