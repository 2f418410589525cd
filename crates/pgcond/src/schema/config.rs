use super::setup::TableCreateSetup;
use crate::error::QueryResult;
use serde::{Deserialize, Serialize};

/// Declarative schema: every table with its columns and references.
///
/// ```json
/// { "tables": [ { "id": 1, "name": "authors", "columns": [
///     { "id": 1, "name": "id", "type": "autoincrement",
///       "flags": { "is_primary_key": true, "can_be_null": false } } ] } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub tables: Vec<TableCreateSetup>,
}

impl SchemaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: TableCreateSetup) -> Self {
        self.tables.push(table);
        self
    }

    pub fn from_json(json: &str) -> QueryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> QueryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
