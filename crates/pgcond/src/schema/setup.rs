//! Table creation descriptor.

use crate::column::{ColumnDefinition, ReferenceDefinition};
use crate::error::{QueryError, QueryResult, ReferenceCheckError};
use crate::types::{ColumnId, TableId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything needed to create a table: identity, ordered columns, primary
/// key and references.
///
/// Column order is the order used when building insert payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCreateSetup {
    pub id: TableId,
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    /// Composite primary key; when empty, columns flagged `is_primary_key` are used.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_key: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceDefinition>,
    /// Explicit id column; defaults to the first primary key column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_column: Option<String>,
}

impl TableCreateSetup {
    pub fn new(id: TableId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            references: Vec::new(),
            id_column: None,
        }
    }

    pub fn with_columns(mut self, columns: impl IntoIterator<Item = ColumnDefinition>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn with_references(
        mut self,
        references: impl IntoIterator<Item = ReferenceDefinition>,
    ) -> Self {
        self.references.extend(references);
        self
    }

    pub fn with_primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = Some(column.into());
        self
    }

    pub fn column(&self, id: ColumnId) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key_columns(&self) -> Vec<&str> {
        if !self.primary_key.is_empty() {
            return self.primary_key.iter().map(String::as_str).collect();
        }
        self.columns
            .iter()
            .filter(|c| c.flags.is_primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn id_column_name(&self) -> Option<&str> {
        self.id_column
            .as_deref()
            .or_else(|| self.primary_key_columns().first().copied())
    }

    /// Check the table and every column and reference it holds.
    pub fn self_check(&self) -> QueryResult<()> {
        if self.id.is_undefined() {
            return Err(QueryError::validation(format!(
                "table '{}' has an undefined id",
                self.name
            )));
        }
        if self.name.is_empty() {
            return Err(QueryError::validation(format!("table {} has an empty name", self.id)));
        }

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for column in &self.columns {
            column.self_check()?;
            if !ids.insert(column.id) {
                return Err(QueryError::validation(format!(
                    "duplicate column id {} in table '{}'",
                    column.id, self.name
                )));
            }
            if !names.insert(column.name.as_str()) {
                return Err(QueryError::validation(format!(
                    "duplicate column '{}' in table '{}'",
                    column.name, self.name
                )));
            }
        }

        for pk in &self.primary_key {
            if !names.contains(pk.as_str()) {
                return Err(QueryError::validation(format!(
                    "primary key column '{pk}' is not a column of table '{}'",
                    self.name
                )));
            }
        }
        if let Some(id_column) = &self.id_column
            && !names.contains(id_column.as_str())
        {
            return Err(QueryError::validation(format!(
                "id column '{id_column}' is not a column of table '{}'",
                self.name
            )));
        }

        for reference in &self.references {
            reference.self_check()?;
            if !names.contains(reference.column.as_str()) {
                return Err(ReferenceCheckError::UnknownColumn {
                    column: reference.column.clone(),
                    table: self.name.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// `CREATE TABLE IF NOT EXISTS` text for this table.
    ///
    /// `resolve_table` maps reference targets to table names.
    pub fn create_table_sql<F>(&self, resolve_table: F) -> QueryResult<String>
    where
        F: Fn(TableId) -> Option<String>,
    {
        let mut parts: Vec<String> = self.columns.iter().filter_map(|c| c.to_sql()).collect();

        let pk = self.primary_key_columns();
        if !pk.is_empty() {
            parts.push(format!("PRIMARY KEY ({})", pk.join(", ")));
        }
        for reference in self.references.iter().filter(|r| r.is_foreign_key) {
            let target = resolve_table(reference.target_table)
                .ok_or_else(|| QueryError::TableNotFound(reference.target_table.to_string()))?;
            parts.extend(reference.to_sql(&target));
        }

        Ok(format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name,
            parts.join(", ")
        ))
    }
}
