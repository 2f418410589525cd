//! Insert payloads: rows of column/value pairs ready for an INSERT.

use super::binding::TableBinding;
use crate::codec::{ColumnValue, array_value};
use crate::column::ColumnDefinition;
use crate::error::{QueryError, QueryResult};
use crate::expr::{LeafValue, WhereClause};
use crate::types::{ColumnId, ColumnType, TableId};

/// One populated column of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub column_id: ColumnId,
    pub name: String,
    pub value: LeafValue,
}

/// Populated fields of one row, in the table's column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertRow {
    fields: Vec<FieldValue>,
}

impl InsertRow {
    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }

    pub fn get(&self, column_id: ColumnId) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.column_id == column_id)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `c1 = v1 AND c2 = v2 ...` over the populated fields; NULL fields
    /// match with `IS NULL`.
    pub fn to_where_clause(&self) -> Option<WhereClause> {
        WhereClause::all(self.fields.iter().map(|f| {
            if f.value.is_null() {
                WhereClause::is_null(f.name.as_str())
            } else {
                WhereClause::eq(f.name.as_str(), f.value.clone())
            }
        }))
    }
}

/// Collects the fields a row type writes through [`TableBinding::populate_insert_row`].
pub struct RowWriter<'a> {
    table: TableId,
    columns: &'a [ColumnDefinition],
    fields: Vec<FieldValue>,
}

impl<'a> RowWriter<'a> {
    pub fn new(table: TableId, columns: &'a [ColumnDefinition]) -> Self {
        Self {
            table,
            columns,
            fields: Vec::new(),
        }
    }

    /// Set a scalar column. Setting a column twice keeps the last value.
    ///
    /// A missing value (`None`) is stored as SQL `NULL`.
    pub fn set<V: ColumnValue + ?Sized>(&mut self, column: ColumnId, value: &V) -> QueryResult<()> {
        let def = self.column(column)?;
        let value = LeafValue::of(def.column_type, value);
        self.push(column, value);
        Ok(())
    }

    /// Set a column only when `value` is present.
    pub fn set_opt<V: ColumnValue + ?Sized>(
        &mut self,
        column: ColumnId,
        value: Option<&V>,
    ) -> QueryResult<()> {
        match value {
            Some(v) => self.set(column, v),
            None => Ok(()),
        }
    }

    /// Set an array column from its elements, packed with length prefixes.
    ///
    /// The packed form is text whatever the element type.
    pub fn set_array<T: ColumnValue>(&mut self, column: ColumnId, values: &[T]) -> QueryResult<()> {
        let def = self.column(column)?;
        if !def.flags.is_array {
            return Err(QueryError::validation(format!(
                "column '{}' is not an array",
                def.name
            )));
        }
        if values.len() > def.len as usize {
            return Err(QueryError::validation(format!(
                "column '{}' holds at most {} elements, got {}",
                def.name,
                def.len,
                values.len()
            )));
        }
        let value = LeafValue::new(ColumnType::Text, array_value(def.column_type, values));
        self.push(column, value);
        Ok(())
    }

    fn column(&self, column: ColumnId) -> QueryResult<&'a ColumnDefinition> {
        self.columns
            .iter()
            .find(|c| c.id == column)
            .ok_or_else(|| QueryError::ColumnNotFound {
                table: self.table.to_string(),
                column: column.0,
            })
    }

    fn push(&mut self, column: ColumnId, value: LeafValue) {
        if let Some(existing) = self.fields.iter_mut().find(|f| f.column_id == column) {
            existing.value = value;
            return;
        }
        let name = self
            .columns
            .iter()
            .find(|c| c.id == column)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        self.fields.push(FieldValue {
            column_id: column,
            name,
            value,
        });
    }

    fn finish(mut self) -> InsertRow {
        let columns = self.columns;
        self.fields
            .sort_by_key(|f| columns.iter().position(|c| c.id == f.column_id));
        InsertRow {
            fields: self.fields,
        }
    }
}

/// Rows destined for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPayload {
    table: TableId,
    columns: Vec<ColumnDefinition>,
    rows: Vec<InsertRow>,
}

impl InsertPayload {
    pub fn new(table: TableId, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            table,
            columns,
            rows: Vec::new(),
        }
    }

    /// Append one row through the type's populate hook.
    pub fn add_row<R: TableBinding>(&mut self, row: &R) -> QueryResult<()> {
        let mut writer = RowWriter::new(self.table, &self.columns);
        row.populate_insert_row(&mut writer)?;
        let row = writer.finish();
        self.rows.push(row);
        Ok(())
    }

    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn rows(&self) -> &[InsertRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Columns populated by at least one row, in declared order.
    pub fn populated_columns(&self) -> Vec<&ColumnDefinition> {
        self.columns
            .iter()
            .filter(|c| self.rows.iter().any(|r| r.get(c.id).is_some()))
            .collect()
    }

    /// Equality match over the populated fields.
    ///
    /// A single row yields `c1 = v1 AND c2 = v2 ...`; several rows are
    /// OR-joined. `None` when no row has a populated field.
    pub fn to_where_clause(&self) -> Option<WhereClause> {
        WhereClause::any(self.rows.iter().filter_map(InsertRow::to_where_clause))
    }
}
