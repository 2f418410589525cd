//! Statement text over payloads and where-clauses.
//!
//! Values are inlined through the injected formatter; nothing here talks to
//! a database.

use super::payload::InsertPayload;
use super::registry::SchemaProvider;
use crate::error::{QueryError, QueryResult};
use crate::expr::WhereClause;
use crate::types::ColumnType;

/// `INSERT INTO t (c1, c2) VALUES (..), (..)`
///
/// The column list is the union of columns populated by any row, in
/// declared order; a row missing one of them gets `DEFAULT`.
pub fn insert_sql<F>(table_name: &str, payload: &InsertPayload, field_to_str: F) -> QueryResult<String>
where
    F: Fn(ColumnType, &str) -> String,
{
    if payload.is_empty() {
        return Err(QueryError::validation(format!(
            "insert into '{table_name}' has no rows"
        )));
    }

    let columns = payload.populated_columns();
    if columns.is_empty() {
        if payload.len() == 1 {
            return Ok(format!("INSERT INTO {table_name} DEFAULT VALUES"));
        }
        return Err(QueryError::validation(format!(
            "insert into '{table_name}' has rows without any populated column"
        )));
    }

    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    let rows: Vec<String> = payload
        .rows()
        .iter()
        .map(|row| {
            let values: Vec<String> = columns
                .iter()
                .map(|c| match row.get(c.id) {
                    Some(field) => field.value.render(&field_to_str),
                    None => "DEFAULT".to_string(),
                })
                .collect();
            format!("({})", values.join(", "))
        })
        .collect();

    Ok(format!(
        "INSERT INTO {table_name} ({}) VALUES {}",
        names.join(", "),
        rows.join(", ")
    ))
}

/// [`insert_sql`] with the table name looked up in `schema`.
pub fn insert_statement<P, F>(schema: &P, payload: &InsertPayload, field_to_str: F) -> QueryResult<String>
where
    P: SchemaProvider,
    F: Fn(ColumnType, &str) -> String,
{
    let table_name = schema
        .table_name(payload.table())
        .ok_or_else(|| QueryError::TableNotFound(payload.table().to_string()))?;
    insert_sql(table_name, payload, field_to_str)
}

/// `SELECT c1, c2 FROM t [WHERE ..]`; no columns selects `*`.
pub fn select_sql<F>(
    table_name: &str,
    columns: &[&str],
    where_clause: Option<&WhereClause>,
    field_to_str: F,
) -> String
where
    F: Fn(ColumnType, &str) -> String,
{
    let projection = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.join(", ")
    };
    let mut sql = format!("SELECT {projection} FROM {table_name}");
    if let Some(clause) = where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(&clause.to_sql_string_with(field_to_str));
    }
    sql
}

/// `DELETE FROM t WHERE ..`
///
/// Without a where-clause the statement is `WHERE 1=0` and deletes nothing.
pub fn delete_sql<F>(table_name: &str, where_clause: Option<&WhereClause>, field_to_str: F) -> String
where
    F: Fn(ColumnType, &str) -> String,
{
    match where_clause {
        Some(clause) => format!(
            "DELETE FROM {table_name} WHERE {}",
            clause.to_sql_string_with(field_to_str)
        ),
        None => format!("DELETE FROM {table_name} WHERE 1=0"),
    }
}
