use super::payload::RowWriter;
use crate::error::QueryResult;
use crate::types::TableId;
use std::collections::HashSet;
use std::hash::Hash;

/// Binds a row type to a registered table.
///
/// Implemented once per row type. The schema provider dispatches on it to
/// resolve the table and to turn rows into insert payloads.
///
/// ```ignore
/// impl TableBinding for Book {
///     fn table_id() -> TableId {
///         BOOKS
///     }
///
///     fn populate_insert_row(&self, row: &mut RowWriter<'_>) -> QueryResult<()> {
///         row.set(BOOK_ID, &self.id)?;
///         row.set(BOOK_TITLE, &self.title)
///     }
///
///     fn has_conflict(rows: &[Self]) -> bool {
///         has_duplicate_keys(rows, |b| b.id)
///     }
/// }
/// ```
pub trait TableBinding: Sized {
    /// The table rows of this type belong to; unmapped types keep the undefined id.
    fn table_id() -> TableId {
        TableId::UNDEFINED
    }

    /// Write the populated fields of this row.
    fn populate_insert_row(&self, row: &mut RowWriter<'_>) -> QueryResult<()>;

    /// Whether `rows` must not be inserted together.
    fn has_conflict(_rows: &[Self]) -> bool {
        false
    }
}

/// True when two rows share the same key.
pub fn has_duplicate_keys<R, K, F>(rows: &[R], mut key: F) -> bool
where
    K: Eq + Hash,
    F: FnMut(&R) -> K,
{
    let mut seen = HashSet::with_capacity(rows.len());
    rows.iter().any(|r| !seen.insert(key(r)))
}
