//! Table registry and row-type dispatch.
//!
//! Tables are described by [`TableCreateSetup`] and registered once through
//! [`TableRegistry::builder`]. Row types implement [`TableBinding`]; the
//! [`SchemaProvider`] methods then turn rows into [`InsertPayload`]s and
//! equality where-clauses without knowing the concrete row type.
//!
//! ```
//! use pgcond::column::ColumnDefinition;
//! use pgcond::error::QueryResult;
//! use pgcond::schema::{RowWriter, SchemaProvider, TableBinding, TableCreateSetup, TableRegistry};
//! use pgcond::types::{ColumnId, ColumnType, TableId};
//!
//! struct Tag {
//!     id: i32,
//!     label: String,
//! }
//!
//! impl TableBinding for Tag {
//!     fn table_id() -> TableId {
//!         TableId(1)
//!     }
//!
//!     fn populate_insert_row(&self, row: &mut RowWriter<'_>) -> QueryResult<()> {
//!         row.set(ColumnId(1), &self.id)?;
//!         row.set(ColumnId(2), &self.label)
//!     }
//! }
//!
//! let registry = TableRegistry::builder()
//!     .table(TableCreateSetup::new(TableId(1), "tags").with_columns([
//!         ColumnDefinition::new(ColumnId(1), "id", ColumnType::Int).primary_key(),
//!         ColumnDefinition::new(ColumnId(2), "label", ColumnType::Text),
//!     ]))
//!     .build()
//!     .unwrap();
//!
//! let tag = Tag { id: 3, label: "rare".into() };
//! let clause = registry.build_where_tree_from_row(&tag).unwrap().unwrap();
//! assert_eq!(clause.to_sql_string(), "id = 3 AND label = 'rare'");
//! ```

mod binding;
mod config;
mod payload;
mod registry;
mod setup;
pub mod statement;

pub use binding::{TableBinding, has_duplicate_keys};
pub use config::SchemaConfig;
pub use payload::{FieldValue, InsertPayload, InsertRow, RowWriter};
pub use registry::{RegistryBuilder, SchemaProvider, TableRegistry};
pub use setup::TableCreateSetup;
