//! # pgcond
//!
//! Typed query construction for PostgreSQL tables.
//!
//! ## Features
//!
//! - **Value codec**: render Rust values as column text, pack arrays with length prefixes
//! - **Schema model**: column and reference definitions that check themselves
//! - **Condition trees**: typed WHERE constructors over a shared, immutable binary tree
//! - **Registry dispatch**: bind row types to tables and build insert payloads generically
//! - **Statement text**: INSERT / SELECT / DELETE over payloads and conditions
//!
//! ## Where clauses
//!
//! ```
//! use pgcond::expr::{LeafValue, WhereClause};
//! use pgcond::types::ColumnType;
//!
//! let clause = WhereClause::between("year", LeafValue::of(ColumnType::Int, &1300), LeafValue::of(ColumnType::Int, &1400))
//!     .and(WhereClause::not_in("lang", ColumnType::Text, ["la", "gr"]));
//! assert_eq!(
//!     clause.to_sql_string(),
//!     "year BETWEEN 1300 AND 1400 AND lang NOT IN ('la', 'gr')"
//! );
//! ```
//!
//! ## Logging
//!
//! Events are emitted through `tracing` under the `pgcond` target. The crate
//! never installs a subscriber.

pub mod codec;
pub mod column;
pub mod error;
pub mod executor;
pub mod expr;
pub mod schema;
pub mod types;

pub use codec::{ColumnValue, array_to_string, decode_array, string_to_array};
pub use column::{ColumnDefinition, ForeignKeyAction, ReferenceDefinition};
pub use error::{ColumnCheckError, QueryError, QueryResult, ReferenceCheckError};
pub use executor::QueryExecutor;
pub use expr::{
    BinaryOp, ConditionOp, ExprNode, LeafValue, LogicalOp, Operator, WhereClause,
    default_field_to_str,
};
pub use schema::{
    InsertPayload, RowWriter, SchemaConfig, SchemaProvider, TableBinding, TableCreateSetup,
    TableRegistry,
};
pub use types::{ColumnFlags, ColumnId, ColumnType, TableId};
