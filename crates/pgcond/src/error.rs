//! Error types for pgcond

use thiserror::Error;

/// Result type alias for pgcond operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Inconsistent column definition, reported by [`ColumnDefinition::self_check`].
///
/// [`ColumnDefinition::self_check`]: crate::column::ColumnDefinition::self_check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnCheckError {
    #[error("column '{0}' has an undefined id")]
    UndefinedId(String),

    #[error("column with id {0} has an empty name")]
    EmptyName(u32),

    #[error("column '{0}' has no type")]
    EmptyType(String),

    #[error("column '{0}' has zero length")]
    ZeroLength(String),

    #[error("primary key column '{0}' cannot be nullable")]
    NullablePrimaryKey(String),

    #[error("array column '{column}' needs len > 1, got {len}")]
    ArrayWithoutLength { column: String, len: u32 },

    #[error("scalar column '{column}' of type {column_type} cannot have len {len}")]
    LengthWithoutArray {
        column: String,
        column_type: String,
        len: u32,
    },

    #[error("column '{column}' of non-numeric type {column_type} cannot be negative")]
    NegativeNonNumeric { column: String, column_type: String },

    #[error("column '{0}' is flagged has_default but has no default value")]
    MissingDefault(String),

    #[error("blob column '{0}' cannot be a reference")]
    BlobReference(String),
}

/// Inconsistent reference definition, reported by [`ReferenceDefinition::self_check`].
///
/// [`ReferenceDefinition::self_check`]: crate::column::ReferenceDefinition::self_check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceCheckError {
    #[error("reference has an empty owning column name")]
    EmptyColumn,

    #[error("reference on '{0}' has on_delete set but no delete action")]
    MissingDeleteAction(String),

    #[error("reference on '{0}' has on_update set but no update action")]
    MissingUpdateAction(String),

    #[error("foreign key on '{0}' has an undefined target table")]
    UndefinedTargetTable(String),

    #[error("foreign key on '{0}' has an empty target column")]
    EmptyTargetColumn(String),

    #[error("reference owning column '{column}' is not a column of table '{table}'")]
    UnknownColumn { column: String, table: String },
}

/// Error types for query construction
#[derive(Debug, Error)]
pub enum QueryError {
    /// Column definition failed its self-check
    #[error("Column check error: {0}")]
    ColumnCheck(#[from] ColumnCheckError),

    /// Reference definition failed its self-check
    #[error("Reference check error: {0}")]
    ReferenceCheck(#[from] ReferenceCheckError),

    /// A batch of rows cannot be inserted together
    #[error("Conflicting rows for table '{table}'")]
    Conflict { table: String },

    /// Malformed length-prefixed array
    #[error("Decode error: {0}")]
    Decode(String),

    /// An empty (no-op) subtree was added to a condition tree
    #[error("Cannot add an empty condition to a where clause")]
    EmptyCondition,

    /// Table is not registered
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Row type has no table mapping
    #[error("Row type not registered: {0}")]
    TypeNotRegistered(&'static str),

    /// Column is not part of a table
    #[error("Column {column} not found in table '{table}'")]
    ColumnNotFound { table: String, column: u32 },

    /// Unknown string form of a closed enumeration
    #[error("Parse error: {0}")]
    Parse(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Schema configuration (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failure reported by the transport layer
    #[error("Execution error: {0}")]
    Execution(String),
}

impl QueryError {
    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a row conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if this is a "not found" error (table, type or column)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TableNotFound(_) | Self::TypeNotRegistered(_) | Self::ColumnNotFound { .. }
        )
    }

    /// Check if this is a schema configuration error
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::ColumnCheck(_) | Self::ReferenceCheck(_))
    }
}

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for QueryError {
    fn from(err: tokio_postgres::Error) -> Self {
        Self::Execution(err.to_string())
    }
}
