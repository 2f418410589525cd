//! Column type taxonomy, table/column identifiers and column flags.

use crate::error::{QueryError, QueryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque table identifier. Zero is reserved as "undefined".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(pub u32);

impl TableId {
    pub const UNDEFINED: TableId = TableId(0);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn is_undefined(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque column identifier, unique within a table. Zero is reserved as "undefined".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(pub u32);

impl ColumnId {
    pub const UNDEFINED: ColumnId = ColumnId(0);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn is_undefined(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage type of a column.
///
/// The type drives both the DDL type name and how values are rendered
/// to text (see [`crate::codec`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// No type. Also used for pre-rendered SQL fragments.
    #[default]
    Empty,
    /// Auto-incrementing id (`SERIAL`)
    Autoincrement,
    /// RFC 4122 UUID
    Uuid,
    Bool,
    /// 2-byte integer
    Short,
    /// 4-byte integer
    Int,
    /// 8-byte integer
    Long,
    /// 4-byte float
    Real,
    /// `yyyy-mm-dd`
    Date,
    /// `hh:mm:ss`
    Time,
    /// Bounded character string, `len` is the maximum length
    CharArray,
    Text,
    /// Raw bytes
    Blob,
}

impl ColumnType {
    pub const ALL: [ColumnType; 13] = [
        ColumnType::Empty,
        ColumnType::Autoincrement,
        ColumnType::Uuid,
        ColumnType::Bool,
        ColumnType::Short,
        ColumnType::Int,
        ColumnType::Long,
        ColumnType::Real,
        ColumnType::Date,
        ColumnType::Time,
        ColumnType::CharArray,
        ColumnType::Text,
        ColumnType::Blob,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ColumnType::Empty => "empty",
            ColumnType::Autoincrement => "autoincrement",
            ColumnType::Uuid => "uuid",
            ColumnType::Bool => "bool",
            ColumnType::Short => "short",
            ColumnType::Int => "int",
            ColumnType::Long => "long",
            ColumnType::Real => "real",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
            ColumnType::CharArray => "char_array",
            ColumnType::Text => "text",
            ColumnType::Blob => "blob",
        }
    }

    /// Whether `can_be_negative` has a meaning for this type.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            ColumnType::Autoincrement
                | ColumnType::Short
                | ColumnType::Int
                | ColumnType::Long
                | ColumnType::Real
        )
    }

    /// Whether literal values of this type must be quoted in SQL text.
    pub const fn is_text_like(self) -> bool {
        matches!(
            self,
            ColumnType::Uuid
                | ColumnType::Date
                | ColumnType::Time
                | ColumnType::CharArray
                | ColumnType::Text
                | ColumnType::Blob
        )
    }

    /// DDL type name for a column of this type.
    ///
    /// Array columns (other than character arrays, where `len` is the
    /// string length) are packed into a single text field.
    pub fn sql_type(self, len: u32, is_array: bool) -> Option<String> {
        if is_array && self != ColumnType::CharArray && self != ColumnType::Empty {
            return Some("TEXT".to_string());
        }
        let name = match self {
            ColumnType::Empty => return None,
            ColumnType::Autoincrement => "SERIAL",
            ColumnType::Uuid => "UUID",
            ColumnType::Bool => "BOOLEAN",
            ColumnType::Short => "SMALLINT",
            ColumnType::Int => "INTEGER",
            ColumnType::Long => "BIGINT",
            ColumnType::Real => "REAL",
            ColumnType::Date => "DATE",
            ColumnType::Time => "TIME",
            ColumnType::CharArray => return Some(format!("VARCHAR({len})")),
            ColumnType::Text => "TEXT",
            ColumnType::Blob => "BYTEA",
        };
        Some(name.to_string())
    }

    /// Postgres wire type for this column type.
    #[cfg(feature = "postgres")]
    pub fn pg_type(self) -> Option<tokio_postgres::types::Type> {
        use tokio_postgres::types::Type;
        let ty = match self {
            ColumnType::Empty => return None,
            ColumnType::Autoincrement | ColumnType::Int => Type::INT4,
            ColumnType::Uuid => Type::UUID,
            ColumnType::Bool => Type::BOOL,
            ColumnType::Short => Type::INT2,
            ColumnType::Long => Type::INT8,
            ColumnType::Real => Type::FLOAT4,
            ColumnType::Date => Type::DATE,
            ColumnType::Time => Type::TIME,
            ColumnType::CharArray => Type::VARCHAR,
            ColumnType::Text => Type::TEXT,
            ColumnType::Blob => Type::BYTEA,
        };
        Some(ty)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        ColumnType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| QueryError::parse(format!("unknown column type '{s}'")))
    }
}

/// Column flags.
///
/// Defaults: nullable, non-negative, scalar, no key, no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnFlags {
    pub is_primary_key: bool,
    pub is_reference: bool,
    pub can_be_null: bool,
    /// Only meaningful for numeric types.
    pub can_be_negative: bool,
    pub is_array: bool,
    pub has_default: bool,
}

impl Default for ColumnFlags {
    fn default() -> Self {
        Self {
            is_primary_key: false,
            is_reference: false,
            can_be_null: true,
            can_be_negative: false,
            is_array: false,
            has_default: false,
        }
    }
}

impl ColumnFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark as primary key. Primary keys are never nullable.
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.can_be_null = false;
        self
    }

    pub fn reference(mut self) -> Self {
        self.is_reference = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.can_be_null = false;
        self
    }

    pub fn nullable(mut self, can_be_null: bool) -> Self {
        self.can_be_null = can_be_null;
        self
    }

    pub fn negative(mut self) -> Self {
        self.can_be_negative = true;
        self
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_type_round_trips_through_str() {
        for ty in ColumnType::ALL {
            assert_eq!(ty.to_string().parse::<ColumnType>().unwrap(), ty);
        }
    }

    #[test]
    fn column_type_rejects_unknown_name() {
        let err = "varchar".parse::<ColumnType>().unwrap_err();
        assert!(matches!(err, QueryError::Parse(_)));
    }

    #[test]
    fn column_type_serde_matches_display() {
        let json = serde_json::to_string(&ColumnType::CharArray).unwrap();
        assert_eq!(json, "\"char_array\"");
        let back: ColumnType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ColumnType::CharArray);
    }

    #[test]
    fn sql_type_names() {
        assert_eq!(ColumnType::Autoincrement.sql_type(1, false).unwrap(), "SERIAL");
        assert_eq!(ColumnType::CharArray.sql_type(40, false).unwrap(), "VARCHAR(40)");
        assert_eq!(ColumnType::Int.sql_type(4, true).unwrap(), "TEXT");
        assert!(ColumnType::Empty.sql_type(1, false).is_none());
    }

    #[test]
    fn flags_defaults() {
        let flags = ColumnFlags::default();
        assert!(flags.can_be_null);
        assert!(!flags.can_be_negative);
        assert!(!flags.is_primary_key);

        let pk = ColumnFlags::new().primary_key();
        assert!(pk.is_primary_key);
        assert!(!pk.can_be_null);
    }

    #[test]
    fn flags_deserialize_with_defaults() {
        let flags: ColumnFlags = serde_json::from_str(r#"{"is_array": true}"#).unwrap();
        assert!(flags.is_array);
        assert!(flags.can_be_null);
    }

    #[test]
    fn undefined_ids() {
        assert!(TableId::UNDEFINED.is_undefined());
        assert!(ColumnId::default().is_undefined());
        assert!(!TableId::new(3).is_undefined());
    }
}
