//! Column and reference definitions.
//!
//! Definitions are created once, when a table schema is registered, and are
//! never mutated afterwards. Each carries a `self_check` that rejects
//! logically inconsistent flag combinations.
//!
//! # Example
//! ```
//! use pgcond::column::{ColumnDefinition, ForeignKeyAction, ReferenceDefinition};
//! use pgcond::types::{ColumnId, ColumnType, TableId};
//!
//! let id = ColumnDefinition::new(ColumnId(1), "id", ColumnType::Autoincrement).primary_key();
//! let author = ColumnDefinition::new(ColumnId(2), "author_id", ColumnType::Int)
//!     .not_null()
//!     .reference();
//! assert!(id.self_check().is_ok());
//! assert!(author.self_check().is_ok());
//!
//! let fk = ReferenceDefinition::foreign_key("author_id", TableId(2), "id")
//!     .on_delete(ForeignKeyAction::Cascade);
//! assert!(fk.self_check().is_ok());
//! ```

use crate::error::{ColumnCheckError, QueryError, QueryResult, ReferenceCheckError};
use crate::expr::default_field_to_str;
use crate::types::{ColumnFlags, ColumnId, ColumnType, TableId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One named, typed column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub id: ColumnId,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub flags: ColumnFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Element count for arrays, maximum length for character arrays.
    #[serde(default = "default_len")]
    pub len: u32,
}

fn default_len() -> u32 {
    1
}

impl ColumnDefinition {
    /// A nullable scalar column with default flags.
    pub fn new(id: ColumnId, name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            id,
            name: name.into(),
            column_type,
            flags: ColumnFlags::default(),
            default_value: None,
            len: 1,
        }
    }

    pub fn with_flags(mut self, flags: ColumnFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.flags = self.flags.primary_key();
        self
    }

    pub fn not_null(mut self) -> Self {
        self.flags = self.flags.not_null();
        self
    }

    pub fn negative(mut self) -> Self {
        self.flags = self.flags.negative();
        self
    }

    pub fn reference(mut self) -> Self {
        self.flags = self.flags.reference();
        self
    }

    /// Array of `len` elements, packed into one text field.
    pub fn array(mut self, len: u32) -> Self {
        self.flags = self.flags.array();
        self.len = len;
        self
    }

    /// Maximum length of a character array.
    pub fn with_len(mut self, len: u32) -> Self {
        self.len = len;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.flags = self.flags.with_default();
        self.default_value = Some(value.into());
        self
    }

    /// Check that flags, type and length are consistent.
    pub fn self_check(&self) -> Result<(), ColumnCheckError> {
        let name = || self.name.clone();
        let flags = &self.flags;

        if self.name.is_empty() {
            return Err(ColumnCheckError::EmptyName(self.id.0));
        }
        if self.id.is_undefined() {
            return Err(ColumnCheckError::UndefinedId(name()));
        }
        if self.column_type == ColumnType::Empty {
            return Err(ColumnCheckError::EmptyType(name()));
        }
        if self.len == 0 {
            return Err(ColumnCheckError::ZeroLength(name()));
        }
        if flags.is_primary_key && flags.can_be_null {
            return Err(ColumnCheckError::NullablePrimaryKey(name()));
        }
        if flags.is_array && self.len <= 1 {
            return Err(ColumnCheckError::ArrayWithoutLength {
                column: name(),
                len: self.len,
            });
        }
        if !flags.is_array && self.len > 1 && self.column_type != ColumnType::CharArray {
            return Err(ColumnCheckError::LengthWithoutArray {
                column: name(),
                column_type: self.column_type.to_string(),
                len: self.len,
            });
        }
        if flags.can_be_negative && !self.column_type.is_numeric() {
            return Err(ColumnCheckError::NegativeNonNumeric {
                column: name(),
                column_type: self.column_type.to_string(),
            });
        }
        if flags.has_default && self.default_value.is_none() {
            return Err(ColumnCheckError::MissingDefault(name()));
        }
        if flags.is_reference && self.column_type == ColumnType::Blob {
            return Err(ColumnCheckError::BlobReference(name()));
        }
        Ok(())
    }

    /// Column clause of a `CREATE TABLE` statement, e.g. `title VARCHAR(120) NOT NULL`.
    pub fn to_sql(&self) -> Option<String> {
        let ty = self.column_type.sql_type(self.len, self.flags.is_array)?;
        let mut sql = format!("{} {}", self.name, ty);
        if !self.flags.can_be_null && self.column_type != ColumnType::Autoincrement {
            sql.push_str(" NOT NULL");
        }
        if needs_non_negative_check(&self.flags, self.column_type) {
            sql.push_str(&format!(" CHECK ({} >= 0)", self.name));
        }
        if let Some(default) = self.default_value.as_deref().filter(|_| self.flags.has_default) {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default_field_to_str(self.column_type, default));
        }
        Some(sql)
    }
}

/// Non-negative numeric scalars get a `CHECK (col >= 0)` constraint.
fn needs_non_negative_check(flags: &ColumnFlags, ty: ColumnType) -> bool {
    ty.is_numeric() && ty != ColumnType::Autoincrement && !flags.can_be_negative && !flags.is_array
}

/// Action applied to dependent rows when a referenced row changes.
///
/// `SET DEFAULT` is intentionally not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyAction {
    #[default]
    None,
    SetNull,
    Cascade,
    Restrict,
}

impl ForeignKeyAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            ForeignKeyAction::None => "none",
            ForeignKeyAction::SetNull => "set_null",
            ForeignKeyAction::Cascade => "cascade",
            ForeignKeyAction::Restrict => "restrict",
        }
    }

    /// SQL keyword form; `None` has no clause.
    pub const fn as_sql(self) -> Option<&'static str> {
        match self {
            ForeignKeyAction::None => None,
            ForeignKeyAction::SetNull => Some("SET NULL"),
            ForeignKeyAction::Cascade => Some("CASCADE"),
            ForeignKeyAction::Restrict => Some("RESTRICT"),
        }
    }
}

impl fmt::Display for ForeignKeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForeignKeyAction {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        match s {
            "none" => Ok(ForeignKeyAction::None),
            "set_null" => Ok(ForeignKeyAction::SetNull),
            "cascade" => Ok(ForeignKeyAction::Cascade),
            "restrict" => Ok(ForeignKeyAction::Restrict),
            other => Err(QueryError::parse(format!("unknown foreign key action '{other}'"))),
        }
    }
}

/// A column's reference to a column of another table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDefinition {
    /// Owning column of this table.
    pub column: String,
    pub target_table: TableId,
    pub target_column: String,
    #[serde(default)]
    pub is_foreign_key: bool,
    #[serde(default)]
    pub has_on_delete: bool,
    #[serde(default)]
    pub has_on_update: bool,
    #[serde(default)]
    pub delete_action: ForeignKeyAction,
    #[serde(default)]
    pub update_action: ForeignKeyAction,
}

impl ReferenceDefinition {
    pub fn new(
        column: impl Into<String>,
        target_table: TableId,
        target_column: impl Into<String>,
        is_foreign_key: bool,
    ) -> Self {
        Self {
            column: column.into(),
            target_table,
            target_column: target_column.into(),
            is_foreign_key,
            has_on_delete: false,
            has_on_update: false,
            delete_action: ForeignKeyAction::None,
            update_action: ForeignKeyAction::None,
        }
    }

    pub fn foreign_key(
        column: impl Into<String>,
        target_table: TableId,
        target_column: impl Into<String>,
    ) -> Self {
        Self::new(column, target_table, target_column, true)
    }

    pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.has_on_delete = true;
        self.delete_action = action;
        self
    }

    pub fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.has_on_update = true;
        self.update_action = action;
        self
    }

    /// Check that the action flags and target are consistent.
    pub fn self_check(&self) -> Result<(), ReferenceCheckError> {
        if self.column.is_empty() {
            return Err(ReferenceCheckError::EmptyColumn);
        }
        if self.has_on_delete && self.delete_action == ForeignKeyAction::None {
            return Err(ReferenceCheckError::MissingDeleteAction(self.column.clone()));
        }
        if self.has_on_update && self.update_action == ForeignKeyAction::None {
            return Err(ReferenceCheckError::MissingUpdateAction(self.column.clone()));
        }
        if self.is_foreign_key {
            if self.target_table.is_undefined() {
                return Err(ReferenceCheckError::UndefinedTargetTable(self.column.clone()));
            }
            if self.target_column.is_empty() {
                return Err(ReferenceCheckError::EmptyTargetColumn(self.column.clone()));
            }
        }
        Ok(())
    }

    /// Table constraint clause, e.g.
    /// `FOREIGN KEY (author_id) REFERENCES authors(id) ON DELETE CASCADE`.
    ///
    /// Plain references carry no constraint and yield `None`.
    pub fn to_sql(&self, target_table_name: &str) -> Option<String> {
        if !self.is_foreign_key {
            return None;
        }
        let mut sql = format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            self.column, target_table_name, self.target_column
        );
        if let (true, Some(action)) = (self.has_on_delete, self.delete_action.as_sql()) {
            sql.push_str(" ON DELETE ");
            sql.push_str(action);
        }
        if let (true, Some(action)) = (self.has_on_update, self.update_action.as_sql()) {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action);
        }
        Some(sql)
    }
}
