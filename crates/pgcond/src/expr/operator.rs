//! Operator catalog.

use crate::error::{QueryError, QueryResult};
use std::fmt;
use std::str::FromStr;

/// Relational and logical operators of a condition tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    /// No-op marker
    #[default]
    Empty,
    Is,
    In,
    Like,
    Between,
    And,
    Or,
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
}

impl Operator {
    pub const ALL: [Operator; 13] = [
        Operator::Empty,
        Operator::Is,
        Operator::In,
        Operator::Like,
        Operator::Between,
        Operator::And,
        Operator::Or,
        Operator::Eq,
        Operator::Ne,
        Operator::Ge,
        Operator::Gt,
        Operator::Le,
        Operator::Lt,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Operator::Empty => "",
            Operator::Is => "IS",
            Operator::In => "IN",
            Operator::Like => "LIKE",
            Operator::Between => "BETWEEN",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Ge => ">=",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Lt => "<",
        }
    }

    /// `IN`, `LIKE` and `BETWEEN` have `NOT` forms.
    pub const fn supports_inversion(self) -> bool {
        matches!(self, Operator::In | Operator::Like | Operator::Between)
    }

    pub const fn is_logical(self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    /// Parse the SQL form; keywords are case-insensitive and `<>` is accepted for `!=`.
    fn from_str(s: &str) -> QueryResult<Self> {
        let s = s.trim();
        if s == "<>" {
            return Ok(Operator::Ne);
        }
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| QueryError::parse(format!("unknown operator '{s}'")))
    }
}

/// An operator together with its inversion flag.
///
/// The flag is only kept for operators that support inversion; for every
/// other operator it is normalised to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConditionOp {
    op: Operator,
    inverted: bool,
}

impl ConditionOp {
    pub const fn new(op: Operator, inverted: bool) -> Self {
        Self {
            op,
            inverted: inverted && op.supports_inversion(),
        }
    }

    pub const fn plain(op: Operator) -> Self {
        Self::new(op, false)
    }

    /// `NOT IN`, `NOT LIKE`, `NOT BETWEEN`.
    pub const fn not(op: Operator) -> Self {
        Self::new(op, true)
    }

    pub const fn op(&self) -> Operator {
        self.op
    }

    pub const fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self.op, Operator::Empty)
    }
}

impl From<Operator> for ConditionOp {
    fn from(op: Operator) -> Self {
        ConditionOp::plain(op)
    }
}

impl fmt::Display for ConditionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            write!(f, "NOT {}", self.op)
        } else {
            write!(f, "{}", self.op)
        }
    }
}

/// Operators whose subtree is `field <op> value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Is,
    And,
    Or,
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
}

impl From<BinaryOp> for Operator {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Is => Operator::Is,
            BinaryOp::And => Operator::And,
            BinaryOp::Or => Operator::Or,
            BinaryOp::Eq => Operator::Eq,
            BinaryOp::Ne => Operator::Ne,
            BinaryOp::Ge => Operator::Ge,
            BinaryOp::Gt => Operator::Gt,
            BinaryOp::Le => Operator::Le,
            BinaryOp::Lt => Operator::Lt,
        }
    }
}

impl From<BinaryOp> for ConditionOp {
    fn from(op: BinaryOp) -> Self {
        ConditionOp::plain(op.into())
    }
}

/// Operators that join two conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

impl From<LogicalOp> for Operator {
    fn from(op: LogicalOp) -> Self {
        match op {
            LogicalOp::And => Operator::And,
            LogicalOp::Or => Operator::Or,
        }
    }
}

impl From<LogicalOp> for ConditionOp {
    fn from(op: LogicalOp) -> Self {
        ConditionOp::plain(op.into())
    }
}

impl From<LogicalOp> for BinaryOp {
    fn from(op: LogicalOp) -> Self {
        match op {
            LogicalOp::And => BinaryOp::And,
            LogicalOp::Or => BinaryOp::Or,
        }
    }
}
