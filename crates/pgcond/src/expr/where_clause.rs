//! WHERE clause builder over the expression tree.

use super::node::{ExprNode, LeafValue, default_field_to_str};
use super::operator::{BinaryOp, ConditionOp, LogicalOp};
use crate::error::{QueryError, QueryResult};
use crate::types::ColumnType;
use std::fmt;
use std::sync::Arc;

/// A WHERE condition built from typed constructors.
///
/// Every constructor produces a well-formed subtree for its operator.
/// Extending a clause wraps the whole previous tree as the left child of a
/// new root, so repeated extension grows a left-leaning tree.
///
/// # Example
/// ```
/// use pgcond::expr::{LeafValue, LogicalOp, WhereClause};
/// use pgcond::types::ColumnType;
///
/// let mut clause = WhereClause::eq("lang", LeafValue::of(ColumnType::Int, &3));
/// clause
///     .merge(LogicalOp::And, &WhereClause::like("title", LeafValue::new(ColumnType::Text, "Don%")))
///     .unwrap();
/// assert_eq!(clause.to_sql_string(), "lang = 3 AND title LIKE 'Don%'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WhereClause {
    root: Arc<ExprNode>,
}

impl WhereClause {
    /// Wrap an existing tree. The no-op tree is rejected.
    pub fn from_root(root: Arc<ExprNode>) -> QueryResult<Self> {
        if root.is_empty() {
            return Err(QueryError::EmptyCondition);
        }
        Ok(Self { root })
    }

    // ==================== Comparisons ====================

    /// `field <op> value`
    pub fn binary(op: BinaryOp, field: impl Into<String>, value: LeafValue) -> Self {
        Self {
            root: ExprNode::binary(op, field, value),
        }
    }

    /// `field = value`
    pub fn eq(field: impl Into<String>, value: LeafValue) -> Self {
        Self::binary(BinaryOp::Eq, field, value)
    }

    /// `field != value`
    pub fn ne(field: impl Into<String>, value: LeafValue) -> Self {
        Self::binary(BinaryOp::Ne, field, value)
    }

    /// `field > value`
    pub fn gt(field: impl Into<String>, value: LeafValue) -> Self {
        Self::binary(BinaryOp::Gt, field, value)
    }

    /// `field >= value`
    pub fn ge(field: impl Into<String>, value: LeafValue) -> Self {
        Self::binary(BinaryOp::Ge, field, value)
    }

    /// `field < value`
    pub fn lt(field: impl Into<String>, value: LeafValue) -> Self {
        Self::binary(BinaryOp::Lt, field, value)
    }

    /// `field <= value`
    pub fn le(field: impl Into<String>, value: LeafValue) -> Self {
        Self::binary(BinaryOp::Le, field, value)
    }

    /// `field IS value`
    pub fn is(field: impl Into<String>, value: LeafValue) -> Self {
        Self::binary(BinaryOp::Is, field, value)
    }

    /// `field IS NULL`
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::is(field, LeafValue::null())
    }

    /// `field IS NOT NULL`
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::is(field, LeafValue::raw("NOT NULL"))
    }

    /// `field <op> <condition>` where the right side is an already built tree.
    pub fn binary_with_subtree(
        op: BinaryOp,
        field: impl Into<String>,
        condition: &WhereClause,
    ) -> Self {
        Self {
            root: ExprNode::binary_with_subtree(op, field, Arc::clone(&condition.root)),
        }
    }

    // ==================== Pattern / list / range ====================

    /// `field LIKE pattern`
    pub fn like(field: impl Into<String>, pattern: LeafValue) -> Self {
        Self {
            root: ExprNode::like(field, pattern, false),
        }
    }

    /// `field NOT LIKE pattern`
    pub fn not_like(field: impl Into<String>, pattern: LeafValue) -> Self {
        Self {
            root: ExprNode::like(field, pattern, true),
        }
    }

    /// `field IN (values...)`; an empty list renders `1=0`.
    pub fn in_list<I, S>(field: impl Into<String>, column_type: ColumnType, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            root: ExprNode::in_list(field, column_type, values, false),
        }
    }

    /// `field NOT IN (values...)`; an empty list renders `1=1`.
    pub fn not_in<I, S>(field: impl Into<String>, column_type: ColumnType, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            root: ExprNode::in_list(field, column_type, values, true),
        }
    }

    /// `field BETWEEN lower AND upper`
    pub fn between(field: impl Into<String>, lower: LeafValue, upper: LeafValue) -> Self {
        Self {
            root: ExprNode::between(field, lower, upper, false),
        }
    }

    /// `field NOT BETWEEN lower AND upper`
    pub fn not_between(field: impl Into<String>, lower: LeafValue, upper: LeafValue) -> Self {
        Self {
            root: ExprNode::between(field, lower, upper, true),
        }
    }

    // ==================== Combining ====================

    /// Replace the root with `op` over the current tree (left) and `condition` (right).
    ///
    /// The current tree is reused, not copied. An empty `condition` or an
    /// empty operator is rejected and the clause is left unchanged.
    pub fn add_condition(
        &mut self,
        op: impl Into<ConditionOp>,
        condition: Arc<ExprNode>,
    ) -> QueryResult<()> {
        let op = op.into();
        if op.is_empty() || condition.is_empty() {
            tracing::warn!(
                target: "pgcond",
                op = %op,
                "rejected empty condition in add_condition"
            );
            return Err(QueryError::EmptyCondition);
        }
        self.root = ExprNode::add_condition(op, &self.root, &condition);
        tracing::debug!(
            target: "pgcond",
            op = %op,
            depth = self.root.depth(),
            "extended where clause"
        );
        Ok(())
    }

    /// Merge `other` into this clause under `op`. `other`'s tree is shared.
    pub fn merge(&mut self, op: LogicalOp, other: &WhereClause) -> QueryResult<()> {
        self.add_condition(op, Arc::clone(&other.root))
    }

    /// `self AND other`
    pub fn and(self, other: WhereClause) -> Self {
        self.join(LogicalOp::And, other)
    }

    /// `self OR other`
    pub fn or(self, other: WhereClause) -> Self {
        self.join(LogicalOp::Or, other)
    }

    // Both roots are non-empty by construction, so joining cannot fail.
    fn join(self, op: LogicalOp, other: WhereClause) -> Self {
        Self {
            root: ExprNode::add_condition(op, &self.root, &other.root),
        }
    }

    /// AND-chain of all clauses in order, `None` if there are none.
    pub fn all(clauses: impl IntoIterator<Item = WhereClause>) -> Option<Self> {
        clauses.into_iter().reduce(|acc, c| acc.and(c))
    }

    /// OR-chain of all clauses in order, `None` if there are none.
    pub fn any(clauses: impl IntoIterator<Item = WhereClause>) -> Option<Self> {
        clauses.into_iter().reduce(|acc, c| acc.or(c))
    }

    // ==================== Output ====================

    pub fn root(&self) -> &Arc<ExprNode> {
        &self.root
    }

    /// Condition text using [`default_field_to_str`].
    pub fn to_sql_string(&self) -> String {
        self.root.to_sql_string(&default_field_to_str)
    }

    /// Condition text with a backend-specific value formatter.
    pub fn to_sql_string_with<F>(&self, field_to_str: F) -> String
    where
        F: Fn(ColumnType, &str) -> String,
    {
        self.root.to_sql_string(&field_to_str)
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql_string())
    }
}

impl From<WhereClause> for Arc<ExprNode> {
    fn from(clause: WhereClause) -> Self {
        clause.root
    }
}
