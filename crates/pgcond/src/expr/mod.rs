//! Condition trees for WHERE clauses.
//!
//! - [`Operator`] / [`ConditionOp`]: the operator catalog and its inversion flag
//! - [`ExprNode`]: binary tree of operator, field-name and value nodes
//! - [`WhereClause`]: typed per-operator constructors and merging
//!
//! Serialization walks the tree in-order; values are rendered through a
//! pluggable formatter (see [`default_field_to_str`]) so each backend can
//! apply its own quoting.

mod node;
mod operator;
mod where_clause;

pub use node::{
    ExprNode, LeafValue, NodeData, NodeKind, default_field_to_str, format_equality,
};
pub use operator::{BinaryOp, ConditionOp, LogicalOp, Operator};
pub use where_clause::WhereClause;

#[cfg(test)]
mod tests;
