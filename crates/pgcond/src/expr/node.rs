//! Binary expression tree.
//!
//! Internal nodes hold an operator, leaves hold a column name or a typed
//! value. Children are shared (`Arc`) and nodes are never mutated once built,
//! so extending a tree creates a new root over the previous one instead of
//! copying it.

use super::operator::{BinaryOp, ConditionOp, Operator};
use crate::codec::{ColumnValue, value_to_string};
use crate::types::ColumnType;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

const NULL: &str = "NULL";

/// A typed literal value in its text form.
///
/// A list value (the right side of `IN`) keeps each candidate separately so
/// the value formatter sees them one by one; `value` then holds the list as
/// rendered by [`default_field_to_str`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafValue {
    pub column_type: ColumnType,
    pub value: String,
    items: Option<Vec<String>>,
}

impl LeafValue {
    pub fn new(column_type: ColumnType, value: impl Into<String>) -> Self {
        Self {
            column_type,
            value: value.into(),
            items: None,
        }
    }

    /// Render a Rust value for a column of type `column_type`.
    ///
    /// A missing value (`None`) becomes [`LeafValue::null`] rather than text.
    pub fn of<V: ColumnValue + ?Sized>(column_type: ColumnType, value: &V) -> Self {
        if value.is_null() {
            return Self::null();
        }
        Self::new(column_type, value_to_string(column_type, value))
    }

    /// A SQL fragment passed through unquoted (e.g. `NOT NULL`).
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(ColumnType::Empty, sql)
    }

    /// SQL `NULL`, never quoted.
    pub fn null() -> Self {
        Self::raw(NULL)
    }

    pub fn is_null(&self) -> bool {
        self.column_type == ColumnType::Empty && self.value == NULL && self.items.is_none()
    }

    /// A parenthesised list of candidates, each typed `column_type`.
    pub fn list<I, S>(column_type: ColumnType, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = candidates.into_iter().map(Into::into).collect();
        let mut list = Self::new(column_type, String::new());
        list.value = list.render_items(&items, &default_field_to_str);
        list.items = Some(items);
        list
    }

    /// The candidates of a list value.
    pub fn candidates(&self) -> Option<&[String]> {
        self.items.as_deref()
    }

    /// The value as it appears in SQL text.
    pub fn render(&self, field_to_str: &dyn Fn(ColumnType, &str) -> String) -> String {
        match &self.items {
            Some(items) => self.render_items(items, field_to_str),
            None => field_to_str(self.column_type, &self.value),
        }
    }

    fn render_items(
        &self,
        items: &[String],
        field_to_str: &dyn Fn(ColumnType, &str) -> String,
    ) -> String {
        let rendered: Vec<String> = items
            .iter()
            .map(|item| field_to_str(self.column_type, item))
            .collect();
        format!("({})", rendered.join(", "))
    }
}

/// What a node holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    FieldName,
    Operator,
    Value,
}

/// Payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeData {
    Operator(ConditionOp),
    FieldName(String),
    Value(LeafValue),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Operator(_) => NodeKind::Operator,
            NodeData::FieldName(_) => NodeKind::FieldName,
            NodeData::Value(_) => NodeKind::Value,
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, NodeData::Operator(_))
    }

    pub fn is_field_name(&self) -> bool {
        matches!(self, NodeData::FieldName(_))
    }

    pub fn as_operator(&self) -> Option<ConditionOp> {
        match self {
            NodeData::Operator(op) => Some(*op),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&LeafValue> {
        match self {
            NodeData::Value(v) => Some(v),
            _ => None,
        }
    }

    fn write_sql(&self, out: &mut String, field_to_str: &dyn Fn(ColumnType, &str) -> String) {
        match self {
            NodeData::Operator(op) if op.is_empty() => {}
            NodeData::Operator(op) => {
                out.push(' ');
                out.push_str(&op.to_string());
                out.push(' ');
            }
            NodeData::FieldName(name) => out.push_str(name),
            NodeData::Value(v) => out.push_str(&v.render(field_to_str)),
        }
    }
}

impl From<ConditionOp> for NodeData {
    fn from(op: ConditionOp) -> Self {
        NodeData::Operator(op)
    }
}

impl From<LeafValue> for NodeData {
    fn from(value: LeafValue) -> Self {
        NodeData::Value(value)
    }
}

/// Default value formatter: text-like values are single-quoted with embedded
/// quotes doubled, everything else is passed through.
pub fn default_field_to_str(column_type: ColumnType, value: &str) -> String {
    if column_type.is_text_like() {
        format!("'{}'", value.replace('\'', "''"))
    } else {
        value.to_string()
    }
}

/// `<field> = <value>` with the default value formatter.
pub fn format_equality(column_type: ColumnType, field: &str, value: &str) -> String {
    format!("{field} = {}", default_field_to_str(column_type, value))
}

/// A node of a condition tree.
///
/// Chains built by repeated extension can be hundreds of thousands of
/// levels deep, so every walk over the tree (serialization, comparison,
/// hashing, drop) uses an explicit stack instead of recursion. Depth and
/// leaf count are computed once when a node is built.
#[derive(Clone)]
pub struct ExprNode {
    data: NodeData,
    left: Option<Arc<ExprNode>>,
    right: Option<Arc<ExprNode>>,
    depth: usize,
    leaves: usize,
}

impl ExprNode {
    fn build(data: NodeData, left: Option<Arc<ExprNode>>, right: Option<Arc<ExprNode>>) -> Arc<Self> {
        let depth = 1 + left
            .as_ref()
            .map_or(0, |n| n.depth)
            .max(right.as_ref().map_or(0, |n| n.depth));
        let leaves = match (&left, &right) {
            (None, None) => 1,
            _ => left.as_ref().map_or(0, |n| n.leaves) + right.as_ref().map_or(0, |n| n.leaves),
        };
        Arc::new(Self {
            data,
            left,
            right,
            depth,
            leaves,
        })
    }

    /// The no-op tree: an empty operator without children.
    pub fn empty() -> Arc<Self> {
        Self::build(NodeData::Operator(ConditionOp::default()), None, None)
    }

    /// A column-name leaf.
    pub fn field(name: impl Into<String>) -> Arc<Self> {
        Self::build(NodeData::FieldName(name.into()), None, None)
    }

    /// A value leaf.
    pub fn value(value: LeafValue) -> Arc<Self> {
        Self::build(NodeData::Value(value), None, None)
    }

    /// `field <op> value`
    pub fn binary(op: BinaryOp, field: impl Into<String>, value: LeafValue) -> Arc<Self> {
        Self::build(
            NodeData::Operator(op.into()),
            Some(Self::field(field)),
            Some(Self::value(value)),
        )
    }

    /// `field <op> <subtree>`
    pub fn binary_with_subtree(
        op: BinaryOp,
        field: impl Into<String>,
        subtree: Arc<ExprNode>,
    ) -> Arc<Self> {
        Self::build(NodeData::Operator(op.into()), Some(Self::field(field)), Some(subtree))
    }

    /// `field [NOT] LIKE pattern`
    pub fn like(field: impl Into<String>, pattern: LeafValue, inverted: bool) -> Arc<Self> {
        Self::build(
            NodeData::Operator(ConditionOp::new(Operator::Like, inverted)),
            Some(Self::field(field)),
            Some(Self::value(pattern)),
        )
    }

    /// `field [NOT] IN (v1, v2, ...)`
    ///
    /// The candidates form one list leaf typed `column_type`; each one goes
    /// through the value formatter on output. An empty list yields the
    /// constant leaf `1=0` (or `1=1` when inverted).
    pub fn in_list<I, S>(
        field: impl Into<String>,
        column_type: ColumnType,
        values: I,
        inverted: bool,
    ) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let candidates: Vec<String> = values.into_iter().map(|v| v.as_ref().to_string()).collect();
        if candidates.is_empty() {
            return Self::value(LeafValue::raw(if inverted { "1=1" } else { "1=0" }));
        }
        Self::build(
            NodeData::Operator(ConditionOp::new(Operator::In, inverted)),
            Some(Self::field(field)),
            Some(Self::value(LeafValue::list(column_type, candidates))),
        )
    }

    /// `field [NOT] BETWEEN lower AND upper`; the bounds form an `AND` subtree.
    pub fn between(
        field: impl Into<String>,
        lower: LeafValue,
        upper: LeafValue,
        inverted: bool,
    ) -> Arc<Self> {
        let bounds = Self::build(
            NodeData::Operator(Operator::And.into()),
            Some(Self::value(lower)),
            Some(Self::value(upper)),
        );
        Self::build(
            NodeData::Operator(ConditionOp::new(Operator::Between, inverted)),
            Some(Self::field(field)),
            Some(bounds),
        )
    }

    /// A new root holding `op` over `left` and `right`. Neither subtree is copied.
    pub fn add_condition(
        op: impl Into<ConditionOp>,
        left: &Arc<ExprNode>,
        right: &Arc<ExprNode>,
    ) -> Arc<Self> {
        Self::build(
            NodeData::Operator(op.into()),
            Some(Arc::clone(left)),
            Some(Arc::clone(right)),
        )
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn left(&self) -> Option<&Arc<ExprNode>> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&Arc<ExprNode>> {
        self.right.as_ref()
    }

    pub fn has_subnodes(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }

    /// True for the no-op tree.
    pub fn is_empty(&self) -> bool {
        matches!(&self.data, NodeData::Operator(op) if op.is_empty()) && !self.has_subnodes()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// Serialize in-order: left subtree, this node, right subtree.
    ///
    /// Operators are padded with one space on each side, field names are
    /// written as-is and values go through `field_to_str`.
    pub fn to_sql_string(&self, field_to_str: &dyn Fn(ColumnType, &str) -> String) -> String {
        let mut out = String::new();
        self.write_sql(&mut out, field_to_str);
        out
    }

    fn write_sql(&self, out: &mut String, field_to_str: &dyn Fn(ColumnType, &str) -> String) {
        let mut steps = vec![Step::Visit(self)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Emit(data) => data.write_sql(out, field_to_str),
                Step::Visit(node) => {
                    if let Some(right) = &node.right {
                        steps.push(Step::Visit(right));
                    }
                    steps.push(Step::Emit(&node.data));
                    if let Some(left) = &node.left {
                        steps.push(Step::Visit(left));
                    }
                }
            }
        }
    }
}

enum Step<'a> {
    Visit(&'a ExprNode),
    Emit(&'a NodeData),
}

impl PartialEq for ExprNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if std::ptr::eq(a, b) {
                continue;
            }
            if a.data != b.data {
                return false;
            }
            for (l, r) in [(&a.left, &b.left), (&a.right, &b.right)] {
                match (l, r) {
                    (Some(l), Some(r)) => pending.push((l.as_ref(), r.as_ref())),
                    (None, None) => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Eq for ExprNode {}

impl Hash for ExprNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            node.data.hash(state);
            node.left.is_some().hash(state);
            node.right.is_some().hash(state);
            pending.extend(node.right.as_deref());
            pending.extend(node.left.as_deref());
        }
    }
}

impl fmt::Debug for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprNode")
            .field("data", &self.data)
            .field("depth", &self.depth)
            .field("sql", &self.to_sql_string(&default_field_to_str))
            .finish()
    }
}

impl Drop for ExprNode {
    // Unlinks uniquely owned children one at a time; shared subtrees only
    // lose a reference.
    fn drop(&mut self) {
        let mut orphans: Vec<Arc<ExprNode>> =
            self.left.take().into_iter().chain(self.right.take()).collect();
        while let Some(node) = orphans.pop() {
            if let Ok(mut node) = Arc::try_unwrap(node) {
                orphans.extend(node.left.take());
                orphans.extend(node.right.take());
            }
        }
    }
}
