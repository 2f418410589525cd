//! Tests for condition trees and the where-clause builder.

use super::*;
use crate::error::QueryError;
use crate::types::ColumnType;
use std::sync::Arc;

fn int(v: i64) -> LeafValue {
    LeafValue::of(ColumnType::Int, &v)
}

fn text(v: &str) -> LeafValue {
    LeafValue::new(ColumnType::Text, v)
}

#[test]
fn test_eq_matches_format_equality() {
    let clause = WhereClause::eq("id", int(101));
    assert_eq!(clause.to_sql_string(), format_equality(ColumnType::Int, "id", "101"));
    assert_eq!(clause.to_sql_string(), "id = 101");
}

#[test]
fn test_comparison_operators() {
    assert_eq!(WhereClause::ne("id", int(1)).to_sql_string(), "id != 1");
    assert_eq!(WhereClause::gt("year", int(1600)).to_sql_string(), "year > 1600");
    assert_eq!(WhereClause::ge("year", int(1600)).to_sql_string(), "year >= 1600");
    assert_eq!(WhereClause::lt("year", int(1600)).to_sql_string(), "year < 1600");
    assert_eq!(WhereClause::le("year", int(1600)).to_sql_string(), "year <= 1600");
    assert_eq!(WhereClause::is_null("deleted_at").to_sql_string(), "deleted_at IS NULL");
    assert_eq!(
        WhereClause::is_not_null("deleted_at").to_sql_string(),
        "deleted_at IS NOT NULL"
    );
}

#[test]
fn test_text_values_are_quoted() {
    let clause = WhereClause::eq("title", text("Don't Panic"));
    assert_eq!(clause.to_sql_string(), "title = 'Don''t Panic'");
}

#[test]
fn test_binary_shape() {
    let clause = WhereClause::eq("id", int(7));
    let root = clause.root();
    assert_eq!(root.data().kind(), NodeKind::Operator);
    assert_eq!(root.left().unwrap().data().kind(), NodeKind::FieldName);
    assert_eq!(root.right().unwrap().data().kind(), NodeKind::Value);
    assert!(!root.left().unwrap().has_subnodes());
    assert!(!root.right().unwrap().has_subnodes());
}

#[test]
fn test_like_and_not_like() {
    assert_eq!(
        WhereClause::like("title", text("Don%")).to_sql_string(),
        "title LIKE 'Don%'"
    );
    let clause = WhereClause::not_like("title", text("%Quijote%"));
    assert_eq!(clause.to_sql_string(), "title NOT LIKE '%Quijote%'");
    assert!(clause.root().data().as_operator().unwrap().is_inverted());
}

#[test]
fn test_in_list() {
    let clause = WhereClause::in_list("id", ColumnType::Int, ["1", "2", "3"]);
    assert_eq!(clause.to_sql_string(), "id IN (1, 2, 3)");

    let clause = WhereClause::not_in("lang", ColumnType::Text, ["es", "it"]);
    assert_eq!(clause.to_sql_string(), "lang NOT IN ('es', 'it')");

    // one list leaf on the right, candidates keep the column type
    let list = clause.root().right().unwrap().data().as_value().unwrap();
    assert_eq!(list.column_type, ColumnType::Text);
    assert_eq!(list.candidates().unwrap(), ["es", "it"]);
    assert_eq!(list.value, "('es', 'it')");
}

#[test]
fn test_in_list_candidates_use_formatter() {
    let clause = WhereClause::in_list("lang", ColumnType::Text, ["es", "it"])
        .and(WhereClause::eq("id", int(4)));
    let sql = clause.to_sql_string_with(|ty, v| format!("{v}::{ty}"));
    assert_eq!(sql, "lang IN (es::text, it::text) AND id = 4::int");
}

#[test]
fn test_in_list_empty() {
    let none: [&str; 0] = [];
    assert_eq!(WhereClause::in_list("id", ColumnType::Int, none).to_sql_string(), "1=0");
    assert_eq!(WhereClause::not_in("id", ColumnType::Int, none).to_sql_string(), "1=1");
}

#[test]
fn test_between_nests_and_subtree() {
    let clause = WhereClause::between("year", int(1300), int(1400));
    assert_eq!(clause.to_sql_string(), "year BETWEEN 1300 AND 1400");

    let bounds = clause.root().right().unwrap();
    assert_eq!(bounds.data().as_operator().unwrap().op(), Operator::And);
    assert_eq!(bounds.left().unwrap().data().as_value().unwrap().value, "1300");
    assert_eq!(bounds.right().unwrap().data().as_value().unwrap().value, "1400");

    let clause = WhereClause::not_between("year", int(1300), int(1400));
    assert_eq!(clause.to_sql_string(), "year NOT BETWEEN 1300 AND 1400");
}

#[test]
fn test_inversion_ignored_for_comparisons() {
    let op = ConditionOp::not(Operator::Eq);
    assert!(!op.is_inverted());
    assert_eq!(op.to_string(), "=");
    assert_eq!(ConditionOp::not(Operator::In).to_string(), "NOT IN");
}

#[test]
fn test_merge_order() {
    let t1 = WhereClause::eq("id", int(1));
    let t2 = WhereClause::like("title", text("A%"));
    let t3 = WhereClause::gt("year", int(1500));

    let mut merged = t1.clone();
    merged.merge(LogicalOp::And, &t2).unwrap();
    assert_eq!(
        merged.to_sql_string(),
        format!("{} AND {}", t1.to_sql_string(), t2.to_sql_string())
    );

    let before = Arc::clone(merged.root());
    merged.merge(LogicalOp::Or, &t3).unwrap();
    assert_eq!(merged.to_sql_string(), "id = 1 AND title LIKE 'A%' OR year > 1500");
    // the previous tree becomes the left branch of the new root, uncopied
    assert!(Arc::ptr_eq(merged.root().left().unwrap(), &before));
    assert!(Arc::ptr_eq(merged.root().right().unwrap(), t3.root()));
    assert_eq!(merged.root().depth(), 4);
}

#[test]
fn test_merged_subtree_is_shared() {
    let shared = WhereClause::eq("lang", int(2));
    let mut a = WhereClause::eq("id", int(1));
    let mut b = WhereClause::eq("id", int(2));
    a.merge(LogicalOp::And, &shared).unwrap();
    b.merge(LogicalOp::Or, &shared).unwrap();

    assert_eq!(Arc::strong_count(shared.root()), 3);
    drop(shared);
    assert_eq!(a.to_sql_string(), "id = 1 AND lang = 2");
    assert_eq!(b.to_sql_string(), "id = 2 OR lang = 2");
}

#[test]
fn test_add_condition_rejects_empty() {
    let mut clause = WhereClause::eq("id", int(1));
    let err = clause.add_condition(LogicalOp::And, ExprNode::empty()).unwrap_err();
    assert!(matches!(err, QueryError::EmptyCondition));
    assert_eq!(clause.to_sql_string(), "id = 1");

    let err = clause
        .add_condition(Operator::Empty, WhereClause::eq("x", int(1)).into())
        .unwrap_err();
    assert!(matches!(err, QueryError::EmptyCondition));

    assert!(WhereClause::from_root(ExprNode::empty()).is_err());
}

#[test]
fn test_add_condition_with_raw_subtree() {
    let mut clause = WhereClause::eq("id", int(1));
    let sub = ExprNode::between("year", int(1), int(2), false);
    clause.add_condition(Operator::Or, sub).unwrap();
    assert_eq!(clause.to_sql_string(), "id = 1 OR year BETWEEN 1 AND 2");
}

#[test]
fn test_and_or_combinators() {
    let clause = WhereClause::eq("a", int(1))
        .and(WhereClause::eq("b", int(2)))
        .or(WhereClause::eq("c", int(3)));
    assert_eq!(clause.to_sql_string(), "a = 1 AND b = 2 OR c = 3");

    let all = WhereClause::all(vec![
        WhereClause::eq("a", int(1)),
        WhereClause::eq("b", int(2)),
        WhereClause::eq("c", int(3)),
    ])
    .unwrap();
    assert_eq!(all.to_sql_string(), "a = 1 AND b = 2 AND c = 3");
    assert!(WhereClause::any(Vec::new()).is_none());
}

#[test]
fn test_binary_with_subtree() {
    let inner = WhereClause::eq("b", int(2));
    let clause = WhereClause::binary_with_subtree(BinaryOp::And, "a", &inner);
    assert_eq!(clause.to_sql_string(), "a AND b = 2");
}

#[test]
fn test_custom_formatter() {
    let clause = WhereClause::eq("id", int(1)).and(WhereClause::eq("title", text("x")));
    let sql = clause.to_sql_string_with(|ty, v| format!("{v}::{ty}"));
    assert_eq!(sql, "id = 1::int AND title = x::text");
}

#[test]
fn test_display_uses_default_formatter() {
    let clause = WhereClause::eq("title", text("ABC"));
    assert_eq!(clause.to_string(), "title = 'ABC'");
}

#[test]
fn test_operator_parse() {
    for op in Operator::ALL {
        assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
    }
    assert_eq!("between".parse::<Operator>().unwrap(), Operator::Between);
    assert_eq!("<>".parse::<Operator>().unwrap(), Operator::Ne);
    assert!("~~".parse::<Operator>().is_err());
}

#[test]
fn test_missing_value_is_null() {
    let missing = LeafValue::of(ColumnType::Text, &None::<String>);
    assert!(missing.is_null());
    assert_eq!(missing, LeafValue::null());

    let literal = LeafValue::of(ColumnType::Text, &Some("NULL".to_string()));
    assert!(!literal.is_null());
    assert_eq!(WhereClause::is("note", missing).to_sql_string(), "note IS NULL");
    assert_eq!(WhereClause::eq("note", literal).to_sql_string(), "note = 'NULL'");
}

#[test]
fn test_long_chain() {
    const N: usize = 100_000;
    let chain = || WhereClause::all((0..N).map(|i| WhereClause::eq("id", int(i as i64)))).unwrap();

    let clause = chain();
    assert_eq!(clause.root().depth(), N + 1);
    assert_eq!(clause.root().leaf_count(), 2 * N);

    let sql = clause.to_sql_string();
    assert!(sql.starts_with("id = 0 AND id = 1 AND "));
    assert!(sql.ends_with(" AND id = 99999"));
    assert_eq!(sql.matches(" AND ").count(), N - 1);

    let other = chain();
    assert!(clause == other);
    let hash = |c: &WhereClause| {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        std::hash::Hash::hash(c, &mut hasher);
        std::hash::Hasher::finish(&hasher)
    };
    assert_eq!(hash(&clause), hash(&other));

    let mut extended = clause.clone();
    extended.merge(LogicalOp::Or, &WhereClause::is_null("id")).unwrap();
    assert!(extended != other);
    drop(clause);
    drop(other);
    assert!(extended.to_sql_string().ends_with("id = 99999 OR id IS NULL"));
}

#[test]
fn test_leaf_count() {
    let clause = WhereClause::between("year", int(1), int(2)).and(WhereClause::eq("id", int(3)));
    assert_eq!(clause.root().leaf_count(), 5);
}
