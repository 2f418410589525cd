use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgcond::codec::{array_to_string, decode_array};
use pgcond::expr::{LeafValue, LogicalOp, WhereClause};
use pgcond::types::ColumnType;

/// col0 = 0 AND col1 = 1 AND ... built by repeated merging.
fn build_eq_chain(n: usize) -> WhereClause {
    let mut clause = WhereClause::eq("col0", LeafValue::of(ColumnType::Long, &0i64));
    for i in 1..n {
        let next = WhereClause::eq(format!("col{i}"), LeafValue::of(ColumnType::Long, &(i as i64)));
        let _ = clause.merge(LogicalOp::And, &next);
    }
    clause
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("where_clause/build");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_eq_chain(n)));
        });
    }

    group.finish();
}

fn bench_to_sql_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("where_clause/to_sql_string");

    for n in [1, 5, 10, 50, 100] {
        let clause = build_eq_chain(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &clause, |b, clause| {
            b.iter(|| black_box(clause.to_sql_string()));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("where_clause/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<String> = (0..n).map(|i| format!("name-{i}")).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let clause = WhereClause::in_list("name", ColumnType::Text, values);
                black_box(clause.to_sql_string());
            });
        });
    }

    group.finish();
}

fn bench_array_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/array_round_trip");

    for n in [5, 50, 500] {
        let items: Vec<String> = (0..n).map(|i| format!("item {i}")).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &items, |b, items| {
            b.iter(|| {
                let packed = array_to_string(items, |s| s.clone());
                black_box(decode_array(&packed))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_to_sql_string,
    bench_in_list,
    bench_array_codec
);
criterion_main!(benches);
