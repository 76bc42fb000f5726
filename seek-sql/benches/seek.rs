//! Benchmarks for seek-sql predicate building, rendering and cursor coding.
//!
//! Run with: cargo bench -p seek-sql

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use seek_sql::{
    CodecRegistry, CursorDirection, CursorEnv, Encoded, MemoryExecutor, NullOrder, PageRequest,
    Paginator, SeekSpec, Signed, SortDir, SortField, SortKey, Value, keyset_predicate, postgres,
    sqlite,
};
use std::hint::black_box;

#[derive(Clone)]
struct Row {
    id: i64,
    name: String,
}

fn ordering(keys: usize) -> Vec<SortField> {
    (0..keys)
        .map(|i| {
            let dir = if i % 2 == 0 { SortDir::Asc } else { SortDir::Desc };
            SortField::new(format!("col_{i}"), dir)
        })
        .collect()
}

fn values(keys: usize) -> Vec<Value> {
    (0..keys).map(|i| Value::Int(i as i64)).collect()
}

// =============================================================================
// Predicate Benchmarks
// =============================================================================

fn bench_keyset_predicate(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyset_predicate");

    for keys in [1usize, 2, 4, 8] {
        let ordering = ordering(keys);
        let values = values(keys);
        group.bench_with_input(BenchmarkId::new("non_null", keys), &keys, |b, _| {
            b.iter(|| keyset_predicate(black_box(&ordering), black_box(&values)))
        });
    }

    let nullable = vec![
        SortField::new("email", SortDir::Asc).with_nulls(NullOrder::Last),
        SortField::new("id", SortDir::Asc),
    ];
    let with_null = vec![Value::Null, Value::Int(7)];
    group.bench_function("null_boundary", |b| {
        b.iter(|| keyset_predicate(black_box(&nullable), black_box(&with_null)))
    });

    group.finish();
}

// =============================================================================
// SQL Rendering Benchmarks
// =============================================================================

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");

    let ordering = ordering(3);
    let plan = seek_sql::SeekPlan {
        predicate: keyset_predicate(&ordering, &values(3)),
        ordering,
        limit: 21,
    };

    group.bench_function("postgres_seek", |b| {
        b.iter(|| {
            postgres(black_box("posts"))
                .fields(&["id", "title"])
                .seek(black_box(&plan))
        })
    });

    group.bench_function("sqlite_seek", |b| {
        b.iter(|| {
            sqlite(black_box("posts"))
                .fields(&["id", "title"])
                .seek(black_box(&plan))
        })
    });

    group.finish();
}

// =============================================================================
// Cursor Benchmarks
// =============================================================================

fn bench_cursor(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor");

    let payload = vec![
        Encoded::from("2024-01-15T10:30:00Z"),
        Encoded::from(12_345),
    ];
    let envs = [
        ("plain", CursorEnv::plain()),
        ("base64", CursorEnv::default()),
        ("signed", CursorEnv::default().decorate(Signed::new("bench-key"))),
    ];

    for (name, env) in &envs {
        group.bench_with_input(BenchmarkId::new("encode", name), env, |b, env| {
            b.iter(|| env.encode(CursorDirection::Forward, black_box(&payload)))
        });

        let cursor = env.encode(CursorDirection::Forward, &payload).unwrap();
        group.bench_with_input(BenchmarkId::new("decode", name), &cursor, |b, cursor| {
            b.iter(|| env.decode(black_box(cursor)))
        });
    }

    group.finish();
}

// =============================================================================
// End-to-end Page Benchmarks
// =============================================================================

fn bench_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("page");

    let rows: Vec<Row> = (0..1_000)
        .map(|id| Row {
            id,
            name: format!("user_{:04}", (id * 7919) % 1_000),
        })
        .collect();
    let exec = MemoryExecutor::new(rows, |row: &Row, column: &str| match column {
        "id" => Value::Int(row.id),
        "name" => Value::from(row.name.as_str()),
        _ => Value::Null,
    });
    let registry = CodecRegistry::with_defaults();
    let paginator = Paginator::new(
        SeekSpec::builder(&registry)
            .key(SortKey::new("name", |r: &Row| r.name.clone()))
            .key(SortKey::new("id", |r: &Row| r.id))
            .build()
            .unwrap(),
    );
    let second = paginator
        .page_without_count(&exec, &PageRequest::first(50))
        .unwrap()
        .next_cursor
        .unwrap();

    group.bench_function("memory_first_page", |b| {
        b.iter(|| paginator.page_without_count(&exec, black_box(&PageRequest::first(50))))
    });

    let request = PageRequest::first(50).with_cursor(second);
    group.bench_function("memory_cursor_page", |b| {
        b.iter(|| paginator.page_without_count(&exec, black_box(&request)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_keyset_predicate,
    bench_rendering,
    bench_cursor,
    bench_page,
);

criterion_main!(benches);
