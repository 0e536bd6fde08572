//! Performance benchmarks for list workspaces.

use borges::{values, Value, Workspace, WorkspaceConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_workspace(len: usize) -> Workspace {
    let ws = Workspace::with_config(WorkspaceConfig {
        page_size: 25,
        rng_seed: Some(1),
    });
    ws.last("items", values((0..len).map(|i| (i % 97) as i64)))
        .unwrap();
    ws
}

/// Benchmark indexed reads with varying list lengths
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for len in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("len", len), &len, |b, &len| {
            let ws = create_workspace(len);
            b.iter(|| {
                black_box(ws.get("items", -1).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark in-place edits
fn bench_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutations");

    for len in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("unique", len), &len, |b, &len| {
            let ws = create_workspace(len);
            b.iter(|| {
                ws.reset("items").unwrap();
                black_box(ws.unique("items").unwrap());
            });
        });

        group.bench_with_input(BenchmarkId::new("shuffle", len), &len, |b, &len| {
            let ws = create_workspace(len);
            b.iter(|| {
                black_box(ws.shuffle("items").unwrap());
            });
        });

        group.bench_with_input(BenchmarkId::new("remove_all", len), &len, |b, &len| {
            let ws = create_workspace(len);
            b.iter(|| {
                ws.reset("items").unwrap();
                black_box(ws.remove("items", 0, Value::from(3)).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark pagination over a long list
fn bench_page(c: &mut Criterion) {
    let ws = create_workspace(1000);

    c.bench_function("page_walk", |b| {
        b.iter(|| {
            for page in 1..=40 {
                black_box(ws.page("items", Some(page)).unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_get, bench_mutations, bench_page);
criterion_main!(benches);
