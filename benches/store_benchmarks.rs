//! Benchmarks for the hot paths of a context.
//!
//! - Type fingerprinting of short and long names
//! - Typed resolution from stores of different sizes
//! - Create/delete churn through the host adapter
//!
//! ```bash
//! cargo bench --bench store_benchmarks
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use objstate::{Context, Handle, Interp, Overwrite, StateConfig, TypeHash, VariableStore};
use std::hint::black_box;

fn hash_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("type_hash");

    for name in ["dict", "image_processing_pipeline", &"x".repeat(63)] {
        group.throughput(Throughput::Bytes(name.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name.len()), name, |b, name| {
            b.iter(|| TypeHash::from_name(black_box(name)))
        });
    }

    group.finish();
}

fn resolve_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for size in [10usize, 1_000, 100_000] {
        let mut store = VariableStore::new("v#", 6);
        let mut last = String::new();
        for i in 0..size {
            let name = store.unique_name();
            let handle = Handle::wrap(i as u64, "num").unwrap();
            store.register(&name, handle, Overwrite::DeleteOld);
            last = name;
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), &last, |b, name| {
            b.iter(|| *store.resolve_as::<u64>(black_box(name), "num").unwrap())
        });
    }

    group.finish();
}

fn churn_benchmarks(c: &mut Criterion) {
    let mut interp = Interp::new();
    interp
        .install(Context::with_default_types(StateConfig::default()).unwrap())
        .unwrap();

    c.bench_function("create_delete_counter", |b| {
        b.iter(|| {
            let name = interp.eval("cobj create counter 1 2").unwrap().to_string();
            interp.eval(&format!("{name} incr")).unwrap();
            interp.eval(&format!("cobj delete {name}")).unwrap();
        })
    });
}

criterion_group!(benches, hash_benchmarks, resolve_benchmarks, churn_benchmarks);
criterion_main!(benches);
