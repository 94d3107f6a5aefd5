//! Estimation pipeline benchmarks.
//!
//! Run with: `cargo bench --package refreshcast-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use refreshcast_bench::{bench_now, history_csv, synthetic_history};
use refreshcast_lib::prelude::*;
use std::hint::black_box;

/// History sizes: empty, small, the default cap and well beyond it.
const SIZES: [usize; 4] = [0, 10, 50, 500];

fn estimate_benchmark(c: &mut Criterion) {
    let now = bench_now();
    let estimator = Estimator::global();
    let metadata = ResourceMetadata::new(StorageMode::Import);

    let mut group = c.benchmark_group("estimate");
    for size in SIZES {
        let history = synthetic_history(size, now);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("manual", size), &history, |b, history| {
            b.iter(|| {
                estimator.estimate(
                    black_box(history),
                    now,
                    &metadata,
                    RefreshKind::Manual,
                )
            });
        });

        group.bench_with_input(BenchmarkId::new("analyze", size), &history, |b, history| {
            b.iter(|| {
                estimator.analyze(
                    black_box(history),
                    now,
                    &metadata,
                    RefreshKind::Scheduled,
                )
            });
        });
    }
    group.finish();
}

fn decode_benchmark(c: &mut Criterion) {
    let csv = history_csv(&synthetic_history(500, bench_now()));

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(csv.len() as u64));
    group.bench_function("csv", |b| {
        b.iter(|| read_history(black_box(csv.as_bytes()), HistoryFormat::Csv))
    });
    group.finish();
}

criterion_group!(benches, estimate_benchmark, decode_benchmark);
criterion_main!(benches);
