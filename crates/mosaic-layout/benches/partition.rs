//! Benchmark: growing a partition one slot at a time.
//!
//! Compares a full rebuild per added slot against incremental extension
//! at various slot counts (8, 64, 512).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mosaic_core::{GridEngine, Size};
use mosaic_layout::PartitionTracker;

const CONTAINER: Size = Size {
    width: 1080,
    height: 720,
};

// ── Benchmarks ──

fn bench_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_growth");
    for &n in &[8usize, 64, 512] {
        group.bench_with_input(BenchmarkId::new("rebuild_each_step", n), &n, |b, &n| {
            b.iter(|| {
                let mut tracker = PartitionTracker::new();
                for count in 1..=n {
                    tracker.rebuild(CONTAINER, count);
                }
                black_box(tracker.column_count());
            });
        });

        group.bench_with_input(BenchmarkId::new("extend_each_step", n), &n, |b, &n| {
            b.iter(|| {
                let mut tracker = PartitionTracker::new();
                for count in 1..=n {
                    tracker.extend(CONTAINER, count);
                }
                black_box(tracker.column_count());
            });
        });
    }
    group.finish();
}

fn bench_overflow_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("overflow_churn");
    for &max in &[3usize, 11] {
        group.bench_with_input(BenchmarkId::new("push_past_ceiling", max), &max, |b, &max| {
            b.iter(|| {
                let mut tracker = PartitionTracker::with_max_slots(max).unwrap();
                tracker.resize(CONTAINER);
                for _ in 0..(max * 4) {
                    tracker.push().unwrap();
                }
                black_box(tracker.placements());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_growth, bench_overflow_churn);
criterion_main!(benches);
