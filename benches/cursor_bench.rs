//! Benchmarks for cursor walks, seeks, slices and pagination.
//!
//! Compares the stateful cursor walk against the borrowing iterator and
//! measures positional and key seeks on collections of growing size.

use std::hint::black_box;
use std::num::NonZeroUsize;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use keyed_cursor::prelude::*;

fn build_map(size: usize) -> OrderedMap<u64> {
    (0..size)
        .map(|index| (Key::Str(format!("key-{index}")), index as u64))
        .collect()
}

// =============================================================================
// Walk Benchmark
// =============================================================================

fn benchmark_walk(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("walk");

    for size in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("sc_next", size), &size, |bencher, &size| {
            let mut map = build_map(size);
            bencher.iter(|| {
                let mut sum = map.rewind().copied().unwrap_or_default();
                while let Fetched::Value(value) = map.sc_next() {
                    sum += *value;
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("iter", size), &size, |bencher, &size| {
            let map = build_map(size);
            bencher.iter(|| black_box(map.values().sum::<u64>()));
        });
    }

    group.finish();
}

// =============================================================================
// Seek Benchmark
// =============================================================================

fn benchmark_seek(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("seek");

    for size in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("position", size), &size, |bencher, &size| {
            let mut map = build_map(size);
            bencher.iter(|| black_box(map.seek(black_box(size / 2)).copied()));
        });

        group.bench_with_input(BenchmarkId::new("key_strict", size), &size, |bencher, &size| {
            let mut map = build_map(size);
            let target = format!("key-{}", size / 2);
            bencher.iter(|| {
                black_box(
                    map.seek_to_key(black_box(target.as_str()), KeyMatch::Strict)
                        .copied(),
                )
            });
        });

        group.bench_with_input(BenchmarkId::new("key_loose", size), &size, |bencher, &size| {
            let mut map = build_map(size);
            let target = format!("key-{}", size / 2);
            bencher.iter(|| {
                black_box(
                    map.seek_to_key(black_box(target.as_str()), KeyMatch::Loose)
                        .copied(),
                )
            });
        });
    }

    group.finish();
}

// =============================================================================
// Slice and Page Benchmark
// =============================================================================

fn benchmark_slice_and_page(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("slice_and_page");

    for size in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("slice_by_key", size), &size, |bencher, &size| {
            let map = build_map(size);
            let start = format!("key-{}", size / 4);
            bencher.iter(|| black_box(map.slice_by_key(start.as_str(), KeyMatch::Strict, 100)));
        });

        group.bench_with_input(BenchmarkId::new("filter", size), &size, |bencher, &size| {
            let map = build_map(size);
            bencher.iter(|| black_box(map.filter(|value, _| value % 3 == 0)));
        });

        group.bench_with_input(BenchmarkId::new("last_page", size), &size, |bencher, &size| {
            let mut list: ListCollection<u64> = (0..size as u64).collect();
            let per_page = NonZeroUsize::new(50).unwrap_or(NonZeroUsize::MIN);
            let last_page = i64::try_from(size / 50).unwrap_or(i64::MAX);
            bencher.iter(|| {
                let mut paginator = Paginator::new(&mut list, last_page, per_page);
                black_box(paginator.materialize_page())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_walk, benchmark_seek, benchmark_slice_and_page);
criterion_main!(benches);
