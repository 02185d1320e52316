#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for spatial lookup.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pm25_map::prelude::*;

fn samples(count: usize) -> Vec<Sample> {
    (0..count)
        .map(|i| {
            let t = i as f64 / count as f64;
            Sample::new(t * 140.0 - 60.0, (t * 97.0).fract() * 360.0 - 180.0, (i % 120) as f32)
        })
        .collect()
}

fn lookup_build_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_build");

    for count in [1_000, 10_000, 50_000] {
        let data = samples(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| SpatialLookup::from_samples(black_box(data.clone())).expect("valid dataset"));
        });
    }

    group.finish();
}

fn lookup_query_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_query");

    for count in [1_000, 10_000, 50_000] {
        let data = samples(count);
        let lookup = SpatialLookup::from_samples(data.clone()).expect("valid dataset");
        let hit = data[count / 2];

        group.bench_with_input(BenchmarkId::new("exact", count), &hit, |b, s| {
            b.iter(|| lookup.query(black_box(s.latitude), black_box(s.longitude)));
        });

        group.bench_with_input(BenchmarkId::new("scan_miss", count), &count, |b, _| {
            b.iter(|| lookup.query(black_box(-89.5), black_box(179.5)));
        });
    }

    group.finish();
}

criterion_group!(benches, lookup_build_benchmark, lookup_query_benchmark);
criterion_main!(benches);
