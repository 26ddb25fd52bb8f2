//! Performance benchmarks for the bandwidth tester
//!
//! Measures the client-side hot paths that sit inside or next to the
//! timed measurement windows: statistics computation, payload generation,
//! and throughput derivation.

use bandwidth_tester::{
    models::ThroughputMeasurement,
    stats::latency_statistic,
    transfer::{mib_to_bytes, random_payload},
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

/// Create a latency sample sequence resembling real ping data
fn create_samples(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| 10.0 + (i % 7) as f64 * 1.5 + (i % 3) as f64 * 0.25)
        .collect()
}

fn bench_latency_statistic(c: &mut Criterion) {
    let mut group = c.benchmark_group("latency_statistic");

    for count in [10, 100, 1000] {
        let samples = create_samples(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &samples, |b, samples| {
            b.iter(|| latency_statistic(black_box(samples)).unwrap());
        });
    }

    group.finish();
}

fn bench_random_payload(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_payload");

    for size_mb in [1.0, 3.0] {
        let byte_count = mib_to_bytes(size_mb) as usize;
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}MiB", size_mb)),
            &byte_count,
            |b, &byte_count| {
                b.iter(|| random_payload(black_box(byte_count)));
            },
        );
    }

    group.finish();
}

fn bench_throughput_derivation(c: &mut Criterion) {
    c.bench_function("throughput_from_transfer", |b| {
        b.iter(|| {
            ThroughputMeasurement::from_transfer(
                black_box(5_242_880),
                black_box(Duration::from_millis(1234)),
            )
            .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_latency_statistic,
    bench_random_payload,
    bench_throughput_derivation
);
criterion_main!(benches);
