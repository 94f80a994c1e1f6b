//! Criterion benchmarks for cosmoviz_core generation and conversion
//!
//! Run with: cargo bench -p cosmoviz_core

use cosmoviz_core::config::GenerationConfig;
use cosmoviz_core::model::{CosmoParameter, SweepLayout};
use cosmoviz_core::store::{read_dataset, write_dataset};
use cosmoviz_core::synth::{full_grid, one_at_a_time};
use cosmoviz_core::view::DatasetView;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_full_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_grid");

    for values in [3usize, 6, 10].iter() {
        let config = GenerationConfig {
            values_per_parameter: *values,
            ..GenerationConfig::default()
        };

        group.bench_with_input(
            BenchmarkId::new("values_per_parameter", values),
            values,
            |b, _| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(42);
                    full_grid(&mut rng, black_box(&config))
                })
            },
        );
    }

    group.finish();
}

fn bench_one_at_a_time(c: &mut Criterion) {
    let config = GenerationConfig::default();

    c.bench_function("one_at_a_time_default", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            one_at_a_time(&mut rng, black_box(&config), &CosmoParameter::ALL)
        })
    });
}

fn bench_store_round_trip(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("scratch directory");
    let path = dir.path().join("data.npz");
    let config = GenerationConfig {
        values_per_parameter: 6,
        ..GenerationConfig::default()
    };
    let dataset =
        full_grid(&mut StdRng::seed_from_u64(42), &config).expect("benchmark dataset");

    let mut group = c.benchmark_group("store");

    group.bench_function("write_full_grid", |b| {
        b.iter(|| write_dataset(black_box(&path), black_box(&dataset)))
    });

    write_dataset(&path, &dataset).expect("benchmark container");
    group.bench_function("read_full_grid", |b| {
        b.iter(|| read_dataset(black_box(&path), SweepLayout::FullGrid))
    });

    group.bench_function("view_full_grid", |b| {
        b.iter(|| DatasetView::from_dataset(black_box(&dataset)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_full_grid,
    bench_one_at_a_time,
    bench_store_round_trip,
);
criterion_main!(benches);
