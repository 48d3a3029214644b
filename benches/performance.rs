// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for djset
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Set compilation cost against pool size (greedy and beam)
//! - Transition scoring throughput
//! - Camelot neighbour lookup

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use djset::music::CamelotKey;
use djset::set::SearchStrategy;
use djset::{score_transition, spread_curve, EnergyProfile, EngineSettings, Mode, SetCompiler, SetRequest, Track};

fn pool(size: usize) -> Vec<Track> {
    let mut rng = StdRng::seed_from_u64(1);
    (0..size)
        .map(|i| {
            let mode = if rng.gen_bool(0.5) { Mode::Major } else { Mode::Minor };
            Track::new(format!("t{}", i), "Song", "Artist")
                .with_energy(rng.gen_range(0.0..1.0))
                .with_tempo(rng.gen_range(110.0..135.0))
                .with_key(rng.gen_range(0..12), mode)
        })
        .collect()
}

/// Benchmark a two-hour set against growing pools (branching cap keeps this flat)
fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    let request = SetRequest::new(120, EnergyProfile::peak());

    for size in [50, 500, 5000].iter() {
        let tracks = pool(*size);

        group.bench_with_input(BenchmarkId::new("greedy", size), &tracks, |b, tracks| {
            let compiler = SetCompiler::default();
            b.iter(|| black_box(compiler.compile(tracks, &request)))
        });

        group.bench_with_input(BenchmarkId::new("beam_4", size), &tracks, |b, tracks| {
            let compiler = SetCompiler::new(EngineSettings {
                strategy: SearchStrategy::Beam { width: 4 },
                ..EngineSettings::default()
            });
            b.iter(|| black_box(compiler.compile(tracks, &request)))
        });
    }

    group.finish();
}

/// Benchmark pairwise scoring (the inner loop of compilation)
fn bench_score_transition(c: &mut Criterion) {
    let tracks = pool(64);

    c.bench_function("score_transition_64x64", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for a in &tracks {
                for t in &tracks {
                    total += score_transition(black_box(a), black_box(t));
                }
            }
            black_box(total)
        })
    });
}

/// Benchmark neighbour set construction for the whole wheel
fn bench_neighbors(c: &mut Criterion) {
    let wheel = CamelotKey::all();

    c.bench_function("camelot_neighbors", |b| {
        b.iter(|| {
            let mut count = 0;
            for key in &wheel {
                count += black_box(*key).neighbors().len();
            }
            black_box(count)
        })
    });
}

/// Benchmark curve interpolation for long sets
fn bench_spread_curve(c: &mut Criterion) {
    let curve = EnergyProfile::peak().curve;

    c.bench_function("spread_curve_200", |b| {
        b.iter(|| black_box(spread_curve(black_box(200), &curve)))
    });
}

criterion_group!(
    benches,
    bench_compile,
    bench_score_transition,
    bench_neighbors,
    bench_spread_curve,
);
criterion_main!(benches);
