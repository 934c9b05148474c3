//! Benchmarks for the byte-frequency analyser.

use std::hint::black_box;

use cantata::analysis::FrequencyAnalyser;
use criterion::{BenchmarkId, Criterion};

use crate::FFT_SIZES;

fn test_signal(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32 / 48_000.0;
            0.5 * (2.0 * std::f32::consts::PI * 220.0 * t).sin()
                + 0.25 * (2.0 * std::f32::consts::PI * 1760.0 * t).sin()
        })
        .collect()
}

pub fn bench_analyser(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis/analyser");

    for &size in FFT_SIZES {
        let mut analyser = FrequencyAnalyser::new(size, 0.8, -100.0, -30.0);
        let signal = test_signal(size);
        analyser.push_samples(&signal);

        group.bench_with_input(BenchmarkId::new("compute", size), &size, |b, _| {
            b.iter(|| {
                black_box(analyser.compute());
            })
        });

        group.bench_with_input(BenchmarkId::new("push_and_compute", size), &size, |b, _| {
            b.iter(|| {
                analyser.push_samples(black_box(&signal));
                black_box(analyser.compute());
            })
        });
    }

    group.finish();
}
