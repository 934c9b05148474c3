//! Benchmarks for moving samples from the output callback to the analyser.

use std::hint::black_box;

use cantata::analysis::{sample_tap, FrequencyAnalyser};
use criterion::{BenchmarkId, Criterion};

use crate::FRAME_SAMPLES;

pub fn bench_tap(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis/tap");

    for &size in FRAME_SAMPLES {
        let (mut writer, mut tap) = sample_tap(size * 2);
        let mut analyser = FrequencyAnalyser::new(256, 0.8, -100.0, -30.0);
        let block = vec![0.1f32; size];

        group.bench_with_input(BenchmarkId::new("write_drain", size), &size, |b, _| {
            b.iter(|| {
                writer.write(black_box(&block));
                black_box(tap.drain(|s| analyser.push(s)));
            })
        });
    }

    group.finish();
}
