//! Benchmarks for the analysis and drawing path.
//!
//! Run with: cargo bench
//!
//! Everything here runs once per display refresh, so it has to fit well
//! inside a frame budget:
//!   - 60 fps  = 16.7ms
//!   - 120 fps = 8.3ms
//!
//! Benchmark groups:
//!   - analysis/*   Analyser and sample tap
//!   - scenarios/*  Whole frames through a mounted player

use criterion::{criterion_group, criterion_main};

mod analysis;
mod scenarios;

/// Analysis window sizes worth comparing (256 is the default).
pub const FFT_SIZES: &[usize] = &[256, 1024, 4096];

/// Samples arriving between two refreshes at 48kHz.
pub const FRAME_SAMPLES: &[usize] = &[800, 1600];

criterion_group!(
    benches,
    // Analysis primitives
    analysis::bench_analyser,
    analysis::bench_tap,
    // Whole frames
    scenarios::bench_frame,
);
criterion_main!(benches);
