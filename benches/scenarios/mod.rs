//! Whole-frame benchmarks.
//!
//! These drive a mounted player the way a host does on every refresh.

mod frame;

pub use frame::bench_frame;
