//! Analysis primitive benchmarks.

mod analyser;
mod tap;

pub use analyser::bench_analyser;
pub use tap::bench_tap;
