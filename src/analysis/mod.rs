//! Frequency analysis of the audible output
//!
//! `tap` carries samples from the output callback, `analyser` turns them into
//! byte magnitudes, `graph` ties both to a media session.

pub mod analyser;
pub mod graph;
pub mod tap;

pub use analyser::FrequencyAnalyser;
pub use graph::{AnalysisGraph, FrequencySnapshot};
pub use tap::{sample_tap, SampleTap, TapWriter};
