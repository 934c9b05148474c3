pub mod analysis; // Lazy analysis graph and byte-frequency analyser
pub mod config;
pub mod media; // Playback session, backends, progress
pub mod progress_track;
pub mod shell; // Composition root and preview groups
pub mod visual; // Bar rendering, idle pattern, frame loop

pub use config::PlayerConfig;
pub use media::{MediaError, PlaybackState, ProgressState};
pub use shell::{PlayOutcome, PlayerHooks, PlayerProps, PlayerShell};

/// Analysis window used when nothing else is configured (128 bins).
pub const DEFAULT_FFT_SIZE: usize = 256;
pub(crate) const MIN_FFT_SIZE: usize = 32;
pub(crate) const MAX_FFT_SIZE: usize = 32_768;
