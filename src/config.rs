//! Player configuration
//!
//! Built with a fluent API, the same way the runtime builder is:
//!
//! ```
//! use cantata::PlayerConfig;
//! use std::time::Duration;
//!
//! let config = PlayerConfig::default()
//!     .fft_size(512)
//!     .idle_bar_count(32)
//!     .load_timeout(Duration::from_secs(20));
//! assert_eq!(config.bin_count(), 256);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{DEFAULT_FFT_SIZE, MAX_FFT_SIZE, MIN_FFT_SIZE};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Analysis window size; always a power of two in [32, 32768]
    pub fft_size: usize,
    /// Temporal smoothing between analysis frames (0.0-1.0)
    pub smoothing: f32,
    /// dB value mapped to magnitude 0
    pub min_db: f32,
    /// dB value mapped to magnitude 255
    pub max_db: f32,
    /// Fraction of the surface height a full-scale bar reaches
    pub bar_height_ratio: f32,
    /// Number of bars in the idle pattern
    pub idle_bar_count: usize,
    /// Fixed seed for the idle pattern (None = fresh randomness)
    pub idle_seed: Option<u64>,
    /// Give up on a source that never becomes ready (None = wait forever)
    pub load_timeout: Option<Duration>,
    /// Build the analysis graph at acquire time instead of on first play
    pub eager_analysis: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            fft_size: DEFAULT_FFT_SIZE,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
            bar_height_ratio: 0.8,
            idle_bar_count: 40,
            idle_seed: None,
            load_timeout: None,
            eager_analysis: false,
        }
    }
}

impl PlayerConfig {
    /// Set the analysis window size (rounded up to a power of two and clamped)
    pub fn fft_size(mut self, size: usize) -> Self {
        self.fft_size = size.clamp(MIN_FFT_SIZE, MAX_FFT_SIZE).next_power_of_two();
        self
    }

    pub fn smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    /// Set the dB range mapped onto 0..=255
    pub fn decibel_range(mut self, min_db: f32, max_db: f32) -> Self {
        if min_db < max_db {
            self.min_db = min_db;
            self.max_db = max_db;
        } else {
            log::warn!("ignoring empty dB range {min_db}..{max_db}");
        }
        self
    }

    pub fn bar_height_ratio(mut self, ratio: f32) -> Self {
        self.bar_height_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn idle_bar_count(mut self, count: usize) -> Self {
        self.idle_bar_count = count.max(1);
        self
    }

    pub fn idle_seed(mut self, seed: u64) -> Self {
        self.idle_seed = Some(seed);
        self
    }

    pub fn load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = Some(timeout);
        self
    }

    pub fn eager_analysis(mut self, eager: bool) -> Self {
        self.eager_analysis = eager;
        self
    }

    /// Number of magnitude bins per snapshot
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }
}
