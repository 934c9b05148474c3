//! Byte-frequency analyser
//!
//! Mirrors how a Web Audio `AnalyserNode` fills `getByteFrequencyData`:
//! the last `fft_size` samples are Blackman-windowed, transformed, smoothed
//! over time, converted to dB and mapped linearly from [min_db, max_db]
//! onto 0..=255.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use crate::PlayerConfig;

pub struct FrequencyAnalyser {
    /// Blackman window coefficients
    window: Vec<f32>,
    /// Rolling time-domain history (circular)
    history: Vec<f32>,
    write_index: usize,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes, one per bin
    smoothed: Vec<f32>,
    /// Latest byte magnitudes, one per bin
    bytes: Vec<u8>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl FrequencyAnalyser {
    /// Create an analyser
    ///
    /// # Arguments
    /// * `fft_size` - analysis window, a power of two (bins = fft_size / 2)
    /// * `smoothing` - weight of the previous frame (0.0-1.0)
    /// * `min_db`, `max_db` - dB range mapped onto 0..=255
    pub fn new(fft_size: usize, smoothing: f32, min_db: f32, max_db: f32) -> Self {
        let fft_size = fft_size.max(2);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        let window = blackman_window(fft_size);
        let bins = fft_size / 2;

        Self {
            window,
            history: vec![0.0; fft_size],
            write_index: 0,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; bins],
            bytes: vec![0; bins],
            smoothing: smoothing.clamp(0.0, 1.0),
            min_db,
            max_db,
        }
    }

    pub fn from_config(config: &PlayerConfig) -> Self {
        Self::new(config.fft_size, config.smoothing, config.min_db, config.max_db)
    }

    pub fn fft_size(&self) -> usize {
        self.history.len()
    }

    pub fn bin_count(&self) -> usize {
        self.bytes.len()
    }

    /// Append one sample to the rolling window
    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.history[self.write_index] = sample;
        self.write_index = (self.write_index + 1) % self.history.len();
    }

    pub fn push_samples(&mut self, samples: &[f32]) {
        // Only the newest fft_size samples can matter
        let start = samples.len().saturating_sub(self.history.len());
        for &s in &samples[start..] {
            self.push(s);
        }
    }

    /// Analyse the current window and return the byte magnitudes
    pub fn compute(&mut self) -> &[u8] {
        let n = self.history.len();

        // Oldest sample first, windowed
        for i in 0..n {
            let sample = self.history[(self.write_index + i) % n];
            self.scratch[i] = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.scratch);

        let scale = 1.0 / n as f32;
        let range = self.max_db - self.min_db;
        for (k, byte) in self.bytes.iter_mut().enumerate() {
            let magnitude = self.scratch[k].norm() * scale;
            let smoothed = self.smoothing * self.smoothed[k] + (1.0 - self.smoothing) * magnitude;
            // Keep the state finite so a burst of NaN input cannot poison it
            self.smoothed[k] = if smoothed.is_finite() { smoothed } else { 0.0 };

            *byte = if self.smoothed[k] > 0.0 {
                let db = 20.0 * self.smoothed[k].log10();
                (255.0 / range * (db - self.min_db)).floor().clamp(0.0, 255.0) as u8
            } else {
                0
            };
        }

        &self.bytes
    }

    /// Last computed magnitudes without recomputing
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Forget history and smoothing state
    pub fn reset(&mut self) {
        self.history.fill(0.0);
        self.smoothed.fill(0.0);
        self.bytes.fill(0);
        self.write_index = 0;
    }
}

/// Blackman window (alpha = 0.16) as used by Web Audio analysers
fn blackman_window(n: usize) -> Vec<f32> {
    let alpha = 0.16f32;
    let a0 = 0.5 * (1.0 - alpha);
    let a1 = 0.5;
    let a2 = 0.5 * alpha;
    let tau = 2.0 * std::f32::consts::PI;
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            a0 - a1 * (tau * x).cos() + a2 * (2.0 * tau * x).cos()
        })
        .collect()
}
