//! Decorative idle pattern
//!
//! Shown whenever no real spectrum is available. The heights are random and
//! carry no information about the audio.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use super::color::Hsla;
use super::surface::{Bar, BarKind, BarRect};

/// Per-bar start delay of the pulse, seconds
pub const STAGGER_SECS: f32 = 0.05;
/// Length of one fade cycle, seconds
pub const PULSE_PERIOD_SECS: f32 = 1.5;

const MIN_HEIGHT: f32 = 0.2;
const MAX_HEIGHT: f32 = 0.8;
const MIN_ALPHA: f32 = 0.3;
const MAX_ALPHA: f32 = 0.7;
/// Share of each slot the bar fills; the rest is gap
const FILL: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct IdlePattern {
    /// Height of each bar as a fraction of the surface height
    heights: Vec<f32>,
}

impl IdlePattern {
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut pattern = Self {
            heights: vec![0.0; count],
        };
        pattern.reseed(rng);
        pattern
    }

    /// Deterministic pattern for tests and screenshots
    pub fn from_seed(count: usize, seed: u64) -> Self {
        Self::new(count, &mut StdRng::seed_from_u64(seed))
    }

    /// Pattern drawn from the thread-local generator
    pub fn random(count: usize) -> Self {
        Self::new(count, &mut rand::rng())
    }

    pub fn reseed<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for h in self.heights.iter_mut() {
            *h = rng.random_range(MIN_HEIGHT..=MAX_HEIGHT);
        }
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Opacity of bar `index` after `elapsed` seconds of animation
    pub fn alpha_at(index: usize, elapsed: f32) -> f32 {
        let local = elapsed - index as f32 * STAGGER_SECS;
        if local < 0.0 {
            return MIN_ALPHA;
        }
        let phase = (local / PULSE_PERIOD_SECS).fract();
        // 0 -> 1 -> 0 over one period
        let pulse = 0.5 - 0.5 * (std::f32::consts::TAU * phase).cos();
        MIN_ALPHA + (MAX_ALPHA - MIN_ALPHA) * pulse
    }

    /// Lay the pattern out on a `width` x `height` surface
    pub fn bars(&self, elapsed: Duration, width: f32, height: f32) -> impl Iterator<Item = Bar> + '_ {
        let slot = if self.heights.is_empty() {
            0.0
        } else {
            width / self.heights.len() as f32
        };
        let t = elapsed.as_secs_f32();

        self.heights.iter().enumerate().map(move |(i, &h)| Bar {
            rect: BarRect::from_bottom(i as f32 * slot, slot * FILL, h * height, height),
            color: Hsla::new(47.0, 25.0, 45.0).with_alpha(Self::alpha_at(i, t)),
            kind: BarKind::Idle,
        })
    }
}
