//! Spectrum bar renderer
//!
//! Turns a frequency snapshot into bottom-anchored bars. Each bar is
//! `2 * width / N` wide, so the upper half of the bins falls past the right
//! edge of the surface.

use std::time::Duration;

use super::color::bar_color;
use super::idle::IdlePattern;
use super::surface::{Bar, BarKind, BarRect, Surface};
use crate::analysis::FrequencySnapshot;

/// Default share of the surface height a full-scale bar reaches
pub const DEFAULT_HEIGHT_RATIO: f32 = 0.8;

/// Per-frame drawing operations
pub trait Renderer {
    /// Paint one frame of spectrum. `None` leaves the surface untouched.
    fn render(&mut self, snapshot: Option<FrequencySnapshot<'_>>);

    /// Paint the idle pattern
    fn render_idle(&mut self, pattern: &IdlePattern, elapsed: Duration);
}

/// Bar geometry for one snapshot
pub fn spectrum_bars(
    snapshot: FrequencySnapshot<'_>,
    width: f32,
    height: f32,
    height_ratio: f32,
) -> impl Iterator<Item = Bar> + '_ {
    let n = snapshot.len();
    let bar_width = if n > 0 { width / n as f32 * 2.0 } else { 0.0 };

    snapshot.bins().iter().enumerate().map(move |(i, &m)| {
        let bar_height = m as f32 / 255.0 * height * height_ratio;
        Bar {
            rect: BarRect::from_bottom(i as f32 * bar_width, bar_width, bar_height, height),
            color: bar_color(i, n, m),
            kind: BarKind::Spectrum,
        }
    })
}

pub struct SpectrumRenderer<S: Surface> {
    surface: S,
    height_ratio: f32,
    frames_painted: u64,
}

impl<S: Surface> SpectrumRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            height_ratio: DEFAULT_HEIGHT_RATIO,
            frames_painted: 0,
        }
    }

    pub fn height_ratio(mut self, ratio: f32) -> Self {
        self.height_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Frames painted so far (spectrum and idle)
    pub fn frames_painted(&self) -> u64 {
        self.frames_painted
    }
}

impl<S: Surface> Renderer for SpectrumRenderer<S> {
    fn render(&mut self, snapshot: Option<FrequencySnapshot<'_>>) {
        let Some(snapshot) = snapshot else {
            return;
        };
        let (width, height) = self.surface.size();
        self.surface.clear();
        for bar in spectrum_bars(snapshot, width, height, self.height_ratio) {
            self.surface.fill_bar(&bar);
        }
        self.frames_painted += 1;
    }

    fn render_idle(&mut self, pattern: &IdlePattern, elapsed: Duration) {
        let (width, height) = self.surface.size();
        self.surface.clear();
        for bar in pattern.bars(elapsed, width, height) {
            self.surface.fill_bar(&bar);
        }
        self.frames_painted += 1;
    }
}
