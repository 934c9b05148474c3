//! Clickable progress track
//!
//! Maps a click position on the track to a seek and keeps the displayed
//! fill in step with the session.

use crate::media::{MediaBackend, MediaSession};
use crate::ProgressState;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressTrack {
    progress: ProgressState,
}

impl ProgressTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the session's latest progress
    pub fn update(&mut self, progress: &ProgressState) {
        self.progress = *progress;
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn percentage(&self) -> f64 {
        self.progress.percentage()
    }

    /// Seek to the fraction `x / width` of the track
    ///
    /// Nothing happens while the duration is unknown or the track has no
    /// width. Returns the time actually applied.
    pub fn on_track_click<B: MediaBackend>(
        &mut self,
        x: f64,
        width: f64,
        session: &mut MediaSession<B>,
    ) -> Option<f64> {
        let duration = session.progress().known_duration()?;
        if width.is_nan() || width <= 0.0 || x.is_nan() {
            return None;
        }

        let applied = session.seek(x / width * duration)?;
        self.update(&session.progress());
        log::debug!("track click at {:.1}/{:.1} -> {:.2}s", x, width, applied);
        Some(applied)
    }

    /// Width of the filled part of a track `width` wide
    pub fn fill_width(&self, width: f64) -> f64 {
        width * self.percentage() / 100.0
    }

    /// Position of the handle; it sits at the end of the fill
    pub fn handle_offset(&self, width: f64) -> f64 {
        self.fill_width(width)
    }
}
