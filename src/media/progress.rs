//! Playback progress
//!
//! Only the current time and duration are stored; the percentage is always
//! derived from them so the two can never disagree.

/// Position within the current resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressState {
    /// Seconds from the start, never negative
    current_time: f64,
    /// Total seconds, NaN until the resource is ready
    duration: f64,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: f64::NAN,
        }
    }
}

impl ProgressState {
    pub fn new(current_time: f64, duration: f64) -> Self {
        let mut state = Self::default();
        state.set_duration(duration);
        state.set_current_time(current_time);
        state
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Duration if it is known and positive
    pub fn known_duration(&self) -> Option<f64> {
        (self.duration.is_finite() && self.duration > 0.0).then_some(self.duration)
    }

    /// Percentage played, clamped to [0, 100]; 0 while the duration is unknown
    pub fn percentage(&self) -> f64 {
        match self.known_duration() {
            Some(duration) => (100.0 * self.current_time / duration).clamp(0.0, 100.0),
            None => 0.0,
        }
    }

    /// Record a new position. NaN is ignored, negatives become 0.
    ///
    /// The value is not clamped to the duration: time-advanced events are the
    /// source of truth and may drift slightly past the end.
    pub fn set_current_time(&mut self, seconds: f64) {
        if seconds.is_nan() {
            return;
        }
        self.current_time = seconds.max(0.0);
    }

    pub fn set_duration(&mut self, seconds: f64) {
        self.duration = if seconds.is_finite() && seconds >= 0.0 {
            seconds
        } else {
            f64::NAN
        };
    }

    /// Clamp a requested position into [0, duration] ([0, inf) while unknown)
    pub fn clamp_seek(&self, seconds: f64) -> f64 {
        let upper = if self.duration.is_finite() {
            self.duration
        } else {
            f64::INFINITY
        };
        seconds.clamp(0.0, upper)
    }

    /// Back to "nothing loaded"
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Format seconds as `M:SS` (minutes unpadded and unbounded).
///
/// Anything that is not a finite, non-negative number shows as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, secs)
}
