//! Media backend abstraction layer
//!
//! A backend is the platform's playable resource: something that can open a
//! source, start and halt output, move its playhead, and report what happened
//! since the last poll. `DeviceBackend` drives a real output device; tests
//! substitute scripted fakes.

use crate::analysis::tap::SampleTap;
use crate::media::MediaError;

/// Something a backend reports at its own cadence
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// Metadata is available
    Ready { duration: f64 },
    /// The playhead moved
    TimeAdvanced(f64),
    /// Playback ran off the end of the resource
    Ended,
    /// The resource failed to load or broke during playback
    Error(String),
    /// A play request that returned `PlayRequest::Pending` has settled
    PlayResolved(Result<(), MediaError>),
}

/// Immediate answer to a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayRequest {
    /// Output is running now
    Started,
    /// The backend will answer later with `BackendEvent::PlayResolved`
    Pending,
}

/// Run state of an audio processing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Created but not yet allowed to produce sound
    Suspended,
    Running,
    Closed,
}

/// The clocked processing environment an analysis graph lives in
pub trait ProcessingContext {
    fn state(&self) -> ContextState;

    /// Bring a suspended context to `Running`. Returns once it is running.
    fn resume(&mut self) -> Result<(), MediaError>;

    /// Release the context; further calls report `Closed`
    fn close(&mut self);
}

/// Everything needed to hang an analyser off a backend's output
pub struct AnalysisSource {
    pub context: Box<dyn ProcessingContext>,
    /// Copy of the audible output; reading it never affects playback
    pub tap: SampleTap,
    pub sample_rate: f32,
}

impl std::fmt::Debug for AnalysisSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisSource")
            .field("context", &self.context.state())
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}

/// Platform media resource
///
/// All methods must return promptly; long work (decoding, device start-up)
/// is reported later through `poll_event`.
pub trait MediaBackend {
    /// Assign a new source and begin loading it
    fn set_source(&mut self, source: &str) -> Result<(), MediaError>;

    /// Start or resume output
    fn start(&mut self) -> Result<PlayRequest, MediaError>;

    /// Stop output, keeping the playhead where it is
    fn halt(&mut self);

    /// Move the playhead (seconds, already clamped by the caller)
    fn set_position(&mut self, seconds: f64);

    /// Next pending event, if any. Never blocks.
    fn poll_event(&mut self) -> Option<BackendEvent>;

    /// Hand out the output tap and processing context for analysis
    ///
    /// Backends without analysis support return
    /// `MediaError::VisualizationUnsupported`.
    fn open_analysis_source(&mut self) -> Result<AnalysisSource, MediaError> {
        Err(MediaError::VisualizationUnsupported(
            "backend has no analysis tap".into(),
        ))
    }

    /// Drop the resource and every subscription; the backend stays silent afterwards
    fn release(&mut self);
}

/// Allow boxed backends to be used as backends (for dynamic dispatch)
impl MediaBackend for Box<dyn MediaBackend> {
    fn set_source(&mut self, source: &str) -> Result<(), MediaError> {
        (**self).set_source(source)
    }

    fn start(&mut self) -> Result<PlayRequest, MediaError> {
        (**self).start()
    }

    fn halt(&mut self) {
        (**self).halt()
    }

    fn set_position(&mut self, seconds: f64) {
        (**self).set_position(seconds)
    }

    fn poll_event(&mut self) -> Option<BackendEvent> {
        (**self).poll_event()
    }

    fn open_analysis_source(&mut self) -> Result<AnalysisSource, MediaError> {
        (**self).open_analysis_source()
    }

    fn release(&mut self) {
        (**self).release()
    }
}
