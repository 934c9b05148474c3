// Purpose - the playable resource, its state machine, and progress bookkeeping

pub mod backend;
pub mod decode;
pub mod device;
pub mod error;
pub mod progress;
pub mod session;

pub use backend::{AnalysisSource, BackendEvent, ContextState, MediaBackend, PlayRequest, ProcessingContext};
pub use device::DeviceBackend;
pub use error::MediaError;
pub use progress::{format_time, ProgressState};
pub use session::{MediaSession, SessionEvent, SessionHooks};

/// Lifecycle of a media session. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No source assigned
    #[default]
    Idle,
    /// Source assigned, waiting for metadata
    Loading,
    /// Duration known, not started yet
    Ready,
    Playing,
    Paused,
    /// Reached the end; position has been rewound to 0
    Ended,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        self == PlaybackState::Playing
    }

    /// States in which the surface shows the idle pattern
    pub fn shows_idle_pattern(self) -> bool {
        !matches!(self, PlaybackState::Playing | PlaybackState::Loading)
    }

    pub fn label(self) -> &'static str {
        match self {
            PlaybackState::Idle => "Idle",
            PlaybackState::Loading => "Loading",
            PlaybackState::Ready => "Ready",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Ended => "Ended",
        }
    }
}
