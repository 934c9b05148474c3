/// Errors raised by media sessions, backends and the analysis graph.
///
/// None of these are fatal to a player: the shell logs them and degrades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The resource could not be opened or decoded
    Load { source: String, reason: String },
    /// The resource never became ready within the configured timeout
    LoadTimedOut { source: String },
    /// The platform refused to start playback
    PlaybackBlocked(String),
    /// No analysis graph can be built for this resource
    VisualizationUnsupported(String),
    /// Play was requested before any source was loaded
    NoSource,
    /// Output device or stream failure
    Device(String),
}

impl std::fmt::Display for MediaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaError::Load { source, reason } => {
                write!(f, "Failed to load {}: {}", source, reason)
            }
            MediaError::LoadTimedOut { source } => {
                write!(f, "Timed out waiting for {} to become ready", source)
            }
            MediaError::PlaybackBlocked(reason) => write!(f, "Playback blocked: {}", reason),
            MediaError::VisualizationUnsupported(reason) => {
                write!(f, "Visualization unsupported: {}", reason)
            }
            MediaError::NoSource => write!(f, "No media source loaded"),
            MediaError::Device(reason) => write!(f, "Audio device error: {}", reason),
        }
    }
}

impl std::error::Error for MediaError {}
