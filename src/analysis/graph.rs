//! AnalysisGraph - lazily built source -> analyser -> output chain
//!
//! The graph is only built from the play path, once the media resource is
//! ready. A backend that cannot provide an analysis source leaves the graph
//! absent for the lifetime of that source; absence is a normal state and
//! every consumer must handle `snapshot() == None`.

use super::analyser::FrequencyAnalyser;
use super::tap::SampleTap;
use crate::media::{ContextState, MediaBackend, MediaError, MediaSession, PlaybackState, ProcessingContext};
use crate::PlayerConfig;

/// One frame of byte magnitudes, valid until the next `snapshot()` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencySnapshot<'a> {
    bins: &'a [u8],
}

impl<'a> FrequencySnapshot<'a> {
    pub fn new(bins: &'a [u8]) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> &'a [u8] {
        self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Peak magnitude in this frame
    pub fn peak(&self) -> u8 {
        self.bins.iter().copied().max().unwrap_or(0)
    }
}

struct BuiltGraph {
    context: Box<dyn ProcessingContext>,
    tap: SampleTap,
    analyser: FrequencyAnalyser,
}

/// Lazily constructed analysis graph
pub struct AnalysisGraph {
    config: PlayerConfig,
    built: Option<BuiltGraph>,
    /// Construction failed for the current source; do not retry
    unsupported: bool,
}

impl AnalysisGraph {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            config: config.clone(),
            built: None,
            unsupported: false,
        }
    }

    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    pub fn is_unsupported(&self) -> bool {
        self.unsupported
    }

    pub fn context_state(&self) -> Option<ContextState> {
        self.built.as_ref().map(|g| g.context.state())
    }

    /// Build the graph for `session` unless it already exists
    ///
    /// Only valid from a play-triggered path (or eagerly on targets without a
    /// gesture policy). Returns whether a graph exists afterwards. Failure is
    /// logged and remembered, never propagated.
    pub fn ensure_built<B: MediaBackend>(&mut self, session: &mut MediaSession<B>) -> bool {
        if self.built.is_some() {
            return true;
        }
        if self.unsupported {
            return false;
        }
        // The resource must exist before anything can be attached to it
        if matches!(session.state(), PlaybackState::Idle | PlaybackState::Loading) {
            return false;
        }

        match session.open_analysis_source() {
            Ok(source) => {
                log::debug!(
                    "analysis graph built: fft {} @ {} Hz",
                    self.config.fft_size,
                    source.sample_rate
                );
                self.built = Some(BuiltGraph {
                    context: source.context,
                    tap: source.tap,
                    analyser: FrequencyAnalyser::from_config(&self.config),
                });
                true
            }
            Err(err) => {
                log::warn!("{}; showing the idle pattern instead", err);
                self.unsupported = true;
                false
            }
        }
    }

    /// Bring a suspended processing context to running
    ///
    /// A missing graph is not an error.
    pub fn resume_if_suspended(&mut self) -> Result<(), MediaError> {
        let Some(graph) = self.built.as_mut() else {
            return Ok(());
        };
        match graph.context.state() {
            ContextState::Running => Ok(()),
            ContextState::Suspended => {
                graph.context.resume()?;
                match graph.context.state() {
                    ContextState::Running => Ok(()),
                    state => Err(MediaError::PlaybackBlocked(format!(
                        "processing context still {:?} after resume",
                        state
                    ))),
                }
            }
            ContextState::Closed => Err(MediaError::VisualizationUnsupported(
                "processing context closed".into(),
            )),
        }
    }

    /// Current frequency magnitudes, or `None` without a graph. Never blocks.
    pub fn snapshot(&mut self) -> Option<FrequencySnapshot<'_>> {
        let BuiltGraph { tap, analyser, .. } = self.built.as_mut()?;
        tap.drain(|s| analyser.push(s));
        Some(FrequencySnapshot::new(analyser.compute()))
    }

    /// Destroy the graph (unmount or source change). A later
    /// `ensure_built` may build a fresh one.
    pub fn teardown(&mut self) {
        if let Some(mut graph) = self.built.take() {
            graph.context.close();
            log::debug!("analysis graph torn down");
        }
        self.unsupported = false;
    }
}

impl Drop for AnalysisGraph {
    fn drop(&mut self) {
        self.teardown();
    }
}
