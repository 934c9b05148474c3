//! PlayerShell - one song player
//!
//! Owns the session, its analysis graph and the renderer, and is the only
//! thing a host talks to. The host drives it with two calls per refresh:
//! `tick()` to collect playback events and `animation_frame()` to paint.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use super::props::PlayerProps;
use super::share::{GiftPayload, SharePayload};
use crate::analysis::AnalysisGraph;
use crate::media::{
    format_time, MediaBackend, MediaSession, PlayRequest, PlaybackState, ProgressState,
    SessionEvent, SessionHooks,
};
use crate::progress_track::ProgressTrack;
use crate::visual::{AnimationLoop, FrameScheduler, IdlePattern, Renderer, SpectrumRenderer, Surface};
use crate::PlayerConfig;

/// Host notifications, fired once per play and once per pause transition
pub type PlayerHooks = SessionHooks;

/// Result of a play request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Audio is running
    Playing,
    /// The backend answers later; watch `tick()` for `SessionEvent::Started`
    Pending,
    /// Refused or impossible right now; the user can try again
    Blocked,
}

/// Everything a mounted player holds on to
pub struct PlayerResources<B: MediaBackend, S: Surface> {
    pub session: MediaSession<B>,
    pub graph: AnalysisGraph,
    pub renderer: SpectrumRenderer<S>,
    pub scheduler: FrameScheduler,
    pub animation: AnimationLoop,
    pub idle: IdlePattern,
    released: bool,
}

impl<B: MediaBackend, S: Surface> PlayerResources<B, S> {
    /// Build the resources and start loading `source_url`
    pub fn acquire(
        backend: B,
        surface: S,
        source_url: &str,
        hooks: PlayerHooks,
        config: &PlayerConfig,
    ) -> Self {
        let mut session = MediaSession::new(backend)
            .with_hooks(hooks)
            .with_load_timeout(config.load_timeout);
        if !source_url.is_empty() {
            session.load(source_url);
        }

        Self {
            session,
            graph: AnalysisGraph::new(config),
            renderer: SpectrumRenderer::new(surface).height_ratio(config.bar_height_ratio),
            scheduler: FrameScheduler::new(),
            animation: AnimationLoop::new(),
            idle: new_idle_pattern(config),
            released: false,
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Tear everything down. Idempotent.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.animation.stop(&mut self.scheduler);
        self.graph.teardown();
        self.session.release();
        self.released = true;
    }
}

impl<B: MediaBackend, S: Surface> Drop for PlayerResources<B, S> {
    fn drop(&mut self) {
        self.release();
    }
}

fn new_idle_pattern(config: &PlayerConfig) -> IdlePattern {
    match config.idle_seed {
        Some(seed) => IdlePattern::from_seed(config.idle_bar_count, seed),
        None => IdlePattern::random(config.idle_bar_count),
    }
}

pub struct PlayerShell<B: MediaBackend, S: Surface> {
    props: PlayerProps,
    config: PlayerConfig,
    resources: PlayerResources<B, S>,
    track: ProgressTrack,
    /// State seen at the end of the last operation, for idle re-entry
    last_state: PlaybackState,
}

impl<B: MediaBackend, S: Surface> PlayerShell<B, S> {
    /// Mount a player and start loading `props.source_url`
    pub fn new(backend: B, surface: S, props: PlayerProps, hooks: PlayerHooks, config: PlayerConfig) -> Self {
        let resources = PlayerResources::acquire(backend, surface, &props.source_url, hooks, &config);
        let last_state = resources.session.state();
        log::debug!("player mounted: {:?}", props.title);

        Self {
            props,
            config,
            resources,
            track: ProgressTrack::new(),
            last_state,
        }
    }

    pub fn props(&self) -> &PlayerProps {
        &self.props
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn state(&self) -> PlaybackState {
        self.resources.session.state()
    }

    pub fn progress(&self) -> ProgressState {
        self.resources.session.progress()
    }

    pub fn track(&self) -> &ProgressTrack {
        &self.track
    }

    pub fn session(&self) -> &MediaSession<B> {
        &self.resources.session
    }

    pub fn graph(&self) -> &AnalysisGraph {
        &self.resources.graph
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.resources.scheduler
    }

    pub fn idle_pattern(&self) -> &IdlePattern {
        &self.resources.idle
    }

    pub fn surface(&self) -> &S {
        self.resources.renderer.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.resources.renderer.surface_mut()
    }

    pub fn is_mounted(&self) -> bool {
        !self.resources.is_released()
    }

    /// Start playback
    ///
    /// The analysis graph is built and its context resumed before the
    /// session is asked to play, so the first audible frame is analysed.
    pub fn play(&mut self) -> PlayOutcome {
        if !self.is_mounted() {
            return PlayOutcome::Blocked;
        }
        let r = &mut self.resources;

        r.graph.ensure_built(&mut r.session);
        if let Err(err) = r.graph.resume_if_suspended() {
            log::warn!("play blocked: {}", err);
            return PlayOutcome::Blocked;
        }

        let outcome = match r.session.play() {
            Ok(PlayRequest::Started) => {
                r.animation.start(&mut r.scheduler);
                PlayOutcome::Playing
            }
            Ok(PlayRequest::Pending) => PlayOutcome::Pending,
            Err(err) => {
                log::warn!("play blocked: {}", err);
                PlayOutcome::Blocked
            }
        };
        self.observe_state();
        outcome
    }

    /// Stop playback and the frame loop
    pub fn pause(&mut self) {
        let r = &mut self.resources;
        r.session.pause();
        r.animation.stop(&mut r.scheduler);
        self.observe_state();
    }

    /// Play when stopped, pause when playing (or about to play)
    pub fn toggle(&mut self) -> Option<PlayOutcome> {
        if self.state().is_playing() || self.resources.session.is_play_pending() {
            self.pause();
            None
        } else {
            Some(self.play())
        }
    }

    /// Seek to the fraction `x / width` of the progress track
    pub fn seek_to_click(&mut self, x: f64, width: f64) -> Option<f64> {
        self.track.on_track_click(x, width, &mut self.resources.session)
    }

    /// Seek relative to the current position, clamped
    pub fn seek_by(&mut self, delta: f64) -> Option<f64> {
        let target = self.progress().current_time() + delta;
        let applied = self.resources.session.seek(target)?;
        self.track.update(&self.resources.session.progress());
        Some(applied)
    }

    /// Collect backend events and react to them
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        let r = &mut self.resources;
        let events = r.session.pump();

        for event in &events {
            match event {
                SessionEvent::Ready { .. } if self.config.eager_analysis => {
                    r.graph.ensure_built(&mut r.session);
                }
                SessionEvent::Started => r.animation.start(&mut r.scheduler),
                SessionEvent::Paused
                | SessionEvent::Ended
                | SessionEvent::LoadFailed(_)
                | SessionEvent::LoadTimedOut => {
                    if !r.session.state().is_playing() {
                        r.animation.stop(&mut r.scheduler);
                    }
                }
                _ => {}
            }
        }

        self.track.update(&self.resources.session.progress());
        self.observe_state();
        events
    }

    /// Paint one refresh
    ///
    /// `elapsed` is the host clock since mount and only drives the idle
    /// pulse. The spectrum is painted only for the loop's own frame, and the
    /// loop only continues while Playing.
    pub fn animation_frame(&mut self, elapsed: Duration) {
        let state = self.state();
        let r = &mut self.resources;

        let mut spectrum_frame = false;
        for fired in r.scheduler.take_due() {
            if r.animation.accept(fired) && state.is_playing() {
                spectrum_frame = true;
            }
        }

        if spectrum_frame {
            if r.graph.is_built() {
                r.renderer.render(r.graph.snapshot());
            } else {
                r.renderer.render_idle(&r.idle, elapsed);
            }
            r.animation.reschedule(&mut r.scheduler);
        } else if state.shows_idle_pattern() && !r.is_released() {
            r.renderer.render_idle(&r.idle, elapsed);
        }
    }

    /// Switch to a new source. The old graph belongs to the old source.
    pub fn load(&mut self, source_url: &str) {
        if !self.is_mounted() {
            return;
        }
        let r = &mut self.resources;
        r.animation.stop(&mut r.scheduler);
        r.graph.teardown();
        r.session.load(source_url);
        self.props.source_url = source_url.to_string();
        self.track.update(&r.session.progress());
        self.observe_state();
    }

    /// Release everything; the player is inert afterwards
    pub fn unmount(&mut self) {
        if self.is_mounted() {
            log::debug!("player unmounted: {:?}", self.props.title);
        }
        self.resources.release();
        self.last_state = PlaybackState::Idle;
    }

    pub fn current_time_label(&self) -> String {
        format_time(self.progress().current_time())
    }

    pub fn duration_label(&self) -> String {
        format_time(self.progress().duration())
    }

    /// Direct download target, if the host asked for one
    pub fn download_link(&self) -> Option<&str> {
        if self.props.show_download {
            self.props.download_url.as_deref()
        } else {
            None
        }
    }

    pub fn share_payload(&self, url: &str) -> SharePayload {
        SharePayload {
            title: self.props.title.clone(),
            url: url.to_string(),
            creator_name: self.props.name.clone(),
            theme: self.props.theme.clone(),
        }
    }

    pub fn gift_payload(&self, url: &str) -> GiftPayload {
        GiftPayload {
            song_title: self.props.title.clone(),
            song_url: url.to_string(),
            creator_name: self.props.name.clone(),
        }
    }

    /// Fresh idle heights every time the player falls back to the pattern
    fn observe_state(&mut self) {
        let state = self.state();
        if state.shows_idle_pattern() && !self.last_state.shows_idle_pattern() {
            match self.config.idle_seed {
                Some(seed) => self.resources.idle.reseed(&mut StdRng::seed_from_u64(seed)),
                None => self.resources.idle.reseed(&mut rand::rng()),
            }
        }
        self.last_state = state;
    }
}
