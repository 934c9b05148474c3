//! MediaSession - playback state machine over a media backend
//!
//! The session owns the backend exclusively. It turns backend events into
//! `PlaybackState` transitions and `ProgressState` updates, and notifies the
//! host exactly once per play or pause transition.

use std::time::{Duration, Instant};

use super::backend::{AnalysisSource, BackendEvent, MediaBackend, PlayRequest};
use super::{MediaError, PlaybackState, ProgressState};

type Hook = Box<dyn FnMut()>;

/// Host notification hooks
#[derive(Default)]
pub struct SessionHooks {
    on_play: Option<Hook>,
    on_pause: Option<Hook>,
}

impl SessionHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once every time playback actually starts
    pub fn on_play(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_play = Some(Box::new(hook));
        self
    }

    /// Called once every time playback stops (pause or end of track)
    pub fn on_pause(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_pause = Some(Box::new(hook));
        self
    }

    fn fire_play(&mut self) {
        if let Some(hook) = self.on_play.as_mut() {
            hook();
        }
    }

    fn fire_pause(&mut self) {
        if let Some(hook) = self.on_pause.as_mut() {
            hook();
        }
    }
}

impl std::fmt::Debug for SessionHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHooks")
            .field("on_play", &self.on_play.is_some())
            .field("on_pause", &self.on_pause.is_some())
            .finish()
    }
}

/// What changed during a `pump`
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Ready { duration: f64 },
    Progress(ProgressState),
    /// A deferred play request resolved and playback is running
    Started,
    /// Playback stopped because the resource broke
    Paused,
    Ended,
    /// A deferred play request was refused
    PlayBlocked(MediaError),
    LoadFailed(MediaError),
    LoadTimedOut,
}

/// Playback state machine
pub struct MediaSession<B: MediaBackend> {
    backend: B,
    state: PlaybackState,
    progress: ProgressState,
    hooks: SessionHooks,
    source: Option<String>,
    /// A start request is waiting for `BackendEvent::PlayResolved`
    pending_play: bool,
    load_started: Option<Instant>,
    load_timeout: Option<Duration>,
    released: bool,
}

impl<B: MediaBackend> MediaSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: PlaybackState::Idle,
            progress: ProgressState::default(),
            hooks: SessionHooks::default(),
            source: None,
            pending_play: false,
            load_started: None,
            load_timeout: None,
            released: false,
        }
    }

    pub fn with_hooks(mut self, hooks: SessionHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Give up on sources that are not ready after `timeout` (None = never)
    pub fn with_load_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn progress(&self) -> ProgressState {
        self.progress
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_play_pending(&self) -> bool {
        self.pending_play
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn set_state(&mut self, new_state: PlaybackState) {
        if self.state != new_state {
            log::debug!("playback state {:?} -> {:?}", self.state, new_state);
            self.state = new_state;
        }
    }

    /// Assign a source and start loading it
    ///
    /// A backend refusal is logged and leaves the session in `Loading`, so the
    /// host can simply call `load` again.
    pub fn load(&mut self, source: &str) {
        if self.released {
            return;
        }
        self.pause();
        self.pending_play = false;
        self.source = Some(source.to_string());
        self.progress.reset();
        self.set_state(PlaybackState::Loading);
        self.load_started = Some(Instant::now());

        log::info!("loading {}", source);
        if let Err(err) = self.backend.set_source(source) {
            log::warn!("{}; waiting in Loading for a retry", err);
        }
    }

    /// Load the current source again (after an error or timeout)
    pub fn retry_load(&mut self) -> Result<(), MediaError> {
        let source = self.source.clone().ok_or(MediaError::NoSource)?;
        self.load(&source);
        Ok(())
    }

    /// Ask the backend to start output
    ///
    /// A refusal leaves the state untouched and is returned to the caller,
    /// who is expected to log it and let the user try again.
    pub fn play(&mut self) -> Result<PlayRequest, MediaError> {
        if self.released {
            return Err(MediaError::NoSource);
        }
        match self.state {
            PlaybackState::Idle => return Err(MediaError::NoSource),
            PlaybackState::Playing => return Ok(PlayRequest::Started),
            _ => {}
        }
        if self.pending_play {
            return Ok(PlayRequest::Pending);
        }

        match self.backend.start() {
            Ok(PlayRequest::Started) => {
                self.enter_playing();
                Ok(PlayRequest::Started)
            }
            Ok(PlayRequest::Pending) => {
                self.pending_play = true;
                Ok(PlayRequest::Pending)
            }
            Err(err) => {
                log::warn!("play rejected: {}", err);
                Err(err)
            }
        }
    }

    /// Stop output. Returns true if this was a Playing -> Paused transition.
    pub fn pause(&mut self) -> bool {
        if self.released {
            return false;
        }
        if self.pending_play {
            self.pending_play = false;
            self.backend.halt();
            log::debug!("pending play aborted by pause");
        }
        if self.state != PlaybackState::Playing {
            return false;
        }
        self.backend.halt();
        self.set_state(PlaybackState::Paused);
        self.hooks.fire_pause();
        true
    }

    /// Move the playhead, clamped to [0, duration]
    ///
    /// Ignored until the duration is known. The new time is applied
    /// immediately; later time-advanced events take over as the source of
    /// truth.
    pub fn seek(&mut self, seconds: f64) -> Option<f64> {
        if self.released || seconds.is_nan() || self.state == PlaybackState::Idle {
            return None;
        }
        self.progress.known_duration()?;
        let target = self.progress.clamp_seek(seconds);
        self.progress.set_current_time(target);
        self.backend.set_position(target);
        Some(target)
    }

    /// Hand the backend's output tap to an analysis graph
    pub fn open_analysis_source(&mut self) -> Result<AnalysisSource, MediaError> {
        if self.released {
            return Err(MediaError::VisualizationUnsupported(
                "session released".into(),
            ));
        }
        self.backend.open_analysis_source()
    }

    /// Drain pending backend events and apply them
    pub fn pump(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.released {
            return events;
        }
        while let Some(event) = self.backend.poll_event() {
            self.apply(event, &mut events);
        }
        self.check_load_timeout(&mut events);
        events
    }

    fn apply(&mut self, event: BackendEvent, events: &mut Vec<SessionEvent>) {
        match event {
            BackendEvent::Ready { duration } => {
                // A load abandoned by a timeout may still finish later
                if self.state != PlaybackState::Loading {
                    log::debug!("ignoring ready for abandoned load ({:.2}s)", duration);
                    return;
                }
                self.progress.set_duration(duration);
                self.load_started = None;
                self.set_state(PlaybackState::Ready);
                log::info!(
                    "{} ready ({:.2}s)",
                    self.source.as_deref().unwrap_or("source"),
                    duration
                );
                events.push(SessionEvent::Ready {
                    duration: self.progress.duration(),
                });
            }
            BackendEvent::TimeAdvanced(seconds) => {
                if matches!(self.state, PlaybackState::Idle | PlaybackState::Ended) {
                    return;
                }
                // The output may report once more after a pause; the position still holds
                self.progress.set_current_time(seconds);
                events.push(SessionEvent::Progress(self.progress));
            }
            BackendEvent::Ended => {
                if self.state == PlaybackState::Ended {
                    return;
                }
                let was_playing = self.state == PlaybackState::Playing;
                self.pending_play = false;
                self.set_state(PlaybackState::Ended);
                self.progress.set_current_time(0.0);
                self.backend.set_position(0.0);
                if was_playing {
                    self.hooks.fire_pause();
                }
                events.push(SessionEvent::Ended);
                events.push(SessionEvent::Progress(self.progress));
            }
            BackendEvent::Error(reason) => {
                let err = MediaError::Load {
                    source: self.source.clone().unwrap_or_default(),
                    reason,
                };
                log::warn!("{}", err);
                if self.pause() {
                    events.push(SessionEvent::Paused);
                }
                events.push(SessionEvent::LoadFailed(err));
            }
            BackendEvent::PlayResolved(result) => {
                if !self.pending_play {
                    log::debug!("ignoring stale play resolution");
                    return;
                }
                self.pending_play = false;
                match result {
                    Ok(()) => {
                        self.enter_playing();
                        events.push(SessionEvent::Started);
                    }
                    Err(err) => {
                        log::warn!("play rejected: {}", err);
                        events.push(SessionEvent::PlayBlocked(err));
                    }
                }
            }
        }
    }

    fn enter_playing(&mut self) {
        if self.state == PlaybackState::Playing {
            return;
        }
        self.set_state(PlaybackState::Playing);
        self.hooks.fire_play();
    }

    fn check_load_timeout(&mut self, events: &mut Vec<SessionEvent>) {
        if self.state != PlaybackState::Loading {
            return;
        }
        let (Some(started), Some(timeout)) = (self.load_started, self.load_timeout) else {
            return;
        };
        if started.elapsed() < timeout {
            return;
        }
        let err = MediaError::LoadTimedOut {
            source: self.source.clone().unwrap_or_default(),
        };
        log::warn!("{}", err);
        self.load_started = None;
        self.backend.halt();
        self.set_state(PlaybackState::Idle);
        events.push(SessionEvent::LoadTimedOut);
    }

    /// Drop the backend resource and all hooks. Idempotent.
    ///
    /// After release nothing reaches the host: no events, no notifications.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        if self.state == PlaybackState::Playing || self.pending_play {
            self.backend.halt();
        }
        self.backend.release();
        self.hooks = SessionHooks::default();
        self.pending_play = false;
        self.released = true;
        self.set_state(PlaybackState::Idle);
        log::debug!("media session released");
    }
}

impl<B: MediaBackend> Drop for MediaSession<B> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::format_time;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Default)]
    struct ScriptedBackend {
        events: VecDeque<BackendEvent>,
        start_result: Option<Result<PlayRequest, MediaError>>,
        position: f64,
        halts: usize,
        released: bool,
    }

    impl MediaBackend for ScriptedBackend {
        fn set_source(&mut self, _source: &str) -> Result<(), MediaError> {
            Ok(())
        }

        fn start(&mut self) -> Result<PlayRequest, MediaError> {
            self.start_result.clone().unwrap_or(Ok(PlayRequest::Started))
        }

        fn halt(&mut self) {
            self.halts += 1;
        }

        fn set_position(&mut self, seconds: f64) {
            self.position = seconds;
        }

        fn poll_event(&mut self) -> Option<BackendEvent> {
            self.events.pop_front()
        }

        fn release(&mut self) {
            self.released = true;
        }
    }

    fn counted_hooks() -> (SessionHooks, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let plays = Rc::new(Cell::new(0));
        let pauses = Rc::new(Cell::new(0));
        let hooks = SessionHooks::new()
            .on_play({
                let plays = plays.clone();
                move || plays.set(plays.get() + 1)
            })
            .on_pause({
                let pauses = pauses.clone();
                move || pauses.set(pauses.get() + 1)
            });
        (hooks, plays, pauses)
    }

    fn ready_session(duration: f64) -> MediaSession<ScriptedBackend> {
        let mut session = MediaSession::new(ScriptedBackend::default());
        session.load("song.wav");
        session
            .backend_mut()
            .events
            .push_back(BackendEvent::Ready { duration });
        session.pump();
        session
    }

    #[test]
    fn test_load_then_ready() {
        let mut session = MediaSession::new(ScriptedBackend::default());
        assert_eq!(session.state(), PlaybackState::Idle);
        session.load("song.wav");
        assert_eq!(session.state(), PlaybackState::Loading);
        assert!(session.progress().duration().is_nan());

        session
            .backend_mut()
            .events
            .push_back(BackendEvent::Ready { duration: 90.0 });
        let events = session.pump();
        assert_eq!(events, vec![SessionEvent::Ready { duration: 90.0 }]);
        assert_eq!(session.state(), PlaybackState::Ready);
        assert_eq!(session.progress().duration(), 90.0);
    }

    #[test]
    fn test_play_without_source() {
        let mut session = MediaSession::new(ScriptedBackend::default());
        assert_eq!(session.play(), Err(MediaError::NoSource));
        assert_eq!(session.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_toggle_fires_each_hook_once_per_transition() {
        let (hooks, plays, pauses) = counted_hooks();
        let mut session = ready_session(30.0).with_hooks(hooks);

        session.play().unwrap();
        session.play().unwrap(); // already playing
        assert!(session.pause());
        assert!(!session.pause()); // already paused
        session.play().unwrap();
        session.pause();

        assert_eq!(plays.get(), 2);
        assert_eq!(pauses.get(), 2);
        assert_eq!(session.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_rejected_play_keeps_state() {
        let (hooks, plays, _) = counted_hooks();
        let mut session = ready_session(30.0).with_hooks(hooks);
        session.backend_mut().start_result =
            Some(Err(MediaError::PlaybackBlocked("no gesture".into())));

        assert!(matches!(session.play(), Err(MediaError::PlaybackBlocked(_))));
        assert_eq!(session.state(), PlaybackState::Ready);
        assert_eq!(plays.get(), 0);
    }

    #[test]
    fn test_pending_play_resolves_later() {
        let (hooks, plays, _) = counted_hooks();
        let mut session = ready_session(30.0).with_hooks(hooks);
        session.backend_mut().start_result = Some(Ok(PlayRequest::Pending));

        assert_eq!(session.play(), Ok(PlayRequest::Pending));
        assert_eq!(session.state(), PlaybackState::Ready);
        assert_eq!(plays.get(), 0);

        session
            .backend_mut()
            .events
            .push_back(BackendEvent::PlayResolved(Ok(())));
        assert_eq!(session.pump(), vec![SessionEvent::Started]);
        assert_eq!(session.state(), PlaybackState::Playing);
        assert_eq!(plays.get(), 1);
    }

    #[test]
    fn test_pause_aborts_pending_play() {
        let (hooks, plays, pauses) = counted_hooks();
        let mut session = ready_session(30.0).with_hooks(hooks);
        session.backend_mut().start_result = Some(Ok(PlayRequest::Pending));
        session.play().unwrap();

        assert!(!session.pause());
        session
            .backend_mut()
            .events
            .push_back(BackendEvent::PlayResolved(Ok(())));
        assert!(session.pump().is_empty());
        assert_eq!(session.state(), PlaybackState::Ready);
        assert_eq!((plays.get(), pauses.get()), (0, 0));
    }

    #[test]
    fn test_seek_is_clamped_and_optimistic() {
        let mut session = ready_session(125.0);
        assert_eq!(session.seek(200.0), Some(125.0));
        assert_eq!(session.seek(-4.0), Some(0.0));
        assert_eq!(session.seek(62.5), Some(62.5));
        assert_eq!(session.progress().current_time(), 62.5);
        assert_eq!(session.backend().position, 62.5);
        assert_eq!(session.seek(f64::NAN), None);
    }

    #[test]
    fn test_late_time_report_after_pause_still_counts() {
        let mut session = ready_session(30.0);
        session.play().unwrap();
        session.pause();

        session
            .backend_mut()
            .events
            .push_back(BackendEvent::TimeAdvanced(4.2));
        let events = session.pump();
        assert!(matches!(events[..], [SessionEvent::Progress(_)]));
        assert_eq!(session.progress().current_time(), 4.2);
        assert_eq!(session.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_ended_rewinds_and_notifies_pause_once() {
        let (hooks, _, pauses) = counted_hooks();
        let mut session = ready_session(10.0).with_hooks(hooks);
        session.play().unwrap();
        session
            .backend_mut()
            .events
            .extend([BackendEvent::TimeAdvanced(9.9), BackendEvent::Ended, BackendEvent::Ended]);
        session.pump();

        assert_eq!(session.state(), PlaybackState::Ended);
        assert_eq!(session.progress().current_time(), 0.0);
        assert_eq!(session.progress().percentage(), 0.0);
        assert_eq!(session.backend().position, 0.0);
        assert_eq!(pauses.get(), 1);
    }

    #[test]
    fn test_error_while_loading_stays_loading() {
        let mut session = MediaSession::new(ScriptedBackend::default());
        session.load("missing.mp3");
        session
            .backend_mut()
            .events
            .push_back(BackendEvent::Error("404".into()));
        let events = session.pump();
        assert!(matches!(events[0], SessionEvent::LoadFailed(MediaError::Load { .. })));
        assert_eq!(session.state(), PlaybackState::Loading);
    }

    #[test]
    fn test_load_timeout_returns_to_idle() {
        let mut session =
            MediaSession::new(ScriptedBackend::default()).with_load_timeout(Some(Duration::ZERO));
        session.load("slow.mp3");
        assert_eq!(session.pump(), vec![SessionEvent::LoadTimedOut]);
        assert_eq!(session.state(), PlaybackState::Idle);

        session.retry_load().unwrap();
        assert_eq!(session.state(), PlaybackState::Loading);
    }

    #[test]
    fn test_ready_after_timeout_is_ignored() {
        let mut session =
            MediaSession::new(ScriptedBackend::default()).with_load_timeout(Some(Duration::ZERO));
        session.load("slow.mp3");
        assert_eq!(session.pump(), vec![SessionEvent::LoadTimedOut]);

        session
            .backend_mut()
            .events
            .push_back(BackendEvent::Ready { duration: 30.0 });
        assert!(session.pump().is_empty());
        assert_eq!(session.state(), PlaybackState::Idle);
        assert!(session.progress().duration().is_nan());
        assert_eq!(format_time(session.progress().duration()), "0:00");
        assert_eq!(session.play(), Err(MediaError::NoSource));
    }

    #[test]
    fn test_seek_before_duration_is_known() {
        let mut session = MediaSession::new(ScriptedBackend::default());
        session.load("song.wav");
        session.backend_mut().position = -1.0;

        assert_eq!(session.seek(5.0), None);
        assert_eq!(session.progress().current_time(), 0.0);
        assert_eq!(session.backend().position, -1.0);

        session
            .backend_mut()
            .events
            .push_back(BackendEvent::Ready { duration: 20.0 });
        session.pump();
        assert_eq!(session.seek(5.0), Some(5.0));
        assert_eq!(session.backend().position, 5.0);
    }

    #[test]
    fn test_no_timeout_waits_forever() {
        let mut session = MediaSession::new(ScriptedBackend::default());
        session.load("slow.mp3");
        assert!(session.pump().is_empty());
        assert_eq!(session.state(), PlaybackState::Loading);
    }

    #[test]
    fn test_release_silences_everything() {
        let (hooks, plays, pauses) = counted_hooks();
        let mut session = ready_session(10.0).with_hooks(hooks);
        session.play().unwrap();
        session.release();

        assert!(session.backend().released);
        session
            .backend_mut()
            .events
            .extend([BackendEvent::TimeAdvanced(3.0), BackendEvent::Ended]);
        assert!(session.pump().is_empty());
        assert_eq!(session.play(), Err(MediaError::NoSource));
        assert_eq!((plays.get(), pauses.get()), (1, 0));
    }
}
