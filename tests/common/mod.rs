//! Shared fakes for the integration tests
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use cantata::analysis::{sample_tap, TapWriter};
use cantata::media::{
    AnalysisSource, BackendEvent, ContextState, MediaBackend, MediaError, PlayRequest,
    ProcessingContext,
};
use cantata::visual::{Bar, BarKind, Surface};
use cantata::{PlayerConfig, PlayerHooks, PlayerProps, PlayerShell};

/// Everything the fake backend did, plus knobs to steer it
#[derive(Default)]
pub struct BackendLog {
    pub calls: Vec<&'static str>,
    pub events: VecDeque<BackendEvent>,
    pub positions: Vec<f64>,
    pub duration: f64,
    pub context: Option<ContextState>,
    pub writer: Option<TapWriter>,
    pub no_analysis: bool,
    pub block_play: bool,
    pub defer_play: bool,
    /// Keep `Ready` back so the load never finishes on its own
    pub hold_ready: bool,
    pub released: bool,
}

pub type Shared = Rc<RefCell<BackendLog>>;

pub struct FakeBackend {
    shared: Shared,
}

impl FakeBackend {
    pub fn new(duration: f64) -> (Self, Shared) {
        let shared = Rc::new(RefCell::new(BackendLog {
            duration,
            ..Default::default()
        }));
        (
            Self {
                shared: shared.clone(),
            },
            shared,
        )
    }
}

struct FakeContext {
    shared: Shared,
}

impl ProcessingContext for FakeContext {
    fn state(&self) -> ContextState {
        self.shared.borrow().context.unwrap_or(ContextState::Closed)
    }

    fn resume(&mut self) -> Result<(), MediaError> {
        let mut log = self.shared.borrow_mut();
        log.calls.push("resume");
        log.context = Some(ContextState::Running);
        Ok(())
    }

    fn close(&mut self) {
        let mut log = self.shared.borrow_mut();
        log.calls.push("close");
        log.context = Some(ContextState::Closed);
    }
}

impl MediaBackend for FakeBackend {
    fn set_source(&mut self, _source: &str) -> Result<(), MediaError> {
        let mut log = self.shared.borrow_mut();
        log.calls.push("set_source");
        if !log.hold_ready {
            let duration = log.duration;
            log.events.push_back(BackendEvent::Ready { duration });
        }
        Ok(())
    }

    fn start(&mut self) -> Result<PlayRequest, MediaError> {
        let mut log = self.shared.borrow_mut();
        log.calls.push("start");
        if log.block_play {
            return Err(MediaError::PlaybackBlocked("no user gesture yet".into()));
        }
        if log.defer_play {
            return Ok(PlayRequest::Pending);
        }
        Ok(PlayRequest::Started)
    }

    fn halt(&mut self) {
        self.shared.borrow_mut().calls.push("halt");
    }

    fn set_position(&mut self, seconds: f64) {
        self.shared.borrow_mut().positions.push(seconds);
    }

    fn poll_event(&mut self) -> Option<BackendEvent> {
        self.shared.borrow_mut().events.pop_front()
    }

    fn open_analysis_source(&mut self) -> Result<AnalysisSource, MediaError> {
        let mut log = self.shared.borrow_mut();
        log.calls.push("open_analysis");
        if log.no_analysis {
            return Err(MediaError::VisualizationUnsupported("no analyser".into()));
        }
        let (writer, tap) = sample_tap(4096);
        log.writer = Some(writer);
        log.context = Some(ContextState::Suspended);
        Ok(AnalysisSource {
            context: Box::new(FakeContext {
                shared: self.shared.clone(),
            }),
            tap,
            sample_rate: 48_000.0,
        })
    }

    fn release(&mut self) {
        let mut log = self.shared.borrow_mut();
        log.calls.push("release");
        log.released = true;
    }
}

/// Surface that keeps the bars of the latest frame
#[derive(Debug)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub clears: usize,
    pub fills: usize,
    pub frame: Vec<Bar>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            clears: 0,
            fills: 0,
            frame: Vec::new(),
        }
    }

    pub fn paint_calls(&self) -> usize {
        self.clears + self.fills
    }

    pub fn all(&self, kind: BarKind) -> bool {
        !self.frame.is_empty() && self.frame.iter().all(|b| b.kind == kind)
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.frame.clear();
    }

    fn fill_bar(&mut self, bar: &Bar) {
        self.fills += 1;
        self.frame.push(*bar);
    }
}

/// Counts host notifications
#[derive(Clone, Default)]
pub struct HookCounter {
    pub plays: Rc<Cell<u32>>,
    pub pauses: Rc<Cell<u32>>,
}

impl HookCounter {
    pub fn hooks(&self) -> PlayerHooks {
        let plays = self.plays.clone();
        let pauses = self.pauses.clone();
        PlayerHooks::new()
            .on_play(move || plays.set(plays.get() + 1))
            .on_pause(move || pauses.set(pauses.get() + 1))
    }

    pub fn counts(&self) -> (u32, u32) {
        (self.plays.get(), self.pauses.get())
    }
}

pub type TestPlayer = PlayerShell<FakeBackend, RecordingSurface>;

/// A freshly mounted player, not yet ticked
///
/// `setup` runs on the backend log before the source is handed over.
pub fn mount_player(
    duration: f64,
    config: PlayerConfig,
    setup: impl FnOnce(&mut BackendLog),
) -> (TestPlayer, Shared, HookCounter) {
    let (backend, shared) = FakeBackend::new(duration);
    setup(&mut shared.borrow_mut());
    let counter = HookCounter::default();
    let player = PlayerShell::new(
        backend,
        RecordingSurface::new(256.0, 100.0),
        PlayerProps::new("https://songs.example/123.mp3", "Happy Birthday").name("Sam"),
        counter.hooks(),
        config.idle_seed(42),
    );
    (player, shared, counter)
}

/// A mounted player whose source is ready
pub fn ready_player(duration: f64) -> (TestPlayer, Shared, HookCounter) {
    let (mut player, shared, counter) = mount_player(duration, PlayerConfig::default(), |_| {});
    player.tick();
    (player, shared, counter)
}

/// Tone centred on bin `bin` of a 256-point analyser
pub fn tone(bin: usize, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * std::f32::consts::PI * bin as f32 * i as f32 / 256.0).sin())
        .collect()
}
