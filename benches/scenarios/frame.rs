//! Benchmarks for one refresh of a playing player.
//!
//! Each iteration feeds one frame's worth of audio into the tap, then runs
//! `tick()` and `animation_frame()` exactly as a host would.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::hint::black_box;
use std::rc::Rc;
use std::time::Duration;

use cantata::analysis::{sample_tap, TapWriter};
use cantata::media::{
    AnalysisSource, BackendEvent, ContextState, MediaBackend, MediaError, PlayRequest,
    ProcessingContext,
};
use cantata::visual::{Bar, Surface};
use cantata::{PlayerConfig, PlayerHooks, PlayerProps, PlayerShell};
use criterion::{BenchmarkId, Criterion};

use crate::{FFT_SIZES, FRAME_SAMPLES};

struct AlwaysRunning;

impl ProcessingContext for AlwaysRunning {
    fn state(&self) -> ContextState {
        ContextState::Running
    }

    fn resume(&mut self) -> Result<(), MediaError> {
        Ok(())
    }

    fn close(&mut self) {}
}

/// Backend whose output tap is fed by the benchmark loop
struct LoopBackend {
    events: VecDeque<BackendEvent>,
    writer: Rc<RefCell<Option<TapWriter>>>,
}

impl MediaBackend for LoopBackend {
    fn set_source(&mut self, _source: &str) -> Result<(), MediaError> {
        self.events.push_back(BackendEvent::Ready { duration: 180.0 });
        Ok(())
    }

    fn start(&mut self) -> Result<PlayRequest, MediaError> {
        Ok(PlayRequest::Started)
    }

    fn halt(&mut self) {}

    fn set_position(&mut self, _seconds: f64) {}

    fn poll_event(&mut self) -> Option<BackendEvent> {
        self.events.pop_front()
    }

    fn open_analysis_source(&mut self) -> Result<AnalysisSource, MediaError> {
        let (writer, tap) = sample_tap(16_384);
        *self.writer.borrow_mut() = Some(writer);
        Ok(AnalysisSource {
            context: Box::new(AlwaysRunning),
            tap,
            sample_rate: 48_000.0,
        })
    }

    fn release(&mut self) {}
}

/// Surface that only sums what it is given
#[derive(Default)]
struct SumSurface {
    area: f32,
}

impl Surface for SumSurface {
    fn size(&self) -> (f32, f32) {
        (1280.0, 320.0)
    }

    fn clear(&mut self) {
        self.area = 0.0;
    }

    fn fill_bar(&mut self, bar: &Bar) {
        self.area += bar.rect.width * bar.rect.height;
    }
}

fn playing_player(
    fft_size: usize,
) -> (PlayerShell<LoopBackend, SumSurface>, Rc<RefCell<Option<TapWriter>>>) {
    let writer = Rc::new(RefCell::new(None));
    let backend = LoopBackend {
        events: VecDeque::new(),
        writer: writer.clone(),
    };
    let mut player = PlayerShell::new(
        backend,
        SumSurface::default(),
        PlayerProps::new("bench.wav", "Bench"),
        PlayerHooks::new(),
        PlayerConfig::default().fft_size(fft_size).idle_seed(1),
    );
    player.tick();
    player.play();
    (player, writer)
}

pub fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/frame");

    for &fft_size in FFT_SIZES {
        for &samples in FRAME_SAMPLES {
            let (mut player, writer) = playing_player(fft_size);
            let audio: Vec<f32> = (0..samples)
                .map(|i| (i as f32 * 0.03).sin() * 0.5)
                .collect();
            let mut elapsed = Duration::ZERO;

            group.bench_with_input(
                BenchmarkId::new(format!("fft_{}", fft_size), samples),
                &samples,
                |b, _| {
                    b.iter(|| {
                        if let Some(w) = writer.borrow_mut().as_mut() {
                            w.write(black_box(&audio));
                        }
                        black_box(player.tick());
                        elapsed += Duration::from_millis(16);
                        player.animation_frame(elapsed);
                        black_box(player.surface().area);
                    })
                },
            );
        }
    }

    // Idle pattern only: paused player
    let (mut idle_player, _) = playing_player(256);
    idle_player.pause();
    let mut elapsed = Duration::ZERO;
    group.bench_function("idle_pattern", |b| {
        b.iter(|| {
            elapsed += Duration::from_millis(16);
            idle_player.animation_frame(black_box(elapsed));
        })
    });

    group.finish();
}
