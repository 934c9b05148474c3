//! DeviceBackend - decoded file played through the default output device
//!
//! Threads:
//! - a one-shot decode thread per `set_source`, reporting through a ring
//! - the cpal output callback, controlled through a command ring and
//!   reporting its playhead through atomics
//!
//! The session side only ever pops from rings and reads atomics, so
//! `poll_event` never blocks.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};

use super::backend::{AnalysisSource, BackendEvent, ContextState, MediaBackend, PlayRequest, ProcessingContext};
use super::decode::{decode_file, PcmTrack};
use super::MediaError;
use crate::analysis::tap::{sample_tap, SampleTap, TapWriter};

const MAX_BLOCK_SIZE: usize = 2048;
/// Samples buffered between the output callback and the analyser
const TAP_CAPACITY: usize = 16_384;
/// Cadence of time-advanced events, roughly what media elements use
const TIME_UPDATE_INTERVAL: Duration = Duration::from_millis(250);

/// Commands sent to the output callback
#[derive(Debug, Clone, Copy)]
enum TransportCommand {
    Play,
    Pause,
    /// Jump to a position in source frames
    Seek(f64),
}

/// Playhead published by the output callback
struct Transport {
    /// Source-frame position as f64 bits
    position: AtomicU64,
    playing: AtomicBool,
    ended: AtomicBool,
}

impl Transport {
    fn new() -> Self {
        Self {
            position: AtomicU64::new(0f64.to_bits()),
            playing: AtomicBool::new(false),
            ended: AtomicBool::new(false),
        }
    }

    fn position(&self) -> f64 {
        f64::from_bits(self.position.load(Ordering::Acquire))
    }

    fn set_position(&self, frames: f64) {
        self.position.store(frames.to_bits(), Ordering::Release);
    }
}

/// The cpal stream, shared between the backend and its processing context
struct OutputStream {
    stream: cpal::Stream,
    running: Cell<bool>,
    closed: Cell<bool>,
}

impl OutputStream {
    fn resume(&self) -> Result<(), MediaError> {
        if self.running.get() {
            return Ok(());
        }
        self.stream
            .play()
            .map_err(|e| MediaError::PlaybackBlocked(e.to_string()))?;
        self.running.set(true);
        Ok(())
    }
}

/// Processing context backed by the output stream
struct DeviceContext {
    output: Rc<OutputStream>,
}

impl ProcessingContext for DeviceContext {
    fn state(&self) -> ContextState {
        if self.output.closed.get() {
            ContextState::Closed
        } else if self.output.running.get() {
            ContextState::Running
        } else {
            ContextState::Suspended
        }
    }

    fn resume(&mut self) -> Result<(), MediaError> {
        if self.output.closed.get() {
            return Err(MediaError::VisualizationUnsupported("context closed".into()));
        }
        self.output.resume()
    }

    fn close(&mut self) {
        self.output.closed.set(true);
    }
}

/// Everything that exists once a source has been decoded
struct Output {
    stream: Rc<OutputStream>,
    commands: Producer<TransportCommand>,
    transport: Arc<Transport>,
    /// Handed out once to the analysis graph
    tap: Option<SampleTap>,
    device_rate: f32,
    source_rate: f64,
}

impl Output {
    fn send(&mut self, command: TransportCommand) {
        if self.commands.push(command).is_err() {
            log::warn!("transport command queue full, dropping {:?}", command);
        }
    }
}

/// State owned by the output callback
struct Voice {
    samples: Arc<[f32]>,
    /// Source frames advanced per device frame
    step: f64,
    position: f64,
    playing: bool,
    commands: Consumer<TransportCommand>,
    tap: TapWriter,
    transport: Arc<Transport>,
    block: Vec<f32>,
}

impl Voice {
    fn render(&mut self, data: &mut [f32], channels: usize) {
        while let Ok(command) = self.commands.pop() {
            match command {
                TransportCommand::Play => self.playing = true,
                TransportCommand::Pause => self.playing = false,
                TransportCommand::Seek(frames) => self.position = frames,
            }
        }

        let total_frames = data.len() / channels;
        let mut frames_written = 0;
        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            let block = &mut self.block[..frames_to_render];

            for out in block.iter_mut() {
                *out = if self.playing {
                    let s = sample_at(&self.samples, self.position);
                    self.position += self.step;
                    if self.position >= self.samples.len() as f64 {
                        self.playing = false;
                        self.position = 0.0;
                        self.transport.ended.store(true, Ordering::Release);
                    }
                    s
                } else {
                    0.0
                };
            }

            // Mono to all channels
            let out_off = frames_written * channels;
            for (i, &s) in block.iter().enumerate() {
                for ch in 0..channels {
                    data[out_off + i * channels + ch] = s;
                }
            }

            self.tap.write(block);
            frames_written += frames_to_render;
        }

        self.transport.set_position(self.position);
        self.transport.playing.store(self.playing, Ordering::Release);
    }
}

/// Linear interpolation between neighbouring source frames
fn sample_at(samples: &[f32], position: f64) -> f32 {
    let index = position.floor() as usize;
    let frac = (position - index as f64) as f32;
    let s0 = samples.get(index).copied().unwrap_or(0.0);
    let s1 = samples.get(index + 1).copied().unwrap_or(0.0);
    s0 + (s1 - s0) * frac
}

type LoadResult = Result<PcmTrack, MediaError>;

/// Media backend playing decoded files on the default cpal device
pub struct DeviceBackend {
    source: Option<String>,
    loader: Option<Consumer<LoadResult>>,
    output: Option<Output>,
    queue: VecDeque<BackendEvent>,
    last_time_update: Instant,
    last_reported: f64,
}

impl DeviceBackend {
    pub fn new() -> Self {
        Self {
            source: None,
            loader: None,
            output: None,
            queue: VecDeque::new(),
            last_time_update: Instant::now(),
            last_reported: f64::NAN,
        }
    }

    fn open_output(&mut self, track: PcmTrack) -> Result<(), MediaError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| MediaError::Device("no default output device available".into()))?;
        let config = device
            .default_output_config()
            .map_err(|e| MediaError::Device(format!("failed to fetch default output config: {}", e)))?;

        let device_rate = config.sample_rate().0 as f32;
        let channels = config.channels().max(1) as usize;
        let source_rate = track.sample_rate() as f64;

        let (command_tx, command_rx) = RingBuffer::<TransportCommand>::new(64);
        let (tap_writer, tap) = sample_tap(TAP_CAPACITY);
        let transport = Arc::new(Transport::new());

        let mut voice = Voice {
            samples: track.samples().clone(),
            step: source_rate / device_rate as f64,
            position: 0.0,
            playing: false,
            commands: command_rx,
            tap: tap_writer,
            transport: transport.clone(),
            block: vec![0.0; MAX_BLOCK_SIZE],
        };

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| voice.render(data, channels),
                move |err| log::error!("output stream error: {}", err),
                None,
            )
            .map_err(|e| MediaError::Device(format!("failed to build output stream: {}", e)))?;

        // Some hosts start streams on creation; stay suspended until played
        if let Err(err) = stream.pause() {
            log::debug!("output stream cannot pause: {}", err);
        }

        log::info!(
            "output ready: {} Hz device, {} channels, source {} Hz",
            device_rate,
            channels,
            source_rate
        );

        self.output = Some(Output {
            stream: Rc::new(OutputStream {
                stream,
                running: Cell::new(false),
                closed: Cell::new(false),
            }),
            commands: command_tx,
            transport,
            tap: Some(tap),
            device_rate,
            source_rate,
        });
        Ok(())
    }

    /// Turn thread-side changes into events
    fn collect(&mut self) {
        if let Some(loader) = self.loader.as_mut() {
            if let Ok(result) = loader.pop() {
                self.loader = None;
                let event = match result.and_then(|track| {
                    let duration = track.duration();
                    self.open_output(track).map(|_| duration)
                }) {
                    Ok(duration) => BackendEvent::Ready { duration },
                    Err(err) => BackendEvent::Error(err.to_string()),
                };
                self.queue.push_back(event);
            }
        }

        let Some(output) = self.output.as_ref() else {
            return;
        };
        let transport = &output.transport;

        if transport.ended.swap(false, Ordering::AcqRel) {
            self.last_reported = 0.0;
            self.queue.push_back(BackendEvent::Ended);
            return;
        }

        if transport.playing.load(Ordering::Acquire)
            && self.last_time_update.elapsed() >= TIME_UPDATE_INTERVAL
        {
            let seconds = transport.position() / output.source_rate;
            self.last_time_update = Instant::now();
            if seconds != self.last_reported {
                self.last_reported = seconds;
                self.queue.push_back(BackendEvent::TimeAdvanced(seconds));
            }
        }
    }
}

impl Default for DeviceBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaBackend for DeviceBackend {
    fn set_source(&mut self, source: &str) -> Result<(), MediaError> {
        // Dropping the old output stops the old stream
        self.output = None;
        self.queue.clear();
        self.last_reported = f64::NAN;
        self.source = Some(source.to_string());

        let (mut tx, rx) = RingBuffer::<LoadResult>::new(1);
        self.loader = Some(rx);
        let owned = source.to_string();
        thread::Builder::new()
            .name("cantata-decode".into())
            .spawn(move || {
                // A full or abandoned ring means the source was replaced
                let _ = tx.push(decode_file(&owned));
            })
            .map_err(|e| MediaError::Load {
                source: source.to_string(),
                reason: format!("failed to spawn decoder: {}", e),
            })?;
        Ok(())
    }

    fn start(&mut self) -> Result<PlayRequest, MediaError> {
        let Some(output) = self.output.as_mut() else {
            return if self.loader.is_some() {
                Err(MediaError::PlaybackBlocked("source is still loading".into()))
            } else {
                Err(MediaError::NoSource)
            };
        };
        output.stream.resume()?;
        output.send(TransportCommand::Play);
        self.last_time_update = Instant::now();
        Ok(PlayRequest::Started)
    }

    fn halt(&mut self) {
        if let Some(output) = self.output.as_mut() {
            output.send(TransportCommand::Pause);
        }
    }

    fn set_position(&mut self, seconds: f64) {
        if let Some(output) = self.output.as_mut() {
            let frames = seconds.max(0.0) * output.source_rate;
            output.send(TransportCommand::Seek(frames));
            output.transport.set_position(frames);
            self.last_reported = seconds;
            self.last_time_update = Instant::now();
        }
    }

    fn poll_event(&mut self) -> Option<BackendEvent> {
        if self.queue.is_empty() {
            self.collect();
        }
        self.queue.pop_front()
    }

    fn open_analysis_source(&mut self) -> Result<AnalysisSource, MediaError> {
        let output = self.output.as_mut().ok_or_else(|| {
            MediaError::VisualizationUnsupported("no output stream yet".into())
        })?;
        let tap = output.tap.take().ok_or_else(|| {
            MediaError::VisualizationUnsupported("analysis tap already in use".into())
        })?;
        Ok(AnalysisSource {
            context: Box::new(DeviceContext {
                output: output.stream.clone(),
            }),
            tap,
            sample_rate: output.device_rate,
        })
    }

    fn release(&mut self) {
        self.loader = None;
        self.output = None;
        self.queue.clear();
        if let Some(source) = self.source.take() {
            log::debug!("released device backend for {}", source);
        }
    }
}
