//! Whole-file decoding with Symphonia
//!
//! Songs are short enough to hold in memory, so a source is decoded once
//! into a mono `PcmTrack` that the output callback can index freely.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::media::MediaError;

/// Decoded audio, downmixed to mono
#[derive(Debug, Clone)]
pub struct PcmTrack {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl PcmTrack {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate: sample_rate.max(1),
        }
    }

    pub fn samples(&self) -> &Arc<[f32]> {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames(&self) -> usize {
        self.samples.len()
    }

    /// Length in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Strip a `file://` prefix so plain paths and file URLs both work
pub fn source_path(source: &str) -> &Path {
    Path::new(source.strip_prefix("file://").unwrap_or(source))
}

/// Decode a whole file into memory
pub fn decode_file(source: &str) -> Result<PcmTrack, MediaError> {
    let load_err = |reason: String| MediaError::Load {
        source: source.to_string(),
        reason,
    };

    let path = source_path(source);
    let file = File::open(path).map_err(|e| load_err(e.to_string()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| load_err(format!("unrecognised format: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| load_err("no audio track".into()))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| load_err("unknown sample rate".into()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| load_err(format!("unsupported codec: {}", e)))?;

    let mut mono = Vec::new();
    // (buffer, frame capacity)
    let mut sample_buf: Option<(SampleBuffer<f32>, usize)> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(load_err(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count().max(1);
                let frames = decoded.capacity();
                if sample_buf.as_ref().map_or(true, |(_, cap)| *cap < frames) {
                    sample_buf = Some((SampleBuffer::<f32>::new(frames as u64, spec), frames));
                }
                let Some((buf, _)) = sample_buf.as_mut() else {
                    continue;
                };
                buf.copy_interleaved_ref(decoded);
                downmix_into(buf.samples(), channels, &mut mono);
            }
            Err(SymphoniaError::DecodeError(e)) => {
                // Corrupt packets are skipped, like any media player would
                log::warn!("skipping undecodable packet in {}: {}", source, e);
            }
            Err(e) => return Err(load_err(e.to_string())),
        }
    }

    if mono.is_empty() {
        return Err(load_err("no audio frames".into()));
    }

    log::info!(
        "decoded {} ({} frames @ {} Hz)",
        source,
        mono.len(),
        sample_rate
    );
    Ok(PcmTrack::new(mono, sample_rate))
}

/// Average interleaved frames down to one channel
pub fn downmix_into(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    let channels = channels.max(1);
    out.reserve(interleaved.len() / channels);
    for frame in interleaved.chunks_exact(channels) {
        out.push(frame.iter().sum::<f32>() / channels as f32);
    }
}
