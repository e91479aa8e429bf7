/*!
 * Audio segments, assembly and export.
 *
 * The synthesizer produces one clip per utterance plus a fixed pause after
 * each clip. This module concatenates those segments into one continuous
 * track, dropping the trailing pause so the output does not end with dead
 * air, and exports the track to a distributable compressed format through
 * an ffmpeg subprocess.
 */

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use anyhow::{Result, anyhow, Context};
use log::{debug, error, warn};
use tokio::process::Command;

use crate::errors::ConversionError;

/// Timeout applied to every ffmpeg invocation
const FFMPEG_TIMEOUT: Duration = Duration::from_secs(120);

/// Sample rate Whisper expects at its input
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// What a segment holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// A synthesized utterance
    Clip,
    /// An inserted inter-utterance pause
    Pause,
}

/// One piece of PCM audio in the assembly sequence
#[derive(Debug, Clone)]
pub struct AudioSegment {
    /// Interleaved 16-bit PCM samples
    pub samples: Vec<i16>,

    /// Samples per second per channel
    pub sample_rate: u32,

    /// Channel count
    pub channels: u16,

    /// Clip or pause
    pub kind: SegmentKind,
}

impl AudioSegment {
    /// Decode a WAV payload into a clip segment
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))
            .context("Failed to parse WAV payload")?;

        let spec = reader.spec();
        let samples = match spec.sample_format {
            hound::SampleFormat::Int => reader
                .samples::<i16>()
                .collect::<std::result::Result<Vec<i16>, _>>()
                .context("Failed to decode integer WAV samples")?,
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
                .collect::<std::result::Result<Vec<i16>, _>>()
                .context("Failed to decode float WAV samples")?,
        };

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            kind: SegmentKind::Clip,
        })
    }

    /// Create a pause segment of the given duration
    pub fn silence(duration_ms: u64, sample_rate: u32, channels: u16) -> Self {
        let frame_count = sample_rate as u64 * duration_ms / 1000;
        Self {
            samples: vec![0; (frame_count * channels as u64) as usize],
            sample_rate,
            channels,
            kind: SegmentKind::Pause,
        }
    }

    /// Whether this segment is an inserted pause
    pub fn is_pause(&self) -> bool {
        self.kind == SegmentKind::Pause
    }

    /// Segment duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / (self.sample_rate as u64 * self.channels as u64)
    }
}

/// The assembled, continuous audio track
#[derive(Debug, Clone)]
pub struct AudioTrack {
    /// Interleaved 16-bit PCM samples
    pub samples: Vec<i16>,

    /// Samples per second per channel
    pub sample_rate: u32,

    /// Channel count
    pub channels: u16,
}

impl AudioTrack {
    /// Track duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / (self.sample_rate as u64 * self.channels as u64)
    }

    /// Write the track as a 16-bit PCM WAV file
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec)
            .with_context(|| format!("Failed to create WAV file: {:?}", path))?;
        for sample in &self.samples {
            writer.write_sample(*sample)?;
        }
        writer.finalize().context("Failed to finalize WAV file")?;

        Ok(())
    }
}

/// Concatenate segments into one track.
///
/// The synthesizer appends a pause after every clip, so a well-formed
/// sequence ends with a pause that must not reach the output. The tail is
/// only dropped after checking its kind: a non-pause tail is kept and
/// logged, real audio is never clipped on position alone.
pub fn assemble(segments: &[AudioSegment]) -> Result<AudioTrack> {
    if segments.is_empty() {
        return Err(anyhow!("Cannot assemble an empty segment sequence"));
    }

    let sample_rate = segments[0].sample_rate;
    let channels = segments[0].channels;
    for segment in segments {
        if segment.sample_rate != sample_rate || segment.channels != channels {
            return Err(anyhow!(
                "Segment format mismatch: expected {} Hz / {} ch, got {} Hz / {} ch",
                sample_rate,
                channels,
                segment.sample_rate,
                segment.channels
            ));
        }
    }

    let keep = if segments[segments.len() - 1].is_pause() {
        &segments[..segments.len() - 1]
    } else {
        warn!("Segment sequence does not end with a pause; keeping the full tail");
        segments
    };

    let total: usize = keep.iter().map(|s| s.samples.len()).sum();
    let mut samples = Vec::with_capacity(total);
    for segment in keep {
        samples.extend_from_slice(&segment.samples);
    }

    Ok(AudioTrack {
        samples,
        sample_rate,
        channels,
    })
}

/// Run ffmpeg with the given arguments, mapping failures to [`ConversionError`]
async fn run_ffmpeg(args: &[&str]) -> Result<(), ConversionError> {
    debug!("Running ffmpeg {}", args.join(" "));

    let ffmpeg_future = Command::new("ffmpeg").args(args).output();

    let result = tokio::select! {
        result = ffmpeg_future => {
            result.map_err(|e| ConversionError::Spawn(e.to_string()))?
        },
        _ = tokio::time::sleep(FFMPEG_TIMEOUT) => {
            return Err(ConversionError::Timeout(FFMPEG_TIMEOUT));
        }
    };

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let last_line = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
        error!("ffmpeg failed: {}", last_line);
        return Err(ConversionError::Transcode(last_line.to_string()));
    }

    Ok(())
}

/// Transcode any audio container into the 16 kHz mono WAV the
/// speech-to-text engine requires
pub async fn convert_to_wav(input: &Path, output: &Path) -> Result<(), ConversionError> {
    run_ffmpeg(&[
        "-y",
        "-i", input.to_str().unwrap_or_default(),
        "-ar", "16000",
        "-ac", "1",
        "-c:a", "pcm_s16le",
        output.to_str().unwrap_or_default(),
    ])
    .await
}

/// Export the track as an MP3 at the given bitrate.
///
/// The track is staged as a WAV next to the output and transcoded by
/// ffmpeg; the staging file is removed on every path.
pub async fn export_mp3(
    track: &AudioTrack,
    output: &Path,
    bitrate: &str,
) -> Result<(), ConversionError> {
    let wav_path = output.with_extension("wav");
    track
        .write_wav(&wav_path)
        .map_err(|e| ConversionError::Transcode(format!("Failed to stage WAV: {}", e)))?;

    let result = run_ffmpeg(&[
        "-y",
        "-i", wav_path.to_str().unwrap_or_default(),
        "-b:a", bitrate,
        output.to_str().unwrap_or_default(),
    ])
    .await;

    if let Err(e) = std::fs::remove_file(&wav_path) {
        warn!("Failed to remove staging WAV {:?}: {}", wav_path, e);
    }

    result
}
