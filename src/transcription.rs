use std::path::Path;

use anyhow::{Result, anyhow, Context};
use log::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::app_config::TranscriptionConfig;
use crate::audio::WHISPER_SAMPLE_RATE;

// @module: Speech-to-text over a locally loaded Whisper model

/// Interface to a speech-to-text engine
///
/// Implementations are loaded once at startup and injected into the request
/// handler; they are read-only after initialization and safe for repeated
/// stateless invocation.
pub trait TranscriptionEngine: Send + Sync {
    /// Transcribe a 16 kHz mono WAV file and return the transcript
    fn transcribe_wav(&self, path: &Path) -> Result<String>;
}

/// Whisper-backed transcription engine
///
/// The model context is created once in [`WhisperTranscriber::new`]; each
/// call creates its own decoding state, so concurrent callers never share
/// mutable model state.
pub struct WhisperTranscriber {
    /// Loaded model context
    context: WhisperContext,

    /// Language the decoder is pinned to
    language: String,

    /// Decoder threads
    threads: usize,
}

impl WhisperTranscriber {
    /// Load the model named by the configuration
    pub fn new(config: &TranscriptionConfig, language: &str) -> Result<Self> {
        info!("Loading Whisper model from {}", config.model_path);

        let context = WhisperContext::new_with_params(
            &config.model_path,
            WhisperContextParameters::default(),
        )
        .map_err(|e| anyhow!("Failed to load Whisper model '{}': {}", config.model_path, e))?;

        Ok(Self {
            context,
            language: language.to_string(),
            threads: config.threads,
        })
    }

    /// Read a 16 kHz mono 16-bit WAV file into float samples
    fn load_samples(path: &Path) -> Result<Vec<f32>> {
        let mut reader = hound::WavReader::open(path)
            .with_context(|| format!("Failed to open WAV file: {:?}", path))?;

        let spec = reader.spec();
        if spec.sample_rate != WHISPER_SAMPLE_RATE || spec.channels != 1 {
            return Err(anyhow!(
                "Whisper input must be 16 kHz mono, got {} Hz / {} channel(s)",
                spec.sample_rate,
                spec.channels
            ));
        }

        let samples = reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<i16>, _>>()
            .context("Failed to decode WAV samples")?;

        Ok(samples.iter().map(|s| *s as f32 / 32_768.0).collect())
    }
}

impl TranscriptionEngine for WhisperTranscriber {
    fn transcribe_wav(&self, path: &Path) -> Result<String> {
        let samples = Self::load_samples(path)?;
        debug!("Transcribing {} samples from {:?}", samples.len(), path);

        let mut state = self
            .context
            .create_state()
            .map_err(|e| anyhow!("Failed to create Whisper state: {}", e))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.threads as i32);
        params.set_language(Some(&self.language));
        params.set_print_special(false);
        params.set_print_realtime(false);
        params.set_print_progress(false);
        params.set_print_timestamps(false);

        state
            .full(params, &samples)
            .map_err(|e| anyhow!("Whisper decode failed: {}", e))?;

        let mut transcript = String::new();
        for idx in 0..state.full_n_segments() {
            let Some(segment) = state.get_segment(idx) else {
                continue;
            };
            let text = segment
                .to_str_lossy()
                .map(|cow| cow.to_string())
                .unwrap_or_default();
            transcript.push_str(&text);
        }

        Ok(transcript.trim().to_string())
    }
}
