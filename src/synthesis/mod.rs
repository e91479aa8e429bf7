/*!
 * Sentence-level speech synthesis.
 *
 * Text is split into sentence-like utterances on terminal punctuation
 * (Arabic variants included), each utterance is synthesized as one clip
 * with a fixed speaker identity, and a fixed pause follows every clip.
 * A failing utterance is skipped and recorded, not fatal; only a request
 * where every utterance fails aborts with [`SynthesisError`].
 */

use std::sync::Arc;

use log::{info, warn};

use crate::app_config::SpeechConfig;
use crate::audio::AudioSegment;
use crate::errors::SynthesisError;
use crate::providers::SpeechProvider;

/// Terminal punctuation that closes an utterance. Includes the Arabic
/// question mark, comma and semicolon alongside the Latin marks.
const TERMINAL_MARKS: [char; 7] = ['.', '!', '?', '؟', '،', '؛', '…'];

/// Split text into sentence-like utterances.
///
/// An utterance ends at whitespace that follows a terminal mark; the mark
/// stays with its utterance. Runs of whitespace collapse into a single
/// boundary and blank utterances are dropped.
pub fn split_utterances(text: &str) -> Vec<String> {
    let mut units = Vec::new();
    let mut current = String::new();
    let mut after_terminal = false;

    for ch in text.chars() {
        if TERMINAL_MARKS.contains(&ch) {
            current.push(ch);
            after_terminal = true;
        } else if after_terminal && ch.is_whitespace() {
            let unit = current.trim();
            if !unit.is_empty() {
                units.push(unit.to_string());
            }
            current.clear();
            after_terminal = false;
        } else {
            after_terminal = false;
            current.push(ch);
        }
    }

    let unit = current.trim();
    if !unit.is_empty() {
        units.push(unit.to_string());
    }

    units
}

/// Diagnostic for one skipped utterance
#[derive(Debug, Clone)]
pub struct SkippedUtterance {
    /// Position of the utterance in the split sequence
    pub index: usize,

    /// Leading part of the utterance text
    pub preview: String,

    /// Why it was skipped
    pub reason: String,
}

/// What synthesis produced: the successful segments in order, plus a
/// record of every utterance that had to be skipped.
#[derive(Debug)]
pub struct SynthesisOutcome {
    /// Clip and pause segments, in utterance order
    pub segments: Vec<AudioSegment>,

    /// Diagnostics for skipped utterances
    pub skipped: Vec<SkippedUtterance>,
}

impl SynthesisOutcome {
    /// Number of successfully synthesized utterances
    pub fn clip_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_pause()).count()
    }
}

/// Sentence-level speech synthesizer
pub struct SpeechSynthesizer {
    /// Provider implementation
    provider: Arc<dyn SpeechProvider>,

    /// Speaker identity, pause length and timeouts
    config: SpeechConfig,

    /// Language tag passed to the provider
    language: String,
}

impl SpeechSynthesizer {
    /// Create a new synthesizer
    pub fn new(provider: Arc<dyn SpeechProvider>, config: SpeechConfig, language: &str) -> Self {
        Self {
            provider,
            config,
            language: language.to_string(),
        }
    }

    /// Synthesize a full text, one utterance at a time.
    ///
    /// Every successful clip is followed by one pause segment of the
    /// configured length, so a well-formed result always ends with a pause.
    pub async fn synthesize(&self, text: &str) -> Result<SynthesisOutcome, SynthesisError> {
        let utterances = split_utterances(text);
        info!("Synthesizing {} utterance(s)", utterances.len());

        let mut segments: Vec<AudioSegment> = Vec::new();
        let mut skipped: Vec<SkippedUtterance> = Vec::new();

        for (index, utterance) in utterances.iter().enumerate() {
            match self.synthesize_one(utterance).await {
                Ok(clip) => {
                    let pause = AudioSegment::silence(
                        self.config.pause_ms,
                        clip.sample_rate,
                        clip.channels,
                    );
                    segments.push(clip);
                    segments.push(pause);
                }
                Err(reason) => {
                    warn!("Skipping utterance {}: {}", index, reason);
                    skipped.push(SkippedUtterance {
                        index,
                        preview: utterance.chars().take(40).collect(),
                        reason,
                    });
                }
            }
        }

        if segments.is_empty() {
            return Err(SynthesisError::NoUtterances {
                attempted: utterances.len(),
            });
        }

        Ok(SynthesisOutcome { segments, skipped })
    }

    /// Synthesize a single utterance into a clip segment
    async fn synthesize_one(&self, utterance: &str) -> Result<AudioSegment, String> {
        let bytes = self
            .provider
            .synthesize(utterance, &self.config.speaker, &self.language)
            .await
            .map_err(|e| e.to_string())?;

        AudioSegment::from_wav_bytes(&bytes).map_err(|e| e.to_string())
    }
}
