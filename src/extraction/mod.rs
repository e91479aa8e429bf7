/*!
 * Input normalization: anything the bot accepts becomes plain text.
 *
 * Format-specific extractors handle PDF, word-processor documents, markup
 * and plain text; recorded audio and video links go through audio
 * transcoding and speech-to-text. An unrecognized extension yields an empty
 * string, which the caller treats as "no content", not as an error.
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use crate::audio;
use crate::errors::{AppError, RetrievalError};
use crate::file_utils::{self, FileManager, MediaKind};
use crate::transcription::TranscriptionEngine;

pub mod docx;
pub mod markup;
pub mod media_link;
pub mod pdf;

/// Turns inbound payloads into plain text
pub struct DocumentExtractor {
    /// Speech-to-text engine, loaded once and shared across requests
    transcriber: Arc<dyn TranscriptionEngine>,
}

impl DocumentExtractor {
    /// Create a new extractor around a loaded transcription engine
    pub fn new(transcriber: Arc<dyn TranscriptionEngine>) -> Self {
        Self { transcriber }
    }

    /// Extract plain text from a downloaded file.
    ///
    /// The declared filename decides the extractor; the file itself lives
    /// in the per-request working directory. An empty file or an unknown
    /// extension yields `Ok("")`.
    pub async fn extract(&self, path: &Path, declared_filename: &str) -> Result<String, AppError> {
        let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            return Ok(String::new());
        }

        let kind = file_utils::detect_media_kind(declared_filename);
        debug!("Extracting {:?} as {:?}", declared_filename, kind);

        match kind {
            MediaKind::Audio => self.extract_audio(path).await,
            MediaKind::Pdf => {
                let data = fs::read(path)?;
                Ok(pdf::extract_text(&data)?)
            }
            MediaKind::WordDocument => {
                let data = fs::read(path)?;
                Ok(docx::extract_text(&data)?)
            }
            MediaKind::PlainText => FileManager::read_to_string_lossy(path)
                .map_err(|e| AppError::File(e.to_string())),
            MediaKind::Markup => {
                let raw = FileManager::read_to_string_lossy(path)
                    .map_err(|e| AppError::File(e.to_string()))?;
                Ok(markup::strip_tags(&raw))
            }
            MediaKind::Unknown => Ok(String::new()),
        }
    }

    /// Extract the transcript of a video-sharing link.
    ///
    /// Downloads the best audio track into the working directory, then goes
    /// through the same speech-to-text call as a recorded audio file.
    pub async fn extract_from_link(&self, url: &str, workdir: &Path) -> Result<String, AppError> {
        let track = media_link::fetch_audio_track(url, workdir).await?;
        info!("Retrieved audio track {:?}", track);
        self.extract_audio(&track).await
    }

    /// Transcode if needed, then transcribe
    async fn extract_audio(&self, path: &Path) -> Result<String, AppError> {
        let wav_path = self.ensure_whisper_wav(path).await?;

        let engine = Arc::clone(&self.transcriber);
        let owned = wav_path.clone();
        let transcript = tokio::task::spawn_blocking(move || engine.transcribe_wav(&owned))
            .await
            .map_err(|e| AppError::Unknown(format!("Transcription task failed: {}", e)))??;

        if transcript.trim().is_empty() {
            return Err(RetrievalError::EmptyDocument.into());
        }

        Ok(transcript)
    }

    /// The speech-to-text engine wants 16 kHz mono 16-bit WAV. Anything
    /// else is transcoded first; conversion is a precondition of
    /// extraction, not part of it.
    async fn ensure_whisper_wav(&self, path: &Path) -> Result<PathBuf, AppError> {
        if is_whisper_ready(path) {
            return Ok(path.to_path_buf());
        }

        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let output = parent.join("speech.16k.wav");
        audio::convert_to_wav(path, &output).await?;
        Ok(output)
    }
}

/// Check the WAV header for the exact format the engine expects
fn is_whisper_ready(path: &Path) -> bool {
    let Ok(reader) = hound::WavReader::open(path) else {
        return false;
    };

    let spec = reader.spec();
    spec.sample_rate == audio::WHISPER_SAMPLE_RATE
        && spec.channels == 1
        && spec.bits_per_sample == 16
        && spec.sample_format == hound::SampleFormat::Int
}
