/*!
 * Chunked translation service.
 *
 * The external translation call enforces a request-size ceiling, so input
 * text is split into fixed-width chunks before submission and the chunk
 * translations are joined back in order. A failing chunk aborts the whole
 * operation; a partially translated document is never returned.
 */

use std::sync::Arc;
use log::{debug, info};

use crate::errors::TranslationServiceError;
use crate::providers::TranslationProvider;

/// Split text into chunks of at most `width` characters.
///
/// Splitting happens on character boundaries, never inside a multi-byte
/// sequence. Chunk boundaries do not respect sentence or word boundaries;
/// that is an accepted property of the wire format, not something to fix
/// here. Joining the chunks in order reproduces the input exactly.
pub fn chunk_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Translation service backed by an external provider
pub struct TranslationService {
    /// Provider implementation
    provider: Arc<dyn TranslationProvider>,

    /// Max characters submitted per provider call
    max_chars_per_request: usize,
}

impl TranslationService {
    /// Create a new translation service
    pub fn new(provider: Arc<dyn TranslationProvider>, max_chars_per_request: usize) -> Self {
        Self {
            provider,
            max_chars_per_request,
        }
    }

    /// Translate text from `source_language` to `target_language`.
    ///
    /// The text is chunked to the configured width and each chunk is
    /// submitted separately, in order. Chunk translations are concatenated
    /// with no separator. Any chunk failure aborts the whole translation.
    pub async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationServiceError> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let chunks = chunk_text(text, self.max_chars_per_request);
        info!(
            "Translating {} chars ({} -> {}) in {} chunk(s)",
            text.chars().count(),
            source_language,
            target_language,
            chunks.len()
        );

        let mut translated = String::new();
        for (index, chunk) in chunks.iter().enumerate() {
            debug!("Translating chunk {}/{}", index + 1, chunks.len());

            let piece = self
                .provider
                .translate_chunk(chunk, source_language, target_language)
                .await
                .map_err(|source| TranslationServiceError::Chunk { index, source })?;

            translated.push_str(&piece);
        }

        if translated.trim().is_empty() {
            return Err(TranslationServiceError::EmptyResponse);
        }

        Ok(translated)
    }
}
