/*!
 * Provider implementations for the external model services.
 *
 * This module contains client implementations for the services the pipeline
 * delegates inference to:
 * - DeepL: machine translation API
 * - TTS: Coqui-style speech synthesis server
 */

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::ProviderError;

/// Interface to a machine-translation service
///
/// The service enforces a request-size ceiling; callers are expected to hand
/// in pre-chunked text and never a whole document.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate one chunk of text
    ///
    /// # Arguments
    /// * `text` - The chunk to translate, within the service's size ceiling
    /// * `source_language` - ISO 639-1 source tag
    /// * `target_language` - ISO 639-1 target tag
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated chunk or an error
    async fn translate_chunk(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Interface to a speech-synthesis service
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize one utterance and return encoded WAV bytes
    ///
    /// # Arguments
    /// * `text` - The utterance to speak
    /// * `speaker` - Fixed speaker identity
    /// * `language` - ISO 639-1 tag of the utterance
    async fn synthesize(
        &self,
        text: &str,
        speaker: &str,
        language: &str,
    ) -> Result<Bytes, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod deepl;
pub mod tts;
