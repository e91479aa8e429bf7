/*!
 * Error types for the dubwai application.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to an external HTTP service
/// (translation, speech synthesis, chat platform)
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that occur when no content could be fetched or extracted
/// from the inbound document, audio clip or video link
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// The video link produced no audio track
    #[error("No audio track could be retrieved from {url}")]
    NoAudioTrack {
        /// The link that was requested
        url: String
    },

    /// Downloading the media failed before any track was produced
    #[error("Media download failed: {0}")]
    Download(String),

    /// The document parsed but yielded no text at all
    #[error("No text could be extracted from the input")]
    EmptyDocument,

    /// The document payload could not be parsed
    #[error("Unreadable document: {0}")]
    Unreadable(String),
}

/// Errors raised by audio transcoding (ffmpeg)
#[derive(Error, Debug)]
pub enum ConversionError {
    /// ffmpeg could not be launched at all
    #[error("Failed to launch ffmpeg: {0}")]
    Spawn(String),

    /// ffmpeg exited with a failure status
    #[error("Audio transcode failed: {0}")]
    Transcode(String),

    /// ffmpeg did not finish within the allotted time
    #[error("Audio transcode timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationServiceError {
    /// A chunk failed to translate; the whole operation is aborted
    #[error("Translation failed on chunk {index}: {source}")]
    Chunk {
        /// Zero-based index of the failing chunk
        index: usize,
        /// The underlying provider failure
        #[source]
        source: ProviderError,
    },

    /// The service answered but returned no translation
    #[error("Translation service returned an empty response")]
    EmptyResponse,
}

/// Errors that can occur during speech synthesis
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// Every utterance failed; there is no audio to return
    #[error("No utterances could be synthesized ({attempted} attempted)")]
    NoUtterances {
        /// How many utterances were attempted
        attempted: usize
    },

    /// A synthesized clip could not be decoded as audio
    #[error("Invalid audio returned by the synthesizer: {0}")]
    InvalidAudio(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from content retrieval or extraction
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// Error from audio transcoding
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Error from the translation service
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationServiceError),

    /// Error from speech synthesis
    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Error from an external provider (chat platform included)
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Short human-readable message suitable for sending back to the
    /// requesting user. Detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Retrieval(RetrievalError::EmptyDocument) => {
                "No text could be extracted from that input.".to_string()
            }
            AppError::Retrieval(_) => {
                "The media could not be retrieved. Please check the link or file.".to_string()
            }
            AppError::Conversion(_) => {
                "The audio could not be converted for processing.".to_string()
            }
            AppError::Translation(_) => {
                "The translation service failed. Nothing was translated.".to_string()
            }
            AppError::Synthesis(_) => {
                "Speech could not be generated for this text.".to_string()
            }
            AppError::Provider(_) | AppError::File(_) | AppError::Unknown(_) => {
                "Something went wrong while processing your request.".to_string()
            }
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
