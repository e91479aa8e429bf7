/*!
 * # dubwai - Dubbing With AI
 *
 * A Rust library for turning documents, audio clips and video links into a
 * translated transcript plus a spoken-audio rendition.
 *
 * ## Features
 *
 * - Extract text from PDF, DOCX, plain text and HTML files
 * - Transcribe audio files and video links with Whisper
 * - Translate pivot-language text using the DeepL API, chunked to the
 *   service's request-size ceiling
 * - Synthesize sentence-level speech through a Coqui-style TTS server
 * - Assemble per-sentence clips into one MP3 track
 * - Deliver transcript and audio back through the Telegram Bot API
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration and credential management
 * - `extraction`: Input normalization (documents, audio, video links)
 * - `language_id`: Best-effort language classification
 * - `translation`: Chunked translation service
 * - `synthesis`: Sentence-level speech synthesis
 * - `audio`: Segment assembly and MP3 export
 * - `providers`: Clients for the external model services:
 *   - `providers::deepl`: DeepL API client
 *   - `providers::tts`: TTS server client
 * - `chat`: Chat platform boundary and the Telegram implementation
 * - `dispatcher`: Final delivery and transient-file cleanup
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod audio;
pub mod chat;
pub mod dispatcher;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod language_id;
pub mod language_utils;
pub mod providers;
pub mod synthesis;
pub mod transcription;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{Config, Credentials};
pub use app_controller::Controller;
pub use audio::{AudioSegment, AudioTrack, SegmentKind};
pub use synthesis::{SpeechSynthesizer, SynthesisOutcome};
pub use translation::TranslationService;
pub use language_utils::{language_codes_match, normalize_to_part1, get_language_name};
pub use errors::{
    AppError, ConversionError, ProviderError, RetrievalError, SynthesisError,
    TranslationServiceError,
};
