use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use url::Url;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings, plus the two required
/// external credentials which only ever come from the environment.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Pivot language code (ISO 639-1); only text detected as this
    /// language is translated
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO 639-1) for translation and dubbing
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Speech synthesis config
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Speech-to-text config
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    // @field: Service URL; empty means derive from the API key kind
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Max chars per request; longer text is chunked
    #[serde(default = "default_max_chars_per_request")]
    pub max_chars_per_request: usize,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            max_chars_per_request: default_max_chars_per_request(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Speech synthesis configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeechConfig {
    // @field: TTS server URL
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    // @field: Fixed speaker identity used for every utterance
    #[serde(default = "default_speaker")]
    pub speaker: String,

    // @field: Pause inserted between utterances, in milliseconds
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    // @field: Timeout seconds per utterance request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Bitrate for the exported track
    #[serde(default = "default_mp3_bitrate")]
    pub mp3_bitrate: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            speaker: default_speaker(),
            pause_ms: default_pause_ms(),
            timeout_secs: default_timeout_secs(),
            mp3_bitrate: default_mp3_bitrate(),
        }
    }
}

/// Speech-to-text configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    // @field: Path to the Whisper ggml model file
    #[serde(default = "default_model_path")]
    pub model_path: String,

    // @field: Decoder threads
    #[serde(default = "default_threads")]
    pub threads: usize,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            threads: default_threads(),
        }
    }
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "ar".to_string()
}

fn default_max_chars_per_request() -> usize {
    10_000
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_tts_endpoint() -> String {
    "http://localhost:5002".to_string()
}

fn default_speaker() -> String {
    "Ana Florence".to_string()
}

fn default_pause_ms() -> u64 {
    400
}

fn default_mp3_bitrate() -> String {
    "192k".to_string()
}

fn default_model_path() -> String {
    "models/ggml-base.en.bin".to_string()
}

fn default_threads() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            speech: SpeechConfig::default(),
            transcription: TranscriptionConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.source_language)
            .map_err(|e| anyhow!("Invalid source language: {}", e))?;
        language_utils::validate_language_code(&self.target_language)
            .map_err(|e| anyhow!("Invalid target language: {}", e))?;

        if self.source_language == self.target_language {
            return Err(anyhow!("Source and target language must differ"));
        }

        if self.translation.max_chars_per_request == 0 {
            return Err(anyhow!("translation.max_chars_per_request must be greater than zero"));
        }

        if !self.translation.endpoint.is_empty() {
            Url::parse(&self.translation.endpoint)
                .map_err(|e| anyhow!("Invalid translation endpoint: {}", e))?;
        }

        Url::parse(&self.speech.endpoint)
            .map_err(|e| anyhow!("Invalid speech endpoint: {}", e))?;

        if self.speech.pause_ms == 0 {
            return Err(anyhow!("speech.pause_ms must be greater than zero"));
        }

        if self.speech.speaker.trim().is_empty() {
            return Err(anyhow!("speech.speaker must not be empty"));
        }

        if self.transcription.model_path.trim().is_empty() {
            return Err(anyhow!("transcription.model_path must not be empty"));
        }

        Ok(())
    }
}

/// Environment variable holding the chat platform bot token
pub const BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable holding the translation service key
pub const TRANSLATION_KEY_VAR: &str = "DEEPL_API_KEY";

/// The two required external credentials. These never live in the config
/// file; absence of either is a fatal startup error.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Chat platform bot token
    pub bot_token: String,

    /// Translation service API key
    pub translation_api_key: String,
}

impl Credentials {
    /// Read both credentials from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read both credentials through a lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup(BOT_TOKEN_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("{} must be set in the environment", BOT_TOKEN_VAR))?;

        let translation_api_key = lookup(TRANSLATION_KEY_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("{} must be set in the environment", TRANSLATION_KEY_VAR))?;

        Ok(Self { bot_token, translation_api_key })
    }
}
