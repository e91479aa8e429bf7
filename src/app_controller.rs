use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, Context};
use log::{debug, error, info};

use crate::app_config::{Config, Credentials};
use crate::audio;
use crate::chat::{ChatTransport, IncomingKind, IncomingMessage};
use crate::chat::telegram::{self, TelegramClient};
use crate::dispatcher;
use crate::errors::{AppError, RetrievalError};
use crate::extraction::{DocumentExtractor, media_link};
use crate::file_utils::FileManager;
use crate::language_id;
use crate::language_utils;
use crate::providers::{SpeechProvider, TranslationProvider};
use crate::providers::deepl::DeepL;
use crate::providers::tts::TtsClient;
use crate::synthesis::SpeechSynthesizer;
use crate::transcription::{TranscriptionEngine, WhisperTranscriber};
use crate::translation::TranslationService;

// @module: Request handling and pipeline orchestration

/// Wait before polling again after a transport failure
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Main application controller.
///
/// Owns the pipeline services; the model-backed ones are created once at
/// startup and reused read-only across requests. Each request runs inside
/// its own temporary working directory.
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Input normalization (documents, audio, links)
    extractor: DocumentExtractor,

    // @field: Chunked translation
    translator: TranslationService,

    // @field: Sentence-level synthesis
    synthesizer: SpeechSynthesizer,
}

impl Controller {
    /// Create a controller with real services built from the configuration
    /// and credentials. Loads the speech-to-text model, which can take a
    /// while on first start.
    pub fn new(config: Config, credentials: &Credentials) -> Result<Self> {
        let transcriber: Arc<dyn TranscriptionEngine> = Arc::new(
            WhisperTranscriber::new(&config.transcription, &config.source_language)
                .context("Failed to initialize the transcription engine")?,
        );

        let translation_provider: Arc<dyn TranslationProvider> = Arc::new(DeepL::new(
            credentials.translation_api_key.clone(),
            config.translation.endpoint.clone(),
            config.translation.timeout_secs,
        ));

        let speech_provider: Arc<dyn SpeechProvider> = Arc::new(TtsClient::new(
            config.speech.endpoint.clone(),
            config.speech.timeout_secs,
        ));

        Ok(Self::with_services(config, transcriber, translation_provider, speech_provider))
    }

    /// Create a controller from externally supplied services
    pub fn with_services(
        config: Config,
        transcriber: Arc<dyn TranscriptionEngine>,
        translation_provider: Arc<dyn TranslationProvider>,
        speech_provider: Arc<dyn SpeechProvider>,
    ) -> Self {
        let extractor = DocumentExtractor::new(transcriber);
        let translator = TranslationService::new(
            translation_provider,
            config.translation.max_chars_per_request,
        );
        let synthesizer = SpeechSynthesizer::new(
            speech_provider,
            config.speech.clone(),
            &config.target_language,
        );

        Self { config, extractor, translator, synthesizer }
    }

    /// Long-poll the chat platform and handle updates one at a time.
    ///
    /// A failing request only affects its own chat; the loop itself never
    /// exits on request errors.
    pub async fn run(&self, chat: &TelegramClient) -> Result<()> {
        info!("Bot is up, waiting for messages");

        let mut offset = 0_i64;
        loop {
            let updates = match chat.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    error!("Polling failed: {}", e);
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);

                let Some(message) = &update.message else { continue };
                let Some(incoming) = telegram::into_incoming(message) else { continue };
                self.handle_incoming(chat, incoming).await;
            }
        }
    }

    /// Handle one inbound message. Errors are reported to the requesting
    /// user as a short message and logged with full detail; they never
    /// propagate out of the handler.
    pub async fn handle_incoming(&self, chat: &dyn ChatTransport, incoming: IncomingMessage) {
        let chat_id = incoming.chat_id;

        let result = match incoming.kind {
            IncomingKind::Command(command) => self.handle_command(chat, chat_id, &command).await,
            IncomingKind::Text(text) => {
                if media_link::is_video_link(&text) {
                    let _ = chat.send_text(chat_id, "Processing the video link...").await;
                    self.process_link(chat, chat_id, &text).await
                } else {
                    chat.send_text(chat_id, "Please send a file or a video link.")
                        .await
                        .map_err(AppError::from)
                }
            }
            IncomingKind::Attachment { file_id, file_name } => {
                let _ = chat.send_text(chat_id, "Downloading the file...").await;
                self.process_attachment(chat, chat_id, &file_id, &file_name).await
            }
        };

        if let Err(e) = result {
            error!("Request in chat {} failed: {}", chat_id, e);
            let _ = chat.send_text(chat_id, &e.user_message()).await;
        }
    }

    async fn handle_command(
        &self,
        chat: &dyn ChatTransport,
        chat_id: i64,
        command: &str,
    ) -> Result<(), AppError> {
        match command {
            "start" => {
                let target = language_utils::get_language_name(&self.config.target_language)
                    .unwrap_or_else(|_| self.config.target_language.clone());
                let greeting = format!(
                    "Hello! Send me a file (PDF, DOCX, TXT, MP3, WAV) or a video link \
                     and I will dub it into spoken {}.",
                    target
                );
                chat.send_text(chat_id, &greeting).await?;
            }
            _ => {
                chat.send_text(chat_id, "Unknown command. Try /start.").await?;
            }
        }
        Ok(())
    }

    /// Download an attachment into a fresh working directory and run the
    /// pipeline on it
    pub async fn process_attachment(
        &self,
        chat: &dyn ChatTransport,
        chat_id: i64,
        file_id: &str,
        file_name: &str,
    ) -> Result<(), AppError> {
        let workdir = tempfile::tempdir().map_err(|e| AppError::File(e.to_string()))?;

        // Keep only the final path component of the declared name
        let safe_name = Path::new(file_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let local_path = workdir.path().join(&safe_name);

        chat.download_file(file_id, &local_path).await?;

        let text = self.extractor.extract(&local_path, &safe_name).await?;
        self.render_and_deliver(chat, chat_id, workdir.path(), &text).await
    }

    /// Retrieve a video link's audio into a fresh working directory and run
    /// the pipeline on its transcript
    pub async fn process_link(
        &self,
        chat: &dyn ChatTransport,
        chat_id: i64,
        url: &str,
    ) -> Result<(), AppError> {
        let workdir = tempfile::tempdir().map_err(|e| AppError::File(e.to_string()))?;

        let text = self.extractor.extract_from_link(url, workdir.path()).await?;
        self.render_and_deliver(chat, chat_id, workdir.path(), &text).await
    }

    /// The output-assembly pipeline: classify, translate when the text is in
    /// the pivot language, synthesize, assemble, export, deliver.
    async fn render_and_deliver(
        &self,
        chat: &dyn ChatTransport,
        chat_id: i64,
        workdir: &Path,
        original_text: &str,
    ) -> Result<(), AppError> {
        if original_text.trim().is_empty() {
            return Err(RetrievalError::EmptyDocument.into());
        }

        let detected = language_id::classify(original_text);
        debug!("Classified input as '{}'", detected);

        let needs_translation =
            language_utils::language_codes_match(&detected, &self.config.source_language);

        let final_text = if needs_translation {
            let _ = chat.send_text(chat_id, "Translating the text...").await;
            self.translator
                .translate(original_text, &self.config.source_language, &self.config.target_language)
                .await?
        } else {
            debug!("Detected '{}' is not the pivot language, bypassing translation", detected);
            original_text.to_string()
        };

        let _ = chat
            .send_text(chat_id, "Generating speech... this can take a while.")
            .await;

        let outcome = self.synthesizer.synthesize(&final_text).await?;
        let track = audio::assemble(&outcome.segments)?;
        info!(
            "Assembled {} clip(s) into {} ms of audio ({} skipped)",
            outcome.clip_count(),
            track.duration_ms(),
            outcome.skipped.len()
        );

        let transcript_path =
            FileManager::generate_output_path("transcript", workdir, &self.config.target_language, "txt");
        FileManager::write_to_file(&transcript_path, &final_text)
            .map_err(|e| AppError::File(e.to_string()))?;

        let audio_path =
            FileManager::generate_output_path("dub", workdir, &self.config.target_language, "mp3");
        audio::export_mp3(&track, &audio_path, &self.config.speech.mp3_bitrate).await?;

        dispatcher::deliver(chat, chat_id, &transcript_path, &audio_path, outcome.skipped.len()).await
    }

    /// One-shot processing of a local file or link, without a chat
    /// transport. Artifacts land in `output_dir` and survive the call.
    pub async fn process_local(
        &self,
        input: &str,
        output_dir: &Path,
    ) -> Result<(PathBuf, PathBuf), AppError> {
        let workdir = tempfile::tempdir().map_err(|e| AppError::File(e.to_string()))?;

        let (text, stem) = if media_link::is_video_link(input) {
            let text = self.extractor.extract_from_link(input, workdir.path()).await?;
            (text, "link".to_string())
        } else {
            let path = Path::new(input);
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "file".to_string());
            let stem = path
                .file_stem()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "output".to_string());
            (self.extractor.extract(path, &file_name).await?, stem)
        };

        if text.trim().is_empty() {
            return Err(RetrievalError::EmptyDocument.into());
        }

        let detected = language_id::classify(&text);
        let needs_translation =
            language_utils::language_codes_match(&detected, &self.config.source_language);

        let final_text = if needs_translation {
            info!("Translating {} -> {}", self.config.source_language, self.config.target_language);
            self.translator
                .translate(&text, &self.config.source_language, &self.config.target_language)
                .await?
        } else {
            info!("Detected '{}', no translation needed", detected);
            text
        };

        let outcome = self.synthesizer.synthesize(&final_text).await?;
        let track = audio::assemble(&outcome.segments)?;

        FileManager::ensure_dir(output_dir).map_err(|e| AppError::File(e.to_string()))?;

        let transcript_path =
            FileManager::generate_output_path(&stem, output_dir, &self.config.target_language, "txt");
        FileManager::write_to_file(&transcript_path, &final_text)
            .map_err(|e| AppError::File(e.to_string()))?;

        let audio_path =
            FileManager::generate_output_path(&stem, output_dir, &self.config.target_language, "mp3");
        audio::export_mp3(&track, &audio_path, &self.config.speech.mp3_bitrate).await?;

        Ok((transcript_path, audio_path))
    }
}
