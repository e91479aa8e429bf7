/*!
 * Chat platform boundary.
 *
 * The pipeline only needs two things from the chat platform: "download
 * bytes" and "send bytes with a caption". [`ChatTransport`] captures those
 * operations; the Telegram implementation lives in [`telegram`].
 */

use std::path::Path;

use async_trait::async_trait;

use crate::errors::ProviderError;

/// Platform-neutral view of one inbound message
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Conversation the message belongs to
    pub chat_id: i64,

    /// What the message carries
    pub kind: IncomingKind,
}

/// The payload kinds the bot reacts to
#[derive(Debug, Clone)]
pub enum IncomingKind {
    /// A slash command, without the leading slash
    Command(String),

    /// Free-form text (possibly a video link)
    Text(String),

    /// A downloadable attachment with its declared filename
    Attachment {
        /// Platform file handle
        file_id: String,
        /// Declared filename, used to pick the extractor
        file_name: String,
    },
}

/// Operations the pipeline needs from the chat platform
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Download an attachment's bytes to a local path
    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<(), ProviderError>;

    /// Send a plain text message
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), ProviderError>;

    /// Send a file as a downloadable document with a caption
    async fn send_document(&self, chat_id: i64, path: &Path, caption: &str) -> Result<(), ProviderError>;

    /// Send a file as a playable audio attachment with a caption
    async fn send_audio(&self, chat_id: i64, path: &Path, caption: &str) -> Result<(), ProviderError>;
}

pub mod telegram;
