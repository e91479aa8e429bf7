use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::errors::ProviderError;
use super::{ChatTransport, IncomingKind, IncomingMessage};

/// Long-poll wait passed to the platform, in seconds
const POLL_TIMEOUT_SECS: u64 = 50;

/// Telegram Bot API client
pub struct TelegramClient {
    /// HTTP client for API requests
    client: Client,
    /// Bot authentication token
    token: String,
    /// API base URL (overridable for tests)
    base_url: String,
}

/// Envelope every Bot API response arrives in
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    description: Option<String>,
    result: Option<T>,
}

/// One long-poll update
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonic update identifier, used as the poll offset
    pub update_id: i64,

    /// The message, when the update carries one
    pub message: Option<Message>,
}

/// An inbound chat message
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Conversation the message belongs to
    pub chat: Chat,

    /// Text content
    pub text: Option<String>,

    /// Generic file attachment
    pub document: Option<DocumentAttachment>,

    /// Audio file attachment
    pub audio: Option<AudioAttachment>,

    /// Recorded voice message
    pub voice: Option<VoiceAttachment>,
}

/// Conversation metadata
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Conversation identifier
    pub id: i64,
}

/// Generic file attachment metadata
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentAttachment {
    /// Platform file handle
    pub file_id: String,
    /// Declared filename
    pub file_name: Option<String>,
}

/// Audio attachment metadata
#[derive(Debug, Clone, Deserialize)]
pub struct AudioAttachment {
    /// Platform file handle
    pub file_id: String,
    /// Declared filename
    pub file_name: Option<String>,
}

/// Voice message metadata. Voice notes carry no filename; the platform
/// records them as OGG.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceAttachment {
    /// Platform file handle
    pub file_id: String,
}

/// File path lookup result
#[derive(Debug, Deserialize)]
struct FileInfo {
    file_path: Option<String>,
}

impl TelegramClient {
    /// Create a new client for the public Bot API
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, "https://api.telegram.org")
    }

    /// Create a client against a custom API base URL
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 30))
                .build()
                .unwrap_or_default(),
            token: token.into(),
            base_url: base_url.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url.trim_end_matches('/'), self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.base_url.trim_end_matches('/'), self.token, file_path)
    }

    /// Unwrap the Bot API envelope into its payload
    fn into_result<T>(envelope: ApiEnvelope<T>) -> Result<T, ProviderError> {
        if !envelope.ok {
            return Err(ProviderError::ApiError {
                status_code: 200,
                message: envelope.description.unwrap_or_else(|| "request not ok".to_string()),
            });
        }
        envelope.result.ok_or_else(|| {
            ProviderError::ParseError("Bot API answered ok without a result".to_string())
        })
    }

    /// Long-poll for new updates after `offset`
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, ProviderError> {
        let response = self.client.get(self.method_url("getUpdates"))
            .query(&[
                ("timeout", POLL_TIMEOUT_SECS.to_string()),
                ("offset", offset.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("getUpdates failed: {}", e)))?;

        let envelope = response.json::<ApiEnvelope<Vec<Update>>>().await
            .map_err(|e| ProviderError::ParseError(format!("getUpdates response: {}", e)))?;

        Self::into_result(envelope)
    }

    /// Send a multipart request with one file part
    async fn send_file(
        &self,
        method: &str,
        field: &str,
        chat_id: i64,
        path: &Path,
        caption: &str,
    ) -> Result<(), ProviderError> {
        let bytes = tokio::fs::read(path).await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read {:?}: {}", path, e)))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part(field.to_string(), Part::bytes(bytes).file_name(file_name));

        let response = self.client.post(self.method_url(method))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("{} failed: {}", method, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Bot API error on {} ({}): {}", method, status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        Ok(())
    }
}

/// Flatten a raw update into the platform-neutral inbound message
pub fn into_incoming(message: &Message) -> Option<IncomingMessage> {
    let chat_id = message.chat.id;

    if let Some(document) = &message.document {
        return Some(IncomingMessage {
            chat_id,
            kind: IncomingKind::Attachment {
                file_id: document.file_id.clone(),
                file_name: document.file_name.clone().unwrap_or_else(|| "file".to_string()),
            },
        });
    }

    if let Some(audio) = &message.audio {
        return Some(IncomingMessage {
            chat_id,
            kind: IncomingKind::Attachment {
                file_id: audio.file_id.clone(),
                file_name: audio.file_name.clone().unwrap_or_else(|| "audio.mp3".to_string()),
            },
        });
    }

    if let Some(voice) = &message.voice {
        return Some(IncomingMessage {
            chat_id,
            kind: IncomingKind::Attachment {
                file_id: voice.file_id.clone(),
                file_name: "voice.ogg".to_string(),
            },
        });
    }

    if let Some(text) = &message.text {
        let trimmed = text.trim();
        if let Some(command) = trimmed.strip_prefix('/') {
            return Some(IncomingMessage {
                chat_id,
                kind: IncomingKind::Command(command.to_string()),
            });
        }
        if !trimmed.is_empty() {
            return Some(IncomingMessage {
                chat_id,
                kind: IncomingKind::Text(trimmed.to_string()),
            });
        }
    }

    None
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<(), ProviderError> {
        let response = self.client.get(self.method_url("getFile"))
            .query(&[("file_id", file_id)])
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("getFile failed: {}", e)))?;

        let envelope = response.json::<ApiEnvelope<FileInfo>>().await
            .map_err(|e| ProviderError::ParseError(format!("getFile response: {}", e)))?;

        let info = Self::into_result(envelope)?;
        let file_path = info.file_path.ok_or_else(|| {
            ProviderError::ParseError("getFile result carries no file_path".to_string())
        })?;

        let bytes = self.client.get(self.file_url(&file_path))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("file download failed: {}", e)))?
            .bytes()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("file download body: {}", e)))?;

        tokio::fs::write(dest, &bytes).await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to write {:?}: {}", dest, e)))?;

        Ok(())
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), ProviderError> {
        let response = self.client.post(self.method_url("sendMessage"))
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("sendMessage failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: "sendMessage rejected".to_string(),
            });
        }

        Ok(())
    }

    async fn send_document(&self, chat_id: i64, path: &Path, caption: &str) -> Result<(), ProviderError> {
        self.send_file("sendDocument", "document", chat_id, path, caption).await
    }

    async fn send_audio(&self, chat_id: i64, path: &Path, caption: &str) -> Result<(), ProviderError> {
        self.send_file("sendAudio", "audio", chat_id, path, caption).await
    }
}
