use std::time::Duration;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use log::error;

use crate::errors::ProviderError;
use super::SpeechProvider;

/// Client for a Coqui-style TTS server
///
/// The server exposes a single `/api/tts` endpoint that takes the utterance,
/// a speaker identity and a language code as query parameters and answers
/// with WAV bytes.
#[derive(Debug)]
pub struct TtsClient {
    /// HTTP client for API requests
    client: Client,
    /// Server base URL
    endpoint: String,
}

impl TtsClient {
    /// Create a new TTS client
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}/api/tts", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl SpeechProvider for TtsClient {
    async fn synthesize(
        &self,
        text: &str,
        speaker: &str,
        language: &str,
    ) -> Result<Bytes, ProviderError> {
        let response = self.client.get(self.api_url())
            .query(&[
                ("text", text),
                ("speaker_id", speaker),
                ("language_id", language),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to send request to TTS server: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("TTS server error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.bytes().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to read TTS response body: {}", e)))?;

        if body.is_empty() {
            return Err(ProviderError::ParseError(
                "TTS server returned an empty body".to_string(),
            ));
        }

        Ok(body)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self.client.get(self.endpoint.trim_end_matches('/'))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to reach TTS server: {}", e)))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: "TTS server answered with a server error".to_string(),
            });
        }

        Ok(())
    }
}
