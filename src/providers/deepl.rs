use std::time::Duration;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use reqwest::Client;
use log::error;

use crate::errors::ProviderError;
use super::TranslationProvider;

/// DeepL client for interacting with the DeepL translation API
#[derive(Debug)]
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to the public API)
    endpoint: String,
}

/// DeepL translation request
#[derive(Debug, Serialize)]
pub struct DeepLRequest {
    /// The text entries to translate
    text: Vec<String>,

    /// Source language, uppercase two-letter code
    source_lang: String,

    /// Target language, uppercase two-letter code
    target_lang: String,
}

impl DeepLRequest {
    /// Create a new translation request for a single text entry
    pub fn new(text: impl Into<String>, source_lang: &str, target_lang: &str) -> Self {
        Self {
            text: vec![text.into()],
            source_lang: source_lang.to_uppercase(),
            target_lang: target_lang.to_uppercase(),
        }
    }
}

/// DeepL translation response
#[derive(Debug, Deserialize)]
pub struct DeepLResponse {
    /// One entry per requested text
    pub translations: Vec<DeepLTranslation>,
}

/// Individual translation in a DeepL response
#[derive(Debug, Deserialize)]
pub struct DeepLTranslation {
    /// Language the service believed the source to be
    pub detected_source_language: Option<String>,

    /// The translated text
    pub text: String,
}

impl DeepL {
    /// Create a new DeepL client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Resolve the base URL. Free-tier keys carry an `:fx` suffix and are
    /// served from a separate host.
    fn base_url(&self) -> String {
        if !self.endpoint.is_empty() {
            return self.endpoint.trim_end_matches('/').to_string();
        }

        if self.api_key.ends_with(":fx") {
            "https://api-free.deepl.com".to_string()
        } else {
            "https://api.deepl.com".to_string()
        }
    }

    /// Complete a translation request
    pub async fn complete(&self, request: DeepLRequest) -> Result<DeepLResponse, ProviderError> {
        let api_url = format!("{}/v2/translate", self.base_url());

        let response = self.client.post(&api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to send request to DeepL API: {}", e)))?;

        let status = response.status();
        if status.as_u16() == 403 {
            return Err(ProviderError::AuthenticationError(
                "DeepL rejected the API key".to_string(),
            ));
        }
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("DeepL API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let deepl_response = response.json::<DeepLResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse DeepL API response: {}", e)))?;

        Ok(deepl_response)
    }

    /// Extract the translated text from a response
    pub fn extract_text_from_response(response: &DeepLResponse) -> String {
        response.translations.iter()
            .map(|t| t.text.as_str())
            .collect()
    }
}

#[async_trait]
impl TranslationProvider for DeepL {
    async fn translate_chunk(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let request = DeepLRequest::new(text, source_language, target_language);
        let response = self.complete(request).await?;

        if response.translations.is_empty() {
            return Err(ProviderError::ParseError(
                "DeepL returned no translations".to_string(),
            ));
        }

        Ok(Self::extract_text_from_response(&response))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let api_url = format!("{}/v2/usage", self.base_url());

        let response = self.client.get(&api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to reach DeepL API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: "DeepL usage endpoint rejected the request".to_string(),
            });
        }

        Ok(())
    }
}
