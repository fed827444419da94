use async_trait::async_trait;
use log::{error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{error_body, Provider, TranslationRequest};
use crate::translation::placeholders::PLACEHOLDER_PREFIX;

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// Model used for generation
    model: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    stream: bool,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: false,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions { temperature: Some(temperature) });
        self
    }
}

impl Ollama {
    /// Create a new Ollama client
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: Client::builder()
                .timeout(timeout)
                // Ollama serves HTTP/1.1
                .http1_only()
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// Build the system prompt for one locale pair
    pub fn system_prompt(source_language: &str, target_language: &str) -> String {
        let source = language_utils::get_language_name(source_language)
            .unwrap_or_else(|_| source_language.to_string());
        let target = language_utils::get_language_name(target_language)
            .unwrap_or_else(|_| target_language.to_string());

        format!(
            "You are a professional software localizer. Translate the user's text from {} to {}. \
             Tokens starting with {} are placeholders: copy them unchanged. \
             Reply with the translation only, without quotes or commentary.",
            source, target, PLACEHOLDER_PREFIX
        )
    }

    /// Exponential backoff for retry `attempt`, capped at `u64::MAX`
    pub fn backoff_ms(base_ms: u64, attempt: u32) -> u64 {
        base_ms.saturating_mul(2u64.saturating_pow(attempt))
    }

    /// Generate text from the Ollama API with retry logic
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let mut attempt = 0;

        loop {
            let result = self.send_once(&url, request).await;
            match result {
                Ok(response) => return Ok(response),
                Err(e @ (ProviderError::ConnectionError(_)
                    | ProviderError::RateLimitExceeded(_)
                    | ProviderError::ApiError { status_code: 500..=599, .. }))
                    if attempt < self.max_retries =>
                {
                    let backoff = Self::backoff_ms(self.backoff_base_ms, attempt);
                    warn!("Ollama request failed ({}), retrying in {} ms", e, backoff);
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, url: &str, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let response = self.client.post(url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimitExceeded(error_body(response).await));
        }
        if !status.is_success() {
            let message = error_body(response).await;
            error!("Ollama API error ({}): {}", status, message);
            return Err(ProviderError::ApiError { status_code: status.as_u16(), message });
        }

        response
            .json::<GenerationResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl Provider for Ollama {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let generation = GenerationRequest::new(self.model.clone(), request.text.clone())
            .system(Self::system_prompt(&request.source_language, &request.target_language))
            .temperature(0.1);

        let response = self.generate(&generation).await?;
        let text = response.response.trim();
        if text.is_empty() {
            return Err(ProviderError::ParseError("empty response from Ollama".to_string()));
        }

        Ok(text.to_string())
    }
}
