/*!
 * Google web translation endpoint.
 *
 * Uses the unauthenticated `translate_a/single` endpoint with `client=gtx`.
 * The response is a nested JSON array; the first element is a list of
 * segments whose first field is the translated text.
 */

use async_trait::async_trait;
use log::error;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{error_body, Provider, TranslationRequest};

/// Default endpoint base for the web translation API
pub const DEFAULT_GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com";

/// Client for the Google web translation endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Endpoint base URL
    endpoint: String,
}

impl GoogleTranslate {
    /// Create a new client against `endpoint`
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let endpoint = endpoint.into();
        let endpoint = if endpoint.is_empty() {
            DEFAULT_GOOGLE_ENDPOINT.to_string()
        } else {
            endpoint.trim_end_matches('/').to_string()
        };

        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint,
        }
    }

    /// Concatenate the translated segments of a response body
    pub fn extract_text(body: &Value) -> Result<String, ProviderError> {
        let segments = body
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("response has no segment list".to_string()))?;

        let text: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        if text.is_empty() {
            return Err(ProviderError::ParseError("response contains no translated text".to_string()));
        }

        Ok(text)
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let url = format!("{}/translate_a/single", self.endpoint);

        let response = self.client.get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", request.source_language.as_str()),
                ("tl", request.target_language.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded(error_body(response).await));
        }
        if !status.is_success() {
            let message = error_body(response).await;
            error!("Google API error ({}): {}", status, message);
            return Err(ProviderError::ApiError { status_code: status.as_u16(), message });
        }

        let body: Value = response.json().await?;
        Self::extract_text(&body)
    }
}
