/*!
 * Translation backends.
 *
 * This module contains client implementations for the services the
 * gateway can call:
 * - Google: the public web translation endpoint (default)
 * - Ollama: a local LLM server
 * - Mock: a deterministic stand-in for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// One backend call: text plus backend-specific locale codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Masked text to translate
    pub text: String,
    /// Source language code, already remapped for the backend
    pub source_language: String,
    /// Target language code, already remapped for the backend
    pub target_language: String,
}

impl TranslationRequest {
    /// Create a new request
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Common trait for all translation backends
///
/// Implementations may fail for any reason (network, quota, malformed
/// input); callers are expected to degrade rather than abort.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short identifier used in log lines
    fn name(&self) -> &str;

    /// Translate one piece of text
    ///
    /// # Arguments
    /// * `request` - The text and locale pair to translate
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;
}

/// Read an error body without letting a second failure hide the first
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string())
}

pub mod google;
pub mod mock;
pub mod ollama;
