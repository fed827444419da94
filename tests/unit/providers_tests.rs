/*!
 * Tests for provider implementations
 */

use std::time::Duration;

use xcloc_translate::errors::ProviderError;
use xcloc_translate::providers::google::GoogleTranslate;
use xcloc_translate::providers::mock::MockProvider;
use xcloc_translate::providers::ollama::Ollama;
use xcloc_translate::providers::{Provider, TranslationRequest};

fn request(text: &str) -> TranslationRequest {
    TranslationRequest::new(text, "en", "de")
}

#[tokio::test]
async fn test_mock_working_shouldTagWithTargetLanguage() {
    let provider = MockProvider::working();
    let result = provider.translate(&request("Hello")).await.unwrap();
    assert_eq!(result, "[de] Hello");
    assert_eq!(provider.name(), "mock");
}

#[tokio::test]
async fn test_mock_intermittent_shouldFailEveryNthRequest() {
    let provider = MockProvider::intermittent(3);
    let mut results = Vec::new();
    for _ in 0..6 {
        results.push(provider.translate(&request("Hello")).await.is_ok());
    }
    assert_eq!(results, vec![true, true, false, true, true, false]);
}

#[tokio::test]
async fn test_mock_failingOn_shouldRejectOnlyThatText() {
    let provider = MockProvider::working().failing_on("Broken");
    assert!(provider.translate(&request("Fine")).await.is_ok());
    assert!(matches!(
        provider.translate(&request("Broken")).await,
        Err(ProviderError::ApiError { status_code: 400, .. })
    ));
}

#[tokio::test]
async fn test_mock_clone_shouldShareRequestLog() {
    let provider = MockProvider::working();
    let clone = provider.clone();
    clone.translate(&request("Hello")).await.unwrap();

    assert_eq!(provider.request_count(), 1);
    assert_eq!(provider.requests(), vec![request("Hello")]);
}

#[tokio::test]
async fn test_google_withUnreachableEndpoint_shouldReturnConnectionError() {
    let provider = GoogleTranslate::new("http://127.0.0.1:9", Duration::from_secs(2));
    let result = provider.translate(&request("Hello")).await;
    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
}

#[tokio::test]
async fn test_ollama_withUnreachableEndpoint_shouldReturnConnectionErrorAfterRetries() {
    let provider = Ollama::new("http://127.0.0.1:9", "llama3.2:3b", Duration::from_secs(2), 1, 10);
    let result = provider.translate(&request("Hello")).await;
    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
    assert_eq!(provider.name(), "ollama");
}
