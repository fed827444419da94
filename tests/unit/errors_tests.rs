/*!
 * Tests for error types and conversions
 */

use std::error::Error;
use std::io;
use std::path::PathBuf;
use xcloc_translate::errors::{AppError, BundleError, DocumentError, ProviderError, XmlError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Too many requests"));
}

#[test]
fn test_providerError_timeout_shouldDisplayDuration() {
    let display = ProviderError::Timeout(1500).to_string();
    assert!(display.contains("1500 ms"));
}

#[test]
fn test_documentError_parse_shouldExposeSourceAndPath() {
    let error = DocumentError::Parse {
        path: PathBuf::from("fr.xliff"),
        source: XmlError::Structure("unclosed element <file>".to_string()),
    };

    let display = error.to_string();
    assert!(display.contains("fr.xliff"));
    assert!(display.contains("unclosed element"));
    assert!(error.source().is_some());
}

#[test]
fn test_documentError_driftDetected_shouldDisplayCount() {
    let error = DocumentError::DriftDetected {
        path: PathBuf::from("de.xliff"),
        mismatches: 2,
    };
    assert!(error.to_string().contains("2 file section(s)"));
}

#[test]
fn test_bundleError_fromIoError_shouldWrapMessage() {
    let error: BundleError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
    assert!(matches!(error, BundleError::Io(ref message) if message.contains("denied")));
}

#[test]
fn test_appError_fromBundleError_shouldWrap() {
    let error: AppError = BundleError::ManifestNotFound(PathBuf::from("in.xcloc")).into();
    assert!(matches!(error, AppError::Bundle(BundleError::ManifestNotFound(_))));
    assert!(error.to_string().contains("contents.json not found"));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(ref message) if message == "something odd"));
}
