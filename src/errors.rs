/*!
 * Error types for the xcloc-translate pipeline.
 *
 * Each layer of the pipeline has its own error type, defined with the
 * thiserror crate:
 * - `ProviderError`: a single backend call failed (degrades to pass-through)
 * - `XmlError`: a document could not be read into the element tree
 * - `DocumentError`: one XLIFF document failed (recoverable at bundle level)
 * - `BundleError`: the run cannot proceed at all
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when calling a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The call did not complete within the configured timeout
    #[error("Request timed out after {0} ms")]
    Timeout(u64),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised while building or writing the XML element tree
#[derive(Error, Debug)]
pub enum XmlError {
    /// The underlying reader rejected the input
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    /// The input is well-formed token-wise but not a usable document
    #[error("malformed document: {0}")]
    Structure(String),

    /// Writing the serialized tree failed
    #[error("failed to write XML: {0}")]
    Write(#[from] std::io::Error),
}

impl From<quick_xml::events::attributes::AttrError> for XmlError {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        Self::Syntax(quick_xml::Error::from(error))
    }
}

/// Errors that abort processing of a single XLIFF document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document could not be parsed
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        /// Document path
        path: PathBuf,
        /// Parser failure
        #[source]
        source: XmlError,
    },

    /// Reading or writing the document failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// Document path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The written document still declares a foreign target language
    #[error("target-language drift in {path:?}: {mismatches} file section(s) mismatched")]
    DriftDetected {
        /// Document path
        path: PathBuf,
        /// Number of mismatched file sections
        mismatches: usize,
    },
}

impl DocumentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: XmlError) -> Self {
        Self::Parse { path: path.into(), source }
    }
}

/// Errors that abort a whole bundle run
#[derive(Error, Debug)]
pub enum BundleError {
    /// The input bundle does not exist
    #[error("input bundle does not exist: {0:?}")]
    InputNotFound(PathBuf),

    /// The input bundle has no manifest
    #[error("contents.json not found in {0:?}")]
    ManifestNotFound(PathBuf),

    /// The manifest does not declare a development region
    #[error("source locale (developmentRegion) not found in {0:?}")]
    MissingSourceLocale(PathBuf),

    /// The output location cannot be used for this input
    #[error("invalid output location {output:?}: {reason}")]
    InvalidOutput {
        /// Requested output path
        output: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// The manifest could not be read or written
    #[error("manifest error in {path:?}: {message}")]
    Manifest {
        /// Manifest path
        path: PathBuf,
        /// Description of the failure
        message: String,
    },

    /// Copying or walking the bundle failed
    #[error("bundle I/O error: {0}")]
    Io(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from a single document
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from bundle processing
    #[error("Bundle error: {0}")]
    Bundle(#[from] BundleError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for BundleError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
