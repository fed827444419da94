/*!
 * Consistency verifier.
 *
 * Re-reads written artifacts from disk, independently of whatever produced
 * them, and reports every target-locale declaration that does not match.
 * `force_patch` is a structural-model bypass: it rewrites the serialized
 * text with a regex instead of going through the element tree, and is only
 * meant for drift the tree-based pass failed to fix.
 */

use log::{info, warn};
use once_cell::sync::Lazy;
use quick_xml::escape::escape;
use regex::{Captures, Regex};
use std::path::Path;

use crate::bundle::manifest::Manifest;
use crate::errors::{BundleError, DocumentError};
use crate::file_utils::FileManager;
use super::XLIFF_NAMESPACE;
use super::tree::XmlDocument;

/// Label used when a file section has no `original` attribute
pub const UNKNOWN_ORIGINAL: &str = "(unknown)";

/// Any `target-language` assignment, single or double quoted
static TARGET_LANGUAGE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\starget-language\s*=\s*)(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// One file section declaring the wrong target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMismatch {
    /// The section's `original` attribute
    pub original: String,
    /// The declared value, empty when the attribute is missing
    pub found: String,
}

/// Result of checking one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub mismatches: Vec<SectionMismatch>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Checks artifacts against one expected target locale
#[derive(Debug, Clone)]
pub struct ConsistencyVerifier {
    target_locale: String,
}

impl ConsistencyVerifier {
    pub fn new(target_locale: impl Into<String>) -> Self {
        Self { target_locale: target_locale.into() }
    }

    pub fn target_locale(&self) -> &str {
        &self.target_locale
    }

    /// Re-parse the document at `path` and list every mismatched file section
    pub fn check_document(&self, path: &Path) -> Result<ConsistencyReport, DocumentError> {
        let content = FileManager::read_to_string(path).map_err(|e| DocumentError::io(path, e))?;
        let document = XmlDocument::parse(&content).map_err(|e| DocumentError::parse(path, e))?;

        let mut report = ConsistencyReport::default();
        for section in document.descendants(XLIFF_NAMESPACE, "file") {
            let found = section
                .attribute("target-language")
                .map_err(|e| DocumentError::parse(path, e))?
                .unwrap_or_default();
            if found == self.target_locale {
                continue;
            }

            let original = section
                .attribute("original")
                .map_err(|e| DocumentError::parse(path, e))?
                .unwrap_or_else(|| UNKNOWN_ORIGINAL.to_string());
            warn!(
                "Inconsistency in {:?}: file '{}' has target-language '{}' instead of '{}'",
                path, original, found, self.target_locale
            );
            report.mismatches.push(SectionMismatch { original, found });
        }

        Ok(report)
    }

    /// Like [`ConsistencyVerifier::check_document`], but any mismatch is an
    /// error (`DocumentError::DriftDetected`)
    pub fn verify_document(&self, path: &Path) -> Result<(), DocumentError> {
        let report = self.check_document(path)?;
        if report.is_consistent() {
            return Ok(());
        }

        Err(DocumentError::DriftDetected {
            path: path.to_path_buf(),
            mismatches: report.mismatches.len(),
        })
    }

    /// Whether the manifest at `path` declares the expected target locale
    pub fn check_manifest(&self, path: &Path) -> Result<bool, BundleError> {
        let manifest = Manifest::load(path)?;
        let found = manifest.target_locale();

        if found == Some(self.target_locale.as_str()) {
            return Ok(true);
        }

        warn!(
            "Inconsistency in {:?}: targetLocale is {:?} instead of '{}'",
            path, found, self.target_locale
        );
        Ok(false)
    }

    /// Rewrite every `target-language` assignment in `text` to the expected
    /// locale. Running it twice gives the same text as running it once.
    pub fn force_patch_text(&self, text: &str) -> String {
        self.patch(text).0
    }

    /// Apply [`ConsistencyVerifier::force_patch_text`] to the file at `path`,
    /// returning how many assignments were changed
    pub fn force_patch(&self, path: &Path) -> Result<usize, DocumentError> {
        let content = FileManager::read_to_string(path).map_err(|e| DocumentError::io(path, e))?;
        let (patched, changed) = self.patch(&content);

        if changed > 0 {
            FileManager::write_atomic(path, patched.as_bytes()).map_err(|e| DocumentError::io(path, e))?;
            info!("Force-patched {} target-language value(s) in {:?}", changed, path);
        }

        Ok(changed)
    }

    fn patch(&self, text: &str) -> (String, usize) {
        let escaped = escape(self.target_locale.as_str());
        let mut changed = 0;

        let patched = TARGET_LANGUAGE_ATTR.replace_all(text, |caps: &Captures| {
            let current = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            if current != escaped {
                changed += 1;
            }
            format!("{}\"{}\"", &caps[1], escaped)
        });

        (patched.into_owned(), changed)
    }
}
