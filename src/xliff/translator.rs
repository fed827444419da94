/*!
 * Document translator.
 *
 * Brings one XLIFF document to the configured target locale: every `file`
 * section's `target-language` is rewritten, and every incomplete
 * `trans-unit` gets its `target` filled through the gateway.
 */

use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::errors::{DocumentError, XmlError};
use crate::file_utils::FileManager;
use crate::translation::cache::truncate_text;
use crate::translation::TranslationGateway;
use super::tree::{XmlDocument, XmlElement};
use super::{TRANSLATED_STATE, XLIFF_NAMESPACE};

/// Behaviour switches for the translator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorOptions {
    /// Store the untranslated source and mark the unit `translated` when the
    /// backend fails. When false such units are left as they were.
    pub mark_failed_as_translated: bool,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self { mark_failed_as_translated: true }
    }
}

/// Counters for one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    /// File sections whose target-language was rewritten
    pub sections_updated: usize,
    /// File sections that were still mismatched on the second pass
    pub sections_forced: usize,
    /// Translation units seen
    pub total_units: usize,
    /// Units whose target was (re)written
    pub translated_units: usize,
    /// Units whose backend call failed
    pub degraded_units: usize,
}

/// Translates XLIFF documents for one source/target locale pair
#[derive(Debug, Clone)]
pub struct XliffTranslator {
    gateway: Arc<TranslationGateway>,
    source_locale: String,
    target_locale: String,
    options: TranslatorOptions,
}

impl XliffTranslator {
    pub fn new(
        gateway: Arc<TranslationGateway>,
        source_locale: impl Into<String>,
        target_locale: impl Into<String>,
        options: TranslatorOptions,
    ) -> Self {
        Self {
            gateway,
            source_locale: source_locale.into(),
            target_locale: target_locale.into(),
            options,
        }
    }

    pub fn source_locale(&self) -> &str {
        &self.source_locale
    }

    pub fn target_locale(&self) -> &str {
        &self.target_locale
    }

    /// Translate the document at `input` and write the result to `output`.
    ///
    /// On any error nothing is written to `output`.
    pub async fn translate_file(&self, input: &Path, output: &Path) -> Result<DocumentStats, DocumentError> {
        let content = FileManager::read_to_string(input).map_err(|e| DocumentError::io(input, e))?;
        let mut document = XmlDocument::parse(&content).map_err(|e| DocumentError::parse(input, e))?;

        let stats = self
            .translate_document(&mut document)
            .await
            .map_err(|e| DocumentError::parse(input, e))?;

        let bytes = document.to_bytes().map_err(|e| DocumentError::parse(output, e))?;
        FileManager::write_atomic(output, &bytes).map_err(|e| DocumentError::io(output, e))?;

        info!(
            "Translated {} of {} units in {:?}",
            stats.translated_units, stats.total_units, output
        );
        if stats.degraded_units > 0 {
            warn!(
                "{} unit(s) in {:?} kept their source text after backend failures",
                stats.degraded_units, output
            );
        }

        Ok(stats)
    }

    /// Apply the target locale and translate incomplete units in memory
    pub async fn translate_document(&self, document: &mut XmlDocument) -> Result<DocumentStats, XmlError> {
        let mut stats = DocumentStats::default();

        stats.sections_updated = self.align_sections(document)?;
        info!("Updated target-language in {} file section(s)", stats.sections_updated);

        stats.sections_forced = self.align_sections(document)?;
        if stats.sections_forced > 0 {
            warn!("Forced target-language on {} file section(s) after the first pass", stats.sections_forced);
        }

        for unit in document.descendants_mut(XLIFF_NAMESPACE, "trans-unit") {
            stats.total_units += 1;

            let source_text = match unit.find_child(XLIFF_NAMESPACE, "source") {
                Some(source) => source.text()?.unwrap_or_default(),
                None => {
                    debug!("Skipping trans-unit {:?} without source", unit.attribute("id")?);
                    continue;
                }
            };

            let target = unit.ensure_child(XLIFF_NAMESPACE, "target", "source");
            if is_complete(target)? {
                continue;
            }

            debug!("Source: {}", truncate_text(&source_text, 80));
            let outcome = self
                .gateway
                .translate(&source_text, &self.source_locale, &self.target_locale)
                .await;
            debug!("Target: {}", truncate_text(&outcome.text, 80));

            if outcome.is_degraded() {
                stats.degraded_units += 1;
                if !self.options.mark_failed_as_translated {
                    continue;
                }
            }

            target.set_text(&outcome.text);
            target.set_attribute("state", TRANSLATED_STATE)?;
            stats.translated_units += 1;
        }

        Ok(stats)
    }

    /// Set every file section's target-language, returning how many changed
    fn align_sections(&self, document: &mut XmlDocument) -> Result<usize, XmlError> {
        let mut changed = 0;
        for section in document.descendants_mut(XLIFF_NAMESPACE, "file") {
            if section.attribute("target-language")?.as_deref() != Some(self.target_locale.as_str()) {
                section.set_attribute("target-language", &self.target_locale)?;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

/// A unit is complete when its target has text and is marked translated
fn is_complete(target: &XmlElement) -> Result<bool, XmlError> {
    let has_text = target.text()?.is_some_and(|text| !text.trim().is_empty());
    let translated = target.attribute("state")?.as_deref() == Some(TRANSLATED_STATE);
    Ok(has_text && translated)
}
