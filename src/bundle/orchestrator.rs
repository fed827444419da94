/*!
 * Bundle orchestrator.
 *
 * Copies an input bundle to the output location, sets the manifest's target
 * locale, translates every XLIFF document and then verifies (and if needed
 * patches) the target locale across all written artifacts.
 */

use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::{BundleError, DocumentError};
use crate::file_utils::FileManager;
use crate::translation::TranslationGateway;
use crate::xliff::{ConsistencyVerifier, DocumentStats, TranslatorOptions, XliffTranslator};
use super::manifest::{MANIFEST_FILE_NAME, Manifest};

/// Everything one run needs to know
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Source bundle directory
    pub input: PathBuf,
    /// Destination bundle directory, replaced if it exists
    pub output: PathBuf,
    /// Target locale, written verbatim everywhere
    pub target_locale: String,
    /// Per-document behaviour
    pub translator: TranslatorOptions,
    /// Extensions identifying XLIFF documents
    pub xliff_extensions: Vec<String>,
}

impl BundleOptions {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, target_locale: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            target_locale: target_locale.into(),
            translator: TranslatorOptions::default(),
            xliff_extensions: vec!["xliff".to_string()],
        }
    }
}

/// Result for one document
#[derive(Debug)]
pub struct DocumentOutcome {
    /// Path inside the input bundle
    pub input: PathBuf,
    /// Corresponding path inside the output bundle
    pub output: PathBuf,
    /// Counters, or why the document failed
    pub result: Result<DocumentStats, DocumentError>,
}

impl DocumentOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary of a bundle run
#[derive(Debug)]
pub struct BundleReport {
    /// The manifest's development region
    pub source_locale: String,
    /// One entry per discovered document, in discovery order
    pub documents: Vec<DocumentOutcome>,
    /// Documents that needed a force patch after translation
    pub drift_patched: usize,
    /// Documents still inconsistent after the final pass
    pub residual_drift: usize,
    /// Whether every document was translated and written
    pub success: bool,
}

impl BundleReport {
    pub fn failed_documents(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.documents.iter().filter(|outcome| !outcome.is_success())
    }
}

/// Drives a whole bundle through translation and verification
#[derive(Debug)]
pub struct BundleOrchestrator {
    gateway: Arc<TranslationGateway>,
    options: BundleOptions,
}

impl BundleOrchestrator {
    pub fn new(gateway: Arc<TranslationGateway>, options: BundleOptions) -> Self {
        Self { gateway, options }
    }

    pub fn options(&self) -> &BundleOptions {
        &self.options
    }

    /// Run the bundle. Only setup failures are returned as errors; document
    /// failures are recorded in the report.
    pub async fn process(&self) -> Result<BundleReport, BundleError> {
        let start_time = Instant::now();
        let input = &self.options.input;
        let output = &self.options.output;
        let target_locale = &self.options.target_locale;

        if !input.exists() {
            return Err(BundleError::InputNotFound(input.clone()));
        }
        let input_manifest = input.join(MANIFEST_FILE_NAME);
        if !FileManager::file_exists(&input_manifest) {
            return Err(BundleError::ManifestNotFound(input.clone()));
        }

        let source_locale = Manifest::load(&input_manifest)?
            .development_region()
            .map(str::to_string)
            .ok_or_else(|| BundleError::MissingSourceLocale(input_manifest.clone()))?;
        info!("Source locale: {}, target locale: {}", source_locale, target_locale);

        self.check_output_location()?;
        FileManager::copy_dir_all(input, output)?;
        info!("Copied {:?} to {:?}", input, output);

        let output_manifest = output.join(MANIFEST_FILE_NAME);
        self.update_manifest(&output_manifest)?;

        let documents = self.translate_documents(&source_locale).await?;

        let verifier = ConsistencyVerifier::new(target_locale.as_str());
        let drift_patched = self.patch_drift(&verifier, &documents);
        let residual_drift = self.final_pass(&verifier, &output_manifest, &documents);

        let success = documents.iter().all(DocumentOutcome::is_success);
        let stats = self.gateway.stats();
        info!(
            "Processed {} document(s) in {:.1?}: {} backend call(s), {} cache hit(s), {} failed call(s)",
            documents.len(),
            start_time.elapsed(),
            stats.backend_calls,
            stats.cache_hits,
            stats.degraded
        );
        if success {
            info!("Bundle translated successfully");
        } else {
            error!(
                "{} of {} document(s) failed",
                documents.iter().filter(|d| !d.is_success()).count(),
                documents.len()
            );
        }

        Ok(BundleReport {
            source_locale,
            documents,
            drift_patched,
            residual_drift,
            success,
        })
    }

    /// The destructive copy must neither delete nor recurse into the input
    fn check_output_location(&self) -> Result<(), BundleError> {
        let input = FileManager::absolute_path(&self.options.input)?;
        let output = FileManager::absolute_path(&self.options.output)?;

        let reason = if output == input {
            Some("output is the input bundle")
        } else if output.starts_with(&input) {
            Some("output is inside the input bundle")
        } else if input.starts_with(&output) {
            Some("output contains the input bundle")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(BundleError::InvalidOutput {
                output: self.options.output.clone(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn update_manifest(&self, path: &Path) -> Result<(), BundleError> {
        let target_locale = &self.options.target_locale;
        let mut manifest = Manifest::load(path)?;

        match manifest.set_target_locale(target_locale) {
            Some(previous) if previous == *target_locale => {
                info!("Manifest targetLocale already '{}'", target_locale)
            }
            Some(previous) => info!("Manifest targetLocale changed from '{}' to '{}'", previous, target_locale),
            None => info!("Manifest targetLocale set to '{}'", target_locale),
        }

        manifest.save(path)
    }

    async fn translate_documents(&self, source_locale: &str) -> Result<Vec<DocumentOutcome>, BundleError> {
        let input = &self.options.input;
        let paths = FileManager::find_files(input, &self.options.xliff_extensions)
            .map_err(|e| BundleError::Io(format!("{:#}", e)))?;
        info!("Found {} XLIFF document(s)", paths.len());

        let translator = XliffTranslator::new(
            Arc::clone(&self.gateway),
            source_locale,
            self.options.target_locale.as_str(),
            self.options.translator,
        );

        let mut outcomes = Vec::with_capacity(paths.len());
        for path in paths {
            let relative = path.strip_prefix(input).unwrap_or(&path);
            let output = self.options.output.join(relative);
            info!("Processing {:?}", relative);

            let result = translator.translate_file(&path, &output).await;
            if let Err(e) = &result {
                error!("Failed to process {:?}: {}", relative, e);
            }

            outcomes.push(DocumentOutcome { input: path, output, result });
        }

        Ok(outcomes)
    }

    /// Check every output document and force-patch drifted ones
    fn patch_drift(&self, verifier: &ConsistencyVerifier, documents: &[DocumentOutcome]) -> usize {
        let mut patched = 0;

        for document in documents {
            match verifier.check_document(&document.output) {
                Ok(report) if report.is_consistent() => {
                    debug!("{:?} is consistent", document.output)
                }
                Ok(report) => {
                    warn!(
                        "{} file section(s) drifted in {:?}, force-patching",
                        report.mismatches.len(),
                        document.output
                    );
                    match verifier.force_patch(&document.output) {
                        Ok(_) => patched += 1,
                        Err(e) => error!("Force patch failed for {:?}: {}", document.output, e),
                    }
                }
                Err(e) => {
                    // Unreadable as a tree; the textual patch may still apply
                    warn!("Could not verify {:?} ({}), force-patching", document.output, e);
                    match verifier.force_patch(&document.output) {
                        Ok(0) => {}
                        Ok(_) => patched += 1,
                        Err(e) => error!("Force patch failed for {:?}: {}", document.output, e),
                    }
                }
            }
        }

        patched
    }

    /// Re-check the manifest (repairing it) and every document once more
    fn final_pass(&self, verifier: &ConsistencyVerifier, manifest: &Path, documents: &[DocumentOutcome]) -> usize {
        match verifier.check_manifest(manifest) {
            Ok(true) => {}
            Ok(false) => {
                if let Err(e) = self.update_manifest(manifest) {
                    error!("Could not correct manifest {:?}: {}", manifest, e);
                }
            }
            Err(e) => error!("Could not verify manifest {:?}: {}", manifest, e),
        }

        let mut residual = 0;
        for document in documents {
            match verifier.verify_document(&document.output) {
                Ok(()) => {}
                Err(e @ DocumentError::DriftDetected { .. }) => {
                    residual += 1;
                    error!("{}", e);
                }
                Err(e) => error!("Could not verify {:?}: {}", document.output, e),
            }
        }

        if residual == 0 {
            info!("All artifacts declare target locale '{}'", self.options.target_locale);
        }
        residual
    }
}
