/*!
 * Bundle-level processing: the manifest and the end-to-end run.
 */

pub use self::manifest::{MANIFEST_FILE_NAME, Manifest};
pub use self::orchestrator::{BundleOptions, BundleOrchestrator, BundleReport, DocumentOutcome};

pub mod manifest;
pub mod orchestrator;
