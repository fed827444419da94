/*!
 * XLIFF 1.2 document handling.
 *
 * - `tree`: owned XML element tree that round-trips untouched structure
 * - `translator`: per-document locale alignment and unit translation
 * - `verifier`: independent re-check of written artifacts and text patching
 */

/// Namespace of every element the pipeline reads or writes
pub const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";

/// `state` value that marks a unit as done
pub const TRANSLATED_STATE: &str = "translated";

pub use self::translator::{DocumentStats, TranslatorOptions, XliffTranslator};
pub use self::tree::{XmlDocument, XmlElement, XmlNode};
pub use self::verifier::{ConsistencyReport, ConsistencyVerifier, SectionMismatch};

pub mod translator;
pub mod tree;
pub mod verifier;
