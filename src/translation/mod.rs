/*!
 * Text translation for XLIFF units.
 *
 * - `placeholders`: format specifier masking and restoration
 * - `cache`: run-scoped memoization of translations
 * - `gateway`: the single entry point that calls a backend
 */

// Re-export main types for easier usage
pub use self::cache::TranslationCache;
pub use self::gateway::{
    GatewayOptions, GatewayStats, TranslationGateway, TranslationOutcome, TranslationStatus,
};
pub use self::placeholders::PlaceholderMap;

// Submodules
pub mod cache;
pub mod gateway;
pub mod placeholders;
