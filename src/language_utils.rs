use anyhow::{Result, anyhow};
use isolang::Language;
use log::warn;

/// Locale utilities for Xcode bundles
///
/// Xcode locale identifiers (`zh-Hans`, `pt-PT`) are written verbatim to
/// every artifact. Backends sometimes expect different codes; that mapping
/// lives here and is only ever applied to the outgoing backend call.
/// Locale identifiers Xcode commonly uses for localizations
pub const XCODE_LOCALES: &[&str] = &[
    "en", "fr", "de", "es", "it", "ja", "ko", "nl", "pt", "ru", "sv",
    "zh-Hans", "zh-Hant", "ar", "ca", "cs", "da", "el", "fi", "he",
    "hi", "hr", "hu", "id", "ms", "no", "pl", "pt-PT", "ro", "sk",
    "th", "tr", "uk", "vi",
];

/// Xcode locale → backend locale, for the identifiers that differ
const BACKEND_LOCALE_MAPPING: &[(&str, &str)] = &[
    ("zh-Hans", "zh-cn"),
    ("zh-Hant", "zh-tw"),
    ("en-GB", "en"),
];

/// Map a locale identifier to the code the translation backend expects.
/// Unmapped locales pass through unchanged.
pub fn map_backend_locale(locale: &str) -> &str {
    BACKEND_LOCALE_MAPPING
        .iter()
        .find(|(xcode, _)| *xcode == locale)
        .map(|(_, backend)| *backend)
        .unwrap_or(locale)
}

/// Whether the locale is in the known Xcode list (case-sensitive)
pub fn is_known_xcode_locale(locale: &str) -> bool {
    XCODE_LOCALES.contains(&locale)
}

/// Primary language subtag of a locale identifier (`zh` for `zh-Hans`)
pub fn primary_subtag(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

/// Check a target locale against the known list, warning on anything unusual.
///
/// Never rejects. Returns the warnings that were logged (empty if none).
pub fn validate_locale_code(locale: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    if !is_known_xcode_locale(locale) {
        warnings.push(format!("Language code '{}' is not a standard Xcode language code.", locale));
        warnings.push("This may cause problems with the Xcode localization system.".to_string());
        warnings.push(format!(
            "Common Xcode language codes include: {}...",
            XCODE_LOCALES[..10].join(", ")
        ));
    }

    let primary = primary_subtag(locale).to_lowercase();
    if primary.len() != 2 || Language::from_639_1(&primary).is_none() {
        warnings.push(format!("'{}' does not start with an ISO 639-1 language code.", locale));
    }

    for warning in &warnings {
        warn!("{}", warning);
    }

    warnings
}

/// Get the English language name for a locale identifier
pub fn get_language_name(locale: &str) -> Result<String> {
    let primary = primary_subtag(locale).trim().to_lowercase();

    let language = match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    };

    language
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language code: {}", locale))
}
