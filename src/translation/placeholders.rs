/*!
 * Format specifier masking.
 *
 * Printf-style conversions (`%@`, `%d`, `%1$@`, `%lld`, `%%`) and brace
 * interpolation spans (`{count}`) are swapped for synthetic tokens before
 * text leaves the process, then swapped back into whatever the backend
 * returns. Tokens carry a sequence index, so repeated identical specifiers
 * are restored by position, never by content.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix of every synthetic token; the sequence index follows directly.
pub const PLACEHOLDER_PREFIX: &str = "PLACEHOLDERXYZ";

/// Appended to the prefix until it no longer occurs in the source text
const PREFIX_DISAMBIGUATOR: char = 'Q';

/// Printf conversions (optionally positional and length-modified) or `{...}` spans
static FORMAT_SPECIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%(?:[1-9][0-9]*\$)?(?:ll|l|h|q|z|t|j)?[@%diouxXfeEgGcs]|\{[^}]*\}")
        .expect("format specifier pattern is valid")
});

/// Mapping from synthetic token to the substring it replaced, in index order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMap {
    prefix: String,
    entries: Vec<(String, String)>,
}

impl Default for PlaceholderMap {
    fn default() -> Self {
        Self::with_prefix(PLACEHOLDER_PREFIX)
    }
}

impl PlaceholderMap {
    /// Create an empty map issuing `PLACEHOLDERXYZ{n}` tokens
    pub fn new() -> Self {
        Self::default()
    }

    fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), entries: Vec::new() }
    }

    /// Prefix of the tokens issued for this call
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of masked specifiers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was masked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `token` is one of the tokens issued for this call
    pub fn contains_token(&self, token: &str) -> bool {
        self.entries.iter().any(|(t, _)| t == token)
    }

    /// Original substring recorded for `token`
    pub fn original(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, original)| original.as_str())
    }

    /// Iterate `(token, original)` pairs in issue order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, o)| (t.as_str(), o.as_str()))
    }

    fn push(&mut self, original: &str) -> String {
        let token = format!("{}{}", self.prefix, self.entries.len());
        self.entries.push((token.clone(), original.to_string()));
        token
    }
}

/// Replace every format specifier in `text` with a synthetic token.
///
/// Matches are taken left to right and never overlap; the n-th match becomes
/// `PLACEHOLDERXYZ{n}`. If `text` already contains that prefix, `Q`s are
/// appended to it until it does not, so literal token-like text is never
/// mistaken for a token. Text without specifiers comes back unchanged with an
/// empty map.
pub fn extract(text: &str) -> (String, PlaceholderMap) {
    let mut map = PlaceholderMap::with_prefix(unused_prefix(text));
    if text.is_empty() {
        return (String::new(), map);
    }

    let masked = FORMAT_SPECIFIER_REGEX
        .replace_all(text, |caps: &regex::Captures<'_>| map.push(&caps[0]))
        .into_owned();

    (masked, map)
}

/// Shortest `PLACEHOLDERXYZ`, `PLACEHOLDERXYZQ`, ... that does not occur in `text`
fn unused_prefix(text: &str) -> String {
    let mut prefix = PLACEHOLDER_PREFIX.to_string();
    while text.contains(prefix.as_str()) {
        prefix.push(PREFIX_DISAMBIGUATOR);
    }
    prefix
}

/// Put the original specifiers back in place of their tokens.
///
/// Tokens may appear in any order, any number of times, or not at all.
/// Higher indices are substituted first so `PLACEHOLDERXYZ1` never eats the
/// prefix of `PLACEHOLDERXYZ10`.
pub fn restore(text: &str, map: &PlaceholderMap) -> String {
    if text.is_empty() || map.is_empty() {
        return text.to_string();
    }

    map.entries
        .iter()
        .rev()
        .fold(text.to_string(), |acc, (token, original)| {
            acc.replace(token.as_str(), original)
        })
}

/// True when nothing but tokens and whitespace remains after masking
pub fn is_placeholder_only(masked: &str, map: &PlaceholderMap) -> bool {
    if map.is_empty() {
        return false;
    }

    let remainder = map
        .entries
        .iter()
        .rev()
        .fold(masked.to_string(), |acc, (token, _)| acc.replace(token.as_str(), ""));

    remainder.trim().is_empty()
}
