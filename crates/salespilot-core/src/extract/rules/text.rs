//! Matching-key normalization for labels, sections and names.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a string for matching: diacritics dropped, upper-cased,
/// surrounding whitespace trimmed.
///
/// Upper-casing runs before decomposition so that case mappings which
/// introduce combining marks (`ǰ` → `J̌`) are stripped too, keeping the
/// function idempotent.
pub fn normalize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    let stripped: String = s
        .to_uppercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    stripped.trim().to_string()
}
