//! Hints derived from the project name.

use super::patterns::{PROJECT_PO, PROJECT_WO};

/// Zone fallback: last whitespace-delimited token of the project name, with
/// one trailing comma removed. `(WO)` / `(PO)` markers are not zones and are
/// skipped.
pub fn zone_from_project(name: &str) -> String {
    let without_markers = PROJECT_PO.replace_all(&PROJECT_WO.replace_all(name, " "), " ").into_owned();
    let last = without_markers.split_whitespace().last().unwrap_or("");
    last.strip_suffix(',').unwrap_or(last).to_string()
}

/// Transaction type implied by a `(WO)` or `(PO)` marker in the project name.
pub fn type_hint(name: &str) -> &'static str {
    if PROJECT_WO.is_match(name) {
        "WO"
    } else if PROJECT_PO.is_match(name) {
        "PO"
    } else {
        ""
    }
}
