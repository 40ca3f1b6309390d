//! Common regex patterns for task text mining.

use lazy_static::lazy_static;
use regex::Regex;

/// Tokens that end an embedded value when structured fields are run together
/// in free text (e.g. `Client: Acme PRIORITY HIGH`).
pub const TRAILING_KEYWORDS: &[&str] = &["PRIORITY", "MEDIUM", "HIGH", "LOW", "STATUS", "ZONE"];

lazy_static! {
    // Client lines ("Client: Acme", "Cliente - Acme")
    pub static ref CLIENT_LINE: Regex = Regex::new(
        r"(?i)(?:^|\r?\n)\s*(?:client|cliente)\s*[:\-]\s*([^\r\n]+)"
    ).unwrap();

    pub static ref CLIENT_ANYWHERE: Regex = Regex::new(
        r"(?i)(?:client|cliente)\s*[:\-]\s*([^\r\n]+)"
    ).unwrap();

    // Keyword that terminates an embedded value
    pub static ref TRAILING_KEYWORD: Regex = Regex::new(
        &format!(r"(?i)\s+(?:{})\b", TRAILING_KEYWORDS.join("|"))
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // Work orders: "WO 123", "WO 123-4/5", "wo A77 / 2"
    pub static ref WO_IDENTIFIER: Regex = Regex::new(
        r"(?i)\bWO\s+([A-Za-z0-9]+(?:\s*[-/]\s*\d+)*)"
    ).unwrap();

    pub static ref WO_TOKEN: Regex = Regex::new(r"(?i)\bWO\b").unwrap();

    // Dates
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})(?:\D|$)"
    ).unwrap();

    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    // "March 15, 2024", "Mar. 15th 2024"
    pub static ref DATE_MONTH_FIRST: Regex = Regex::new(
        r"(?i)\b(\p{L}{3,10})\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b"
    ).unwrap();

    // "15 March 2024", "15-Mar-2024", "15 de marzo de 2024"
    pub static ref DATE_DAY_FIRST: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?(?:\s+de)?[\s\-/]+(\p{L}{3,10})\.?(?:\s+de)?[\s\-/,]+(\d{4})\b"
    ).unwrap();

    // Project type hints
    pub static ref PROJECT_WO: Regex = Regex::new(r"(?i)\(WO\)").unwrap();
    pub static ref PROJECT_PO: Regex = Regex::new(r"(?i)\(PO\)").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_keyword_matches_every_listed_token() {
        for keyword in TRAILING_KEYWORDS {
            let text = format!("value {}", keyword.to_lowercase());
            assert!(TRAILING_KEYWORD.is_match(&text), "{keyword}");
        }
        assert!(!TRAILING_KEYWORD.is_match("value HIGHLAND"));
    }

    #[test]
    fn test_wo_token_needs_word_boundary() {
        assert!(WO_TOKEN.is_match("WO# 12"));
        assert!(!WO_TOKEN.is_match("two words"));
    }
}
