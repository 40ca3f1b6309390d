//! Locale-tolerant money parsing.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a money amount written with either US (`1,234.56`) or European
/// (`1.234,56`) separators. Currency symbols and letters are ignored.
///
/// - both `,` and `.`: whichever comes last is the decimal point
/// - only `,`: a single comma is the decimal point, several are thousands
/// - only `.`: a single period is the decimal point, several are thousands
///
/// Returns `None` for anything that does not leave a valid number.
pub fn parse_money(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let commas = cleaned.matches(',').count();
    let periods = cleaned.matches('.').count();

    let normalized = match (commas, periods) {
        (0, 0) | (0, 1) => cleaned,
        (1, 0) => cleaned.replace(',', "."),
        (_, 0) => cleaned.replace(',', ""),
        (0, _) => cleaned.replace('.', ""),
        _ => {
            let comma_pos = cleaned.rfind(',');
            let dot_pos = cleaned.rfind('.');
            match (comma_pos, dot_pos) {
                (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
                _ => cleaned.replace(',', ""),
            }
        }
    };

    Decimal::from_str(&normalized).ok()
}
