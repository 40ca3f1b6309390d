//! Permissive date parsing for human-entered and ISO dates.

use chrono::NaiveDate;

use super::patterns::{DATE_DAY_FIRST, DATE_MONTH_FIRST, DATE_NUMERIC, DATE_YMD};
use super::text::normalize;
use super::{ExtractionMatch, FieldExtractor};

/// Display format for dates in the canonical record.
pub const DISPLAY_FORMAT: &str = "%m/%d/%Y";

/// Format of the invoice month bucket.
pub const MONTH_FORMAT: &str = "%Y-%m";

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        // YYYY-MM-DD, also the date part of ISO timestamps
        for caps in DATE_YMD.captures_iter(text) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);

            if let (Some(date), Some(m)) = (NaiveDate::from_ymd_opt(year, month, day), caps.get(0)) {
                push_unique(&mut results, date, 0.95, m);
            }
        }

        // MM/DD/YYYY, falling back to DD/MM/YYYY when the first part can't be a month
        for caps in DATE_NUMERIC.captures_iter(text) {
            let first: u32 = caps[1].parse().unwrap_or(0);
            let second: u32 = caps[2].parse().unwrap_or(0);
            let year = parse_year(&caps[3]);

            let (month, day) = if first <= 12 { (first, second) } else { (second, first) };
            if let (Some(date), Some(m)) = (NaiveDate::from_ymd_opt(year, month, day), caps.get(0)) {
                push_unique(&mut results, date, 0.85, m);
            }
        }

        // March 15, 2024
        for caps in DATE_MONTH_FIRST.captures_iter(text) {
            let Some(month) = month_from_name(&caps[1]) else {
                continue;
            };
            let day: u32 = caps[2].parse().unwrap_or(0);
            let year: i32 = caps[3].parse().unwrap_or(0);

            if let (Some(date), Some(m)) = (NaiveDate::from_ymd_opt(year, month, day), caps.get(0)) {
                push_unique(&mut results, date, 0.9, m);
            }
        }

        // 15 March 2024, 15-Mar-2024, 15 de marzo de 2024
        for caps in DATE_DAY_FIRST.captures_iter(text) {
            let Some(month) = month_from_name(&caps[2]) else {
                continue;
            };
            let day: u32 = caps[1].parse().unwrap_or(0);
            let year: i32 = caps[3].parse().unwrap_or(0);

            if let (Some(date), Some(m)) = (NaiveDate::from_ymd_opt(year, month, day), caps.get(0)) {
                push_unique(&mut results, date, 0.9, m);
            }
        }

        // Leftmost date first, whatever pattern found it
        results.sort_by_key(|r| r.position.map_or(usize::MAX, |(start, _)| start));
        results
    }
}

fn push_unique(
    results: &mut Vec<ExtractionMatch<NaiveDate>>,
    date: NaiveDate,
    confidence: f32,
    m: regex::Match<'_>,
) {
    // Skip if already found
    if results.iter().any(|r| r.value == date) {
        return;
    }
    results.push(
        ExtractionMatch::new(date, confidence, m.as_str().trim())
            .with_position(m.start(), m.end()),
    );
}

/// Parse the first recognizable date anywhere in `raw`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    DateExtractor::new().extract(raw).map(|m| m.value)
}

/// Render a date for display as `MM/DD/YYYY`.
///
/// Falls back to a strict `YYYY-MM-DD` read of the text before any `T`, and
/// finally to the input unchanged.
pub fn display_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    if let Some(date) = parse_date(raw) {
        return date.format(DISPLAY_FORMAT).to_string();
    }

    let head = raw.split('T').next().unwrap_or(raw);
    match NaiveDate::parse_from_str(head.trim(), "%Y-%m-%d") {
        Ok(date) => date.format(DISPLAY_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// `YYYY-MM` bucket of a date, empty when it cannot be parsed.
pub fn month_bucket(raw: &str) -> String {
    parse_date(raw)
        .map(|d| d.format(MONTH_FORMAT).to_string())
        .unwrap_or_default()
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}

const MONTH_NAMES: &[(u32, &[&str])] = &[
    (1, &["JANUARY", "ENERO"]),
    (2, &["FEBRUARY", "FEBRERO"]),
    (3, &["MARCH", "MARZO"]),
    (4, &["APRIL", "ABRIL"]),
    (5, &["MAY", "MAYO"]),
    (6, &["JUNE", "JUNIO"]),
    (7, &["JULY", "JULIO"]),
    (8, &["AUGUST", "AGOSTO"]),
    (9, &["SEPTEMBER", "SEPTIEMBRE", "SETIEMBRE"]),
    (10, &["OCTOBER", "OCTUBRE"]),
    (11, &["NOVEMBER", "NOVIEMBRE"]),
    (12, &["DECEMBER", "DICIEMBRE"]),
];

/// English or Spanish month name, full or abbreviated to at least 3 letters.
fn month_from_name(word: &str) -> Option<u32> {
    let word = normalize(word);
    if word.len() < 3 {
        return None;
    }

    MONTH_NAMES
        .iter()
        .find(|(_, names)| names.iter().any(|n| n.starts_with(word.as_str())))
        .map(|(month, _)| *month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_and_timestamps() {
        assert_eq!(parse_date("2024-03-15"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("2024-03-15T10:00:00"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("2024-03-15T10:00:00.000Z"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("2024/3/5"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_numeric_month_first_unless_impossible() {
        assert_eq!(parse_date("03/04/2024"), Some(ymd(2024, 3, 4)));
        assert_eq!(parse_date("15/03/2024"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("15.03.24"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("31/31/2024"), None);
    }

    #[test]
    fn test_month_names() {
        assert_eq!(parse_date("March 15, 2024"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("Sept. 2nd 2023"), Some(ymd(2023, 9, 2)));
        assert_eq!(parse_date("15-Mar-2024"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("15 de marzo de 2024"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("1 diciembre 2023"), Some(ymd(2023, 12, 1)));
        assert_eq!(parse_date("Invoice 15, 2024"), None);
    }

    #[test]
    fn test_fuzzy_finds_date_in_text() {
        assert_eq!(parse_date("sent on 2024-05-02 by mail"), Some(ymd(2024, 5, 2)));
    }

    #[test]
    fn test_leftmost_date_wins_across_formats() {
        assert_eq!(parse_date("15/03/2024 then 2024-04-01"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("March 1, 2024 or 2024-06-30"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("2024-06-30 or March 1, 2024"), Some(ymd(2024, 6, 30)));

        let all = DateExtractor::new().extract_all("1 diciembre 2023, 02/03/2024, 2024-01-05");
        let starts: Vec<_> = all.iter().map(|m| m.position.unwrap().0).collect();
        assert_eq!(all.len(), 3);
        assert!(starts.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(all[0].value, ymd(2023, 12, 1));
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2024-03-15T10:00:00"), "03/15/2024");
        assert_eq!(display_date("March 15, 2024"), "03/15/2024");
        assert_eq!(display_date("not a date"), "not a date");
        assert_eq!(display_date(""), "");
    }

    #[test]
    fn test_month_bucket() {
        assert_eq!(month_bucket("03/15/2024"), "2024-03");
        assert_eq!(month_bucket("pending"), "");
        assert_eq!(month_bucket(""), "");
    }
}
