//! Client name mining from task names and notes.

use tracing::trace;

use super::patterns::{CLIENT_ANYWHERE, CLIENT_LINE, TRAILING_KEYWORD, WHITESPACE_RUN};
use super::{ExtractionMatch, FieldExtractor};

/// Separator punctuation trimmed off a mined value.
const VALUE_SEPARATORS: &[char] = &['-', ':', ';', '|', ' '];

/// Extractor for `Client: <name>` / `Cliente: <name>` lines.
pub struct ClientExtractor;

impl ClientExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClientExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ClientExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        // A labeled line beats a label buried mid-line
        let (caps, confidence) = match CLIENT_LINE.captures(text) {
            Some(caps) => (caps, 0.9),
            None => (CLIENT_ANYWHERE.captures(text)?, 0.7),
        };

        let raw = caps.get(1)?;
        let value = clean_value(raw.as_str());
        if value.is_empty() {
            return None;
        }

        Some(
            ExtractionMatch::new(value, confidence, raw.as_str())
                .with_position(raw.start(), raw.end()),
        )
    }
}

/// Find a client name in a task's name and notes. Empty when none is found.
pub fn mine_client(name: &str, notes: &str) -> String {
    let blob = format!("{name}\n{notes}");
    match ClientExtractor::new().extract(&blob) {
        Some(m) => {
            trace!(
                "Mined client {:?} from {:?} at {:?} (confidence {:.2})",
                m.value, m.source, m.position, m.confidence
            );
            m.value
        }
        None => String::new(),
    }
}

fn clean_value(raw: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(raw.trim(), " ");
    let head = match TRAILING_KEYWORD.find(&collapsed) {
        Some(m) => &collapsed[..m.start()],
        None => &collapsed[..],
    };
    head.trim_matches(VALUE_SEPARATORS).to_string()
}
