//! Work-order number mining from free text.

use tracing::trace;

use super::patterns::{TRAILING_KEYWORD, WO_IDENTIFIER, WO_TOKEN};
use super::{ExtractionMatch, FieldExtractor};

/// Extractor for `WO <id>` references such as `WO 123-4/5`.
pub struct WorkOrderExtractor;

impl WorkOrderExtractor {
    pub fn new() -> Self {
        Self
    }

    fn structured(text: &str) -> Option<ExtractionMatch<String>> {
        let caps = WO_IDENTIFIER.captures(text)?;
        let full = caps.get(0)?;
        Some(
            ExtractionMatch::new(format!("WO {}", caps[1].trim()), 0.9, full.as_str())
                .with_position(full.start(), full.end()),
        )
    }

    /// Text from the first `WO` token up to the next keyword or line end.
    fn run_after_token(text: &str) -> Option<(usize, &str)> {
        let token = WO_TOKEN.find(text)?;
        let rest = &text[token.start()..];
        let line = rest.split(['\r', '\n']).next().unwrap_or(rest);
        let run = match TRAILING_KEYWORD.find(line) {
            Some(m) => &line[..m.start()],
            None => line,
        };
        Some((token.start(), run))
    }
}

impl Default for WorkOrderExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for WorkOrderExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        if let Some(found) = Self::structured(text) {
            return Some(found);
        }

        let (start, run) = Self::run_after_token(text)?;
        if let Some(mut found) = Self::structured(run) {
            found.position = found.position.map(|(s, e)| (s + start, e + start));
            return Some(found);
        }

        let value = run.trim();
        Some(ExtractionMatch::new(value.to_string(), 0.5, run).with_position(start, start + run.len()))
    }
}

/// Find a work-order reference in `text`. Empty when no `WO` token occurs.
pub fn mine_wo(text: &str) -> String {
    match WorkOrderExtractor::new().extract(text) {
        Some(m) => {
            trace!(
                "Mined work order {:?} from {:?} at {:?} (confidence {:.2})",
                m.value, m.source, m.position, m.confidence
            );
            m.value
        }
        None => String::new(),
    }
}
