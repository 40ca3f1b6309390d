//! Rule-based extractors: text normalization, locale-tolerant parsers and
//! free-text miners.

pub mod amounts;
pub mod client;
pub mod dates;
pub mod patterns;
pub mod project;
pub mod text;
pub mod work_order;

pub use amounts::parse_money;
pub use client::{mine_client, ClientExtractor};
pub use dates::{display_date, month_bucket, parse_date, DateExtractor};
pub use project::{type_hint, zone_from_project};
pub use text::normalize;
pub use work_order::{mine_wo, WorkOrderExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field. Defaults to the single best one.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.extract(text).into_iter().collect()
    }
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
