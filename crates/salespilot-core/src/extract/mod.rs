//! Field extraction: alias resolution, typed value readers and free-text
//! miners.

pub mod fields;
pub mod rules;
mod values;

pub use fields::{AliasTable, CanonicalField};
pub use values::{extract_fields, ExtractedFields, ExtractionIssue, FieldExtraction};
