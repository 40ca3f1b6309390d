//! Core library for the sales pilot export.
//!
//! This crate provides:
//! - Alias resolution of free-form, multi-language custom field labels
//! - Locale-tolerant money and date parsing
//! - Client and work order mining from free text
//! - Fee lookup and financial derivation (net value, cost, profit, ratio)
//! - Section/cutoff filtering and canonical record assembly
//! - Summaries by type and by zone for downstream reports

pub mod error;
pub mod extract;
pub mod finance;
pub mod models;
pub mod pipeline;

pub use error::{ConfigError, PilotError, Result, SourceError};
pub use extract::{AliasTable, CanonicalField, ExtractionIssue};
pub use finance::{FeeTable, Financials};
pub use models::config::PilotConfig;
pub use models::record::{column_order, default_column_order, CanonicalRecord};
pub use models::task::{CustomField, Project, RawTask};
pub use pipeline::{
    load_projects, parse_cutoff, ExportResult, JsonDirSource, MemorySource, Pipeline,
    RecordAssembler, SectionFilter, StatusMap, TaskSource,
};
