//! Section and completion-cutoff filtering.

use chrono::NaiveDate;
use serde::Serialize;

use crate::extract::rules::{normalize, parse_date};
use crate::models::task::RawTask;

/// Section tokens whose tasks are never exported.
pub const IGNORED_SECTION_TOKENS: &[&str] = &["TRASH", "ARCHIVE"];

/// Section tokens marking finished work, subject to the cutoff.
pub const CLOSED_SECTION_TOKENS: &[&str] = &["DONE", "CANCEL"];

/// Why a task produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Section is a trash or archive column.
    IgnoredSection,
    /// Done or canceled, and last touched before the cutoff.
    ClosedBeforeCutoff,
}

/// Outcome of filtering one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Include,
    Exclude(ExclusionReason),
}

impl Decision {
    pub fn is_included(&self) -> bool {
        matches!(self, Decision::Include)
    }
}

/// Decides which tasks become records.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionFilter {
    cutoff: Option<NaiveDate>,
}

impl SectionFilter {
    /// A filter with no completion cutoff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the completion cutoff date.
    pub fn with_cutoff(mut self, cutoff: Option<NaiveDate>) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn cutoff(&self) -> Option<NaiveDate> {
        self.cutoff
    }

    /// Decide on a task given its section label in the current project.
    pub fn decide(&self, section: &str, task: &RawTask) -> Decision {
        let section = normalize(section);

        if IGNORED_SECTION_TOKENS.iter().any(|t| section.contains(t)) {
            return Decision::Exclude(ExclusionReason::IgnoredSection);
        }

        let Some(cutoff) = self.cutoff else {
            return Decision::Include;
        };
        if !CLOSED_SECTION_TOKENS.iter().any(|t| section.contains(t)) {
            return Decision::Include;
        }

        // Unparseable timestamps keep the task
        match parse_date(task.last_touched()) {
            Some(touched) if touched < cutoff => Decision::Exclude(ExclusionReason::ClosedBeforeCutoff),
            _ => Decision::Include,
        }
    }
}
