//! Board section to logical status lookup.

use std::collections::{BTreeMap, HashMap};

use crate::extract::rules::normalize;

/// Built-in section labels (as shown on the board, truncations included).
const BUILTIN_STATUSES: &[(&str, &str)] = &[
    ("PROBLEMS IN POR...", "Problems"),
    ("PROBLEMS IN PRO...", "Problems"),
    ("RECALL", "Recall"),
    ("STAND BY", "Stand By"),
    ("UNSCHEDULED", "Unscheduled"),
    ("SCHEDULED", "Scheduled"),
    ("REJECT DP. PROPOSAL", "Rejected Proposal"),
    ("WITHOUT PROPOS...", "Without Proposal"),
    ("QUALITY CONTROL", "Quality Control"),
    ("PENDING INVOICE", "Pending Invoice"),
    ("PENDING PAYMENTS", "Pending Payments"),
    ("DONE", "Done"),
    ("CANCELED", "Canceled"),
];

/// Maps normalized section labels to logical statuses.
#[derive(Debug, Clone)]
pub struct StatusMap {
    entries: HashMap<String, String>,
}

impl StatusMap {
    pub fn builtin() -> Self {
        let entries = BUILTIN_STATUSES
            .iter()
            .map(|(section, status)| (normalize(section), status.to_string()))
            .collect();
        Self { entries }
    }

    /// Built-in entries plus overrides; an override replaces a built-in entry
    /// with the same normalized label.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (section, status) in overrides {
            let key = normalize(section);
            if !key.is_empty() {
                self.entries.insert(key, status.clone());
            }
        }
        self
    }

    /// Logical status for a section. Unknown sections pass through unchanged.
    pub fn logical_status(&self, section: &str) -> String {
        self.entries
            .get(&normalize(section))
            .cloned()
            .unwrap_or_else(|| section.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StatusMap {
    fn default() -> Self {
        Self::builtin()
    }
}
