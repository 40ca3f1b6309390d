//! Configuration structures for the export pipeline.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Main configuration for a salespilot run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    /// Task service configuration.
    pub source: SourceConfig,

    /// Export inputs and outputs.
    pub export: ExportConfig,

    /// Field and section mapping overrides.
    pub mapping: MappingConfig,
}

/// Task service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the REST API.
    pub api_base: String,

    /// Tasks requested per page.
    pub page_size: u32,

    /// Task attributes requested from the service.
    pub opt_fields: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base: "https://app.asana.com/api/1.0".to_string(),
            page_size: 100,
            opt_fields: [
                "name",
                "completed",
                "permalink_url",
                "created_at",
                "modified_at",
                "notes",
                "memberships.project.name",
                "memberships.project.gid",
                "memberships.section.name",
                "custom_fields.name",
                "custom_fields.display_value",
                "custom_fields.enum_value.name",
                "custom_fields.number_value",
                "custom_fields.text_value",
                "custom_fields.type",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Export inputs and outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Fee table file. Missing file means no fees.
    pub fees_path: PathBuf,

    /// Default output file.
    pub output_path: PathBuf,

    /// Done/canceled tasks last modified before this date are dropped.
    pub done_cutoff: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            fees_path: PathBuf::from("fees.json"),
            output_path: PathBuf::from("out/sales_pilot.csv"),
            done_cutoff: None,
        }
    }
}

/// Additions to the built-in alias and section tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Extra labels per canonical field name (e.g. `"client": ["COMPRADOR"]`).
    pub extra_aliases: BTreeMap<String, Vec<String>>,

    /// Extra section label to logical status entries.
    pub section_statuses: BTreeMap<String, String>,
}

impl PilotConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

/// Read a JSON document, mapping decode failures to a configuration error.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> crate::Result<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
