//! Error types for the salespilot-core library.

use thiserror::Error;

/// Main error type for the salespilot library.
#[derive(Error, Debug)]
pub enum PilotError {
    /// The task source failed to deliver tasks for a project.
    #[error("task source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a task source. These are fatal to the run.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The service answered with a non-success status.
    #[error("request for project {project} failed with status {status}: {body}")]
    Status {
        project: String,
        status: u16,
        body: String,
    },

    /// The service could not be reached.
    #[error("transport failure for project {project}: {reason}")]
    Transport { project: String, reason: String },

    /// The task payload could not be decoded.
    #[error("malformed task payload for project {project}: {reason}")]
    Payload { project: String, reason: String },

    /// No task data exists for the project.
    #[error("no task data for project {0}")]
    NotFound(String),
}

impl SourceError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors related to run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The project list file does not exist.
    #[error("project list not found: {0}")]
    MissingProjects(String),

    /// A configuration file exists but could not be parsed.
    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    /// A fee fraction is outside [0, 1).
    #[error("fee for {client}/{kind} must be in [0, 1), got {value}")]
    FeeOutOfRange {
        client: String,
        kind: String,
        value: String,
    },

    /// Unknown canonical field name in an alias override.
    #[error("unknown canonical field: {0}")]
    UnknownField(String),
}

/// Result type for the salespilot library.
pub type Result<T> = std::result::Result<T, PilotError>;
