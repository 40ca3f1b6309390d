//! Task sources: where a project's raw tasks come from.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;
use crate::models::task::{Project, RawTask};

/// Supplies the raw tasks of one project per call.
///
/// Failures are fatal to the run and are never retried here.
pub trait TaskSource {
    fn fetch_tasks(&mut self, project: &Project) -> Result<Vec<RawTask>, SourceError>;
}

/// A task list as stored on disk: either bare or wrapped in the API envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum TaskDocument {
    Bare(Vec<RawTask>),
    Envelope { data: Vec<RawTask> },
}

impl TaskDocument {
    fn into_tasks(self) -> Vec<RawTask> {
        match self {
            TaskDocument::Bare(tasks) | TaskDocument::Envelope { data: tasks } => tasks,
        }
    }
}

/// Decode a task list, accepting a bare array or `{"data": [...]}`.
pub fn decode_tasks(project: &Project, json: &str) -> Result<Vec<RawTask>, SourceError> {
    serde_json::from_str::<TaskDocument>(json)
        .map(TaskDocument::into_tasks)
        .map_err(|e| SourceError::Payload {
            project: project.gid.clone(),
            reason: e.to_string(),
        })
}

/// Reads `<dir>/<project gid>.json` exports.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, project: &Project) -> PathBuf {
        self.dir.join(format!("{}.json", project.gid))
    }
}

impl TaskSource for JsonDirSource {
    fn fetch_tasks(&mut self, project: &Project) -> Result<Vec<RawTask>, SourceError> {
        let path = self.path_for(project);
        if !path.exists() {
            return Err(SourceError::NotFound(project.gid.clone()));
        }

        debug!("Reading tasks for project {} from {}", project.gid, path.display());
        let json = std::fs::read_to_string(&path).map_err(|e| SourceError::Transport {
            project: project.gid.clone(),
            reason: e.to_string(),
        })?;
        decode_tasks(project, &json)
    }
}

/// Tasks held in memory, keyed by project gid.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tasks: HashMap<String, Vec<RawTask>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(mut self, project_gid: impl Into<String>, tasks: Vec<RawTask>) -> Self {
        self.tasks.insert(project_gid.into(), tasks);
        self
    }
}

impl TaskSource for MemorySource {
    fn fetch_tasks(&mut self, project: &Project) -> Result<Vec<RawTask>, SourceError> {
        self.tasks
            .get(&project.gid)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(project.gid.clone()))
    }
}
