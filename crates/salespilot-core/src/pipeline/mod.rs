//! The export pipeline: per project, per task, filter then assemble.

mod assembler;
mod filter;
mod source;
mod status;
pub mod summary;

pub use assembler::RecordAssembler;
pub use filter::{Decision, ExclusionReason, SectionFilter};
pub use source::{decode_tasks, JsonDirSource, MemorySource, TaskSource};
pub use status::StatusMap;

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::extract::rules::parse_date;
use crate::extract::{AliasTable, ExtractionIssue};
use crate::finance::FeeTable;
use crate::models::config::{read_json, PilotConfig};
use crate::models::record::CanonicalRecord;
use crate::models::task::{Project, RawTask};
use crate::Result;

/// A field anomaly tied to the task it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskIssue {
    pub project_gid: String,
    pub task_gid: String,
    #[serde(flatten)]
    pub issue: ExtractionIssue,
}

/// Tasks dropped by the filter, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExclusionCounts {
    pub ignored_section: usize,
    pub closed_before_cutoff: usize,
}

impl ExclusionCounts {
    pub fn total(&self) -> usize {
        self.ignored_section + self.closed_before_cutoff
    }

    fn count(&mut self, reason: ExclusionReason) {
        match reason {
            ExclusionReason::IgnoredSection => self.ignored_section += 1,
            ExclusionReason::ClosedBeforeCutoff => self.closed_before_cutoff += 1,
        }
    }
}

/// Output of a run (or of one project).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportResult {
    /// Records in project order, then task order within each project.
    pub records: Vec<CanonicalRecord>,
    /// Values present but unreadable; each became the canonical default.
    pub issues: Vec<TaskIssue>,
    pub excluded: ExclusionCounts,
}

impl ExportResult {
    /// Append another result, keeping order.
    pub fn merge(&mut self, other: ExportResult) {
        self.records.extend(other.records);
        self.issues.extend(other.issues);
        self.excluded.ignored_section += other.excluded.ignored_section;
        self.excluded.closed_before_cutoff += other.excluded.closed_before_cutoff;
    }
}

/// Filters and assembles tasks into canonical records.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    assembler: RecordAssembler,
    filter: SectionFilter,
}

impl Pipeline {
    pub fn new(assembler: RecordAssembler, filter: SectionFilter) -> Self {
        Self { assembler, filter }
    }

    /// Build a pipeline from configuration and an already loaded fee table.
    ///
    /// `cutoff` overrides the configured done-cutoff when given.
    pub fn from_config(config: &PilotConfig, fees: FeeTable, cutoff: Option<&str>) -> Result<Self> {
        let aliases = AliasTable::from_config(&config.mapping)?;
        let statuses = StatusMap::builtin().with_overrides(&config.mapping.section_statuses);
        let cutoff = parse_cutoff(cutoff.or(config.export.done_cutoff.as_deref()));

        Ok(Self::new(
            RecordAssembler::new(aliases, fees, statuses),
            SectionFilter::new().with_cutoff(cutoff),
        ))
    }

    pub fn filter(&self) -> &SectionFilter {
        &self.filter
    }

    /// Process the tasks of one project, in order.
    pub fn process_project(&self, project: &Project, tasks: &[RawTask]) -> ExportResult {
        let mut result = ExportResult::default();

        for task in tasks {
            let section = task.section_in(&project.gid);

            if let Decision::Exclude(reason) = self.filter.decide(section, task) {
                debug!("Excluding task {} in section {:?}: {:?}", task.gid, section, reason);
                result.excluded.count(reason);
                continue;
            }

            let (record, issues) = self.assembler.assemble(project, task, section);
            result.issues.extend(issues.into_iter().map(|issue| TaskIssue {
                project_gid: project.gid.clone(),
                task_gid: task.gid.clone(),
                issue,
            }));
            result.records.push(record);
        }

        info!(
            "Project {} ({}): {} records, {} excluded",
            project.gid,
            project.name,
            result.records.len(),
            result.excluded.total()
        );
        result
    }

    /// Run every project through the pipeline, sequentially. The first
    /// source failure aborts the run.
    pub fn run(&self, projects: &[Project], source: &mut dyn TaskSource) -> Result<ExportResult> {
        let mut result = ExportResult::default();

        for project in projects {
            let tasks = source.fetch_tasks(project)?;
            debug!("Fetched {} tasks for project {}", tasks.len(), project.gid);
            result.merge(self.process_project(project, &tasks));
        }

        if !result.issues.is_empty() {
            warn!("{} field values could not be parsed", result.issues.len());
        }
        Ok(result)
    }
}

/// Load the project list. A missing file is fatal.
pub fn load_projects(path: &Path) -> Result<Vec<Project>> {
    if !path.exists() {
        return Err(ConfigError::MissingProjects(path.display().to_string()).into());
    }
    let projects: Vec<Project> = read_json(path)?;
    info!("Loaded {} projects from {}", projects.len(), path.display());
    Ok(projects)
}

/// Parse a done-cutoff value. Blank means no cutoff; an unparseable value is
/// ignored with a warning.
pub fn parse_cutoff(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let date = parse_date(raw);
    if date.is_none() {
        warn!("Ignoring unparseable done cutoff {:?}", raw);
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PilotError, SourceError};
    use crate::models::task::{Membership, ProjectRef, SectionRef};

    fn task_in(gid: &str, project: &str, section: &str, modified: &str) -> RawTask {
        RawTask {
            gid: gid.to_string(),
            modified_at: modified.to_string(),
            memberships: vec![Membership {
                project: Some(ProjectRef {
                    gid: project.to_string(),
                    name: String::new(),
                }),
                section: Some(SectionRef {
                    name: section.to_string(),
                }),
            }],
            ..RawTask::default()
        }
    }

    fn pipeline_with_cutoff(cutoff: &str) -> Pipeline {
        Pipeline::new(
            RecordAssembler::default(),
            SectionFilter::new().with_cutoff(parse_cutoff(Some(cutoff))),
        )
    }

    #[test]
    fn test_process_project_filters_and_keeps_order() {
        let project = Project::new("1", "Zone East (PO)");
        let tasks = vec![
            task_in("a", "1", "Scheduled", "2024-05-01"),
            task_in("b", "1", "ARCHIVE", "2024-05-01"),
            task_in("c", "1", "Done", "2023-06-01"),
            task_in("d", "1", "Done", "2024-06-01"),
            task_in("e", "2", "Trash", "2024-06-01"),
        ];

        let result = pipeline_with_cutoff("2024-01-01").process_project(&project, &tasks);
        let gids: Vec<_> = result.records.iter().map(|r| r.task_gid.as_str()).collect();
        assert_eq!(gids, vec!["a", "d", "e"]);
        assert_eq!(result.excluded.ignored_section, 1);
        assert_eq!(result.excluded.closed_before_cutoff, 1);

        // no membership in this project: empty section, kept
        assert_eq!(result.records[2].column, "");
        assert_eq!(result.records[1].logical_status, "Done");
    }

    #[test]
    fn test_run_preserves_project_order() {
        let projects = vec![Project::new("2", "B"), Project::new("1", "A")];
        let mut source = MemorySource::new()
            .with_tasks("1", vec![task_in("x", "1", "", ""), task_in("y", "1", "", "")])
            .with_tasks("2", vec![task_in("z", "2", "", "")]);

        let result = Pipeline::default().run(&projects, &mut source).unwrap();
        let gids: Vec<_> = result.records.iter().map(|r| r.task_gid.as_str()).collect();
        assert_eq!(gids, vec!["z", "x", "y"]);
    }

    #[test]
    fn test_run_stops_on_source_failure() {
        let projects = vec![Project::new("1", "A"), Project::new("404", "Gone")];
        let mut source = MemorySource::new().with_tasks("1", vec![]);
        assert!(matches!(
            Pipeline::default().run(&projects, &mut source),
            Err(PilotError::Source(SourceError::NotFound(_)))
        ));
    }

    #[test]
    fn test_parse_cutoff() {
        assert_eq!(parse_cutoff(None), None);
        assert_eq!(parse_cutoff(Some("  ")), None);
        assert_eq!(parse_cutoff(Some("not a date")), None);
        assert_eq!(parse_cutoff(Some("2024-02-01")), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(parse_cutoff(Some("02/01/2024")), NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_load_projects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        assert!(matches!(
            load_projects(&path),
            Err(PilotError::Config(ConfigError::MissingProjects(_)))
        ));

        std::fs::write(&path, r#"[{"gid": 1, "name": "Zone North (WO)"}, {"gid": "2"}]"#).unwrap();
        let projects = load_projects(&path).unwrap();
        assert_eq!(projects, vec![Project::new("1", "Zone North (WO)"), Project::new("2", "")]);
    }

    #[test]
    fn test_from_config_applies_overrides() {
        let mut config = PilotConfig::default();
        config.export.done_cutoff = Some("2024-01-01".to_string());
        config
            .mapping
            .section_statuses
            .insert("En curso".to_string(), "In Progress".to_string());

        let pipeline = Pipeline::from_config(&config, FeeTable::empty(), None).unwrap();
        assert_eq!(pipeline.filter().cutoff(), NaiveDate::from_ymd_opt(2024, 1, 1));

        let overridden = Pipeline::from_config(&config, FeeTable::empty(), Some("2025-03-01")).unwrap();
        assert_eq!(overridden.filter().cutoff(), NaiveDate::from_ymd_opt(2025, 3, 1));

        let project = Project::new("1", "P");
        let result = pipeline.process_project(&project, &[task_in("t", "1", "en curso", "")]);
        assert_eq!(result.records[0].logical_status, "In Progress");
    }
}
