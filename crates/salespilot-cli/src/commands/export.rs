//! Export command - build the canonical sales dataset.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use salespilot_core::pipeline::summary::standard_summaries;
use salespilot_core::{
    default_column_order, load_projects, ExportResult, FeeTable, JsonDirSource, PilotConfig,
    Pipeline, Project, RawTask, TaskSource,
};

use crate::asana::AsanaClient;
use crate::output::{records_csv, records_json, safe_write, summaries_csv};

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Project list (JSON array of {"gid", "name"})
    #[arg(short, long, default_value = "projects.json")]
    projects: PathBuf,

    /// Fee table (JSON); a missing file means no fees
    #[arg(long)]
    fees: Option<PathBuf>,

    /// Output file (default from config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from the output extension, else CSV)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Drop done/canceled tasks last modified before this date
    #[arg(long, env = "ASANA_DONE_CUTOFF")]
    done_cutoff: Option<String>,

    /// Access token for the task service
    #[arg(long, env = "ASANA_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Read tasks from <DIR>/<project gid>.json instead of the service
    #[arg(long, value_name = "DIR")]
    tasks_dir: Option<PathBuf>,

    /// Also write per-type and per-zone totals to this CSV file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// List unparseable field values
    #[arg(long)]
    show_issues: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV with sheet-style headers
    Csv,
    /// JSON array of records
    Json,
}

impl OutputFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}

enum Source {
    Dir(JsonDirSource),
    Api(AsanaClient),
}

impl Source {
    async fn fetch(&mut self, project: &Project) -> anyhow::Result<Vec<RawTask>> {
        let tasks = match self {
            Source::Dir(dir) => dir.fetch_tasks(project)?,
            Source::Api(client) => client.fetch_tasks(project).await?,
        };
        Ok(tasks)
    }
}

pub async fn run(args: ExportArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = match config_path {
        Some(path) => PilotConfig::from_file(path)?,
        None => PilotConfig::default(),
    };

    let projects = load_projects(&args.projects)?;
    let fees = FeeTable::load(args.fees.as_deref().unwrap_or(&config.export.fees_path))?;
    let pipeline = Pipeline::from_config(&config, fees, args.done_cutoff.as_deref())?;

    let mut source = match &args.tasks_dir {
        Some(dir) => {
            info!("Reading tasks from {}", dir.display());
            Source::Dir(JsonDirSource::new(dir))
        }
        None => Source::Api(AsanaClient::new(
            &config.source,
            args.token.as_deref().unwrap_or_default(),
        )?),
    };

    let pb = ProgressBar::new(projects.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let mut result = ExportResult::default();
    for project in &projects {
        pb.set_message(project.name.clone());
        let tasks = source.fetch(project).await?;
        result.merge(pipeline.process_project(project, &tasks));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let output_path = args.output.clone().unwrap_or_else(|| config.export.output_path.clone());
    let format = args.format.unwrap_or_else(|| OutputFormat::for_path(&output_path));
    let order = default_column_order();
    let contents = match format {
        OutputFormat::Csv => records_csv(&result.records, &order)?,
        OutputFormat::Json => records_json(&result.records, &order)?,
    };
    report_written(&output_path, &safe_write(&output_path, &contents)?);

    if let Some(summary_path) = &args.summary {
        let summaries = standard_summaries(&result.records);
        report_written(summary_path, &safe_write(summary_path, &summaries_csv(&summaries)?)?);
    }

    print_summary(&result, args.show_issues);
    debug!("Export finished in {:?}", start.elapsed());

    Ok(())
}

fn report_written(requested: &Path, written: &Path) {
    if requested == written {
        println!("{} Output written to {}", style("✓").green(), written.display());
    } else {
        println!(
            "{} Could not replace {} (is it open?). Saved a copy to {}",
            style("⚠").yellow(),
            requested.display(),
            written.display()
        );
    }
}

fn print_summary(result: &ExportResult, show_issues: bool) {
    println!(
        "{} {} records, {} excluded ({} ignored sections, {} closed before cutoff)",
        style("ℹ").blue(),
        style(result.records.len()).green(),
        result.excluded.total(),
        result.excluded.ignored_section,
        result.excluded.closed_before_cutoff
    );

    if result.issues.is_empty() {
        return;
    }

    println!(
        "{} {} field values could not be parsed and were left empty",
        style("⚠").yellow(),
        result.issues.len()
    );
    if show_issues {
        for issue in &result.issues {
            println!(
                "  - task {} field {:?} ({}): {:?}",
                issue.task_gid, issue.issue.label, issue.issue.field, issue.issue.raw
            );
        }
    }
}
