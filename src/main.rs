//! HUJI-Cheese main entry point
//!
//! This is the command-line interface for the HUJI-Cheese course harvester.

use anyhow::Context;
use chrono::Datelike;
use clap::{ArgGroup, Parser};
use huji_cheese::config::{load_config_with_hash, Config};
use huji_cheese::harvest::download_courses;
use huji_cheese::storage::check_course_id;
use huji_cheese::output::{
    build_payload, print_batch_report, write_markdown_summary, PayloadFormat, RunInfo,
};
use huji_cheese::{CourseIdentity, FileStore, Semester};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// HUJI-Cheese: course data harvester for the CheeseFork planner
///
/// Downloads timetable, syllabus and exam data of the requested courses,
/// normalizes every course into one record and caches it on disk.
#[derive(Parser, Debug)]
#[command(name = "huji-cheese")]
#[command(version = "1.0.0")]
#[command(about = "Downloads HUJI course data for the CheeseFork planner", long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["courses", "course_file"])))]
struct Cli {
    /// Course ids to download
    #[arg(short, long, num_args = 1.., value_name = "ID")]
    courses: Vec<String>,

    /// File with one course id per line
    #[arg(short = 'f', long, value_name = "PATH")]
    course_file: Option<PathBuf>,

    /// Semester to download (a or b)
    #[arg(short, long)]
    semester: Semester,

    /// Academic year
    #[arg(short, long, default_value_t = current_year())]
    year: i32,

    /// Record directory, overrides the configured one
    #[arg(short, long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Download courses again even if a record is cached
    #[arg(long)]
    recreate: bool,

    /// Write the records of all requested courses (`.js` for the script form)
    #[arg(long, value_name = "PATH")]
    export_payload: Option<PathBuf>,

    /// Write a markdown report of the run
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(directory) = &cli.directory {
        config.output.directory = directory.to_string_lossy().into_owned();
    }

    let course_ids = match &cli.course_file {
        Some(path) => read_course_file(path)?,
        None => cli.courses.clone(),
    };
    for course_id in &course_ids {
        check_course_id(course_id)?;
    }
    let template = CourseIdentity::new("", cli.year, cli.semester);

    tracing::info!(
        "Downloading {} courses for {} semester {} into {}",
        course_ids.len(),
        cli.year,
        cli.semester,
        config.output.directory
    );

    let report = download_courses(&config, &course_ids, &template, cli.recreate)
        .await
        .context("Download run could not start")?;

    let mut info = RunInfo::new(template.clone(), course_ids.len());
    if let Some(hash) = config_hash {
        info = info.with_config_hash(hash);
    }

    if !cli.quiet {
        print_batch_report(&report, &info);
    }

    if let Some(path) = &cli.summary {
        write_markdown_summary(&report, &info, path)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
        tracing::info!("Summary written to {}", path.display());
    }

    if let Some(path) = &cli.export_payload {
        let failed: BTreeSet<&str> = report.failures().into_iter().map(|(id, _)| id).collect();
        if !failed.is_empty() {
            tracing::warn!("Leaving {} failed courses out of the payload", failed.len());
        }
        let exported: Vec<String> = course_ids
            .iter()
            .filter(|id| !failed.contains(id.as_str()))
            .cloned()
            .collect();

        export_payload(&config, &exported, &template, path)?;
    }

    if report.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("huji_cheese=info,warn"),
            1 => EnvFilter::new("huji_cheese=debug,info"),
            2 => EnvFilter::new("huji_cheese=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Reads course ids, one per line, ignoring blank lines
fn read_course_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read course file {}", path.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Handles --export-payload: writes the cached records of the given courses
fn export_payload(
    config: &Config,
    course_ids: &[String],
    template: &CourseIdentity,
    path: &Path,
) -> anyhow::Result<()> {
    let store = FileStore::open(&config.output.directory)?;
    let payload = build_payload(&store, course_ids, template)?;

    let format = PayloadFormat::from_path(path);
    payload
        .write(path, format)
        .with_context(|| format!("Failed to write payload {}", path.display()))?;

    tracing::info!(
        "Exported {} course records to {} ({:?})",
        payload.len(),
        path.display(),
        format
    );
    Ok(())
}
