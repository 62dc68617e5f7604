//! Harvest module for downloading and caching course records
//!
//! This module contains the run-level logic, including:
//! - HTTP fetching with shared default headers
//! - Per-course aggregation with the syllabus fallback
//! - Bounded-concurrency batch scheduling

mod aggregator;
mod batch;
mod fetcher;

pub use aggregator::{Aggregate, CourseAggregator};
pub use batch::{run_batch, BatchReport, CourseOutcome};
pub use fetcher::{build_http_client, effective_headers, FetchClient, SourceRequest};

use crate::config::Config;
use crate::model::CourseIdentity;
use crate::storage::{plan_downloads, FileStore};
use std::sync::Arc;

/// Downloads every requested course not already cached in the output directory
///
/// This is the main entry point for a download run. It will:
/// 1. Build the shared HTTP client
/// 2. Open the record directory
/// 3. Skip courses that already have a record, unless `recreate` is set
/// 4. Aggregate the rest with bounded concurrency
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `course_ids` - Requested course ids
/// * `template` - Year and semester shared by all courses
/// * `recreate` - Re-download courses that already have a record
///
/// # Returns
///
/// * `Ok(BatchReport)` - The batch ran; individual courses may still have failed
/// * `Err(CheeseError)` - The run could not start
pub async fn download_courses(
    config: &Config,
    course_ids: &[String],
    template: &CourseIdentity,
    recreate: bool,
) -> crate::Result<BatchReport> {
    let fetch = FetchClient::new(&config.fetch)?;
    let store = FileStore::open(&config.output.directory)?;

    let planned = plan_downloads(&store, course_ids, template, recreate);
    let skipped = course_ids.len().saturating_sub(planned.len());
    if skipped > 0 {
        tracing::info!("Skipping {} courses with existing records", skipped);
    }

    let aggregator = Arc::new(CourseAggregator::new(fetch, config.sources.clone(), store));
    let mut report = run_batch(aggregator, &planned, template, &config.batch).await;
    report.skipped = skipped;

    Ok(report)
}
