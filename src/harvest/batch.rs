//! Batch orchestrator - aggregates many courses with bounded concurrency
//!
//! Every course runs as its own task. A counting semaphore admits at most
//! `max-concurrent-courses` aggregations at a time. A failed course is recorded
//! in the report and never stops its siblings.

use crate::config::BatchConfig;
use crate::harvest::Aggregate;
use crate::model::{CourseIdentity, CourseRecord};
use crate::{AggregationFailed, FailureCause};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Result of one course in a batch
#[derive(Debug)]
pub struct CourseOutcome {
    pub course_id: String,
    pub result: Result<CourseRecord, AggregationFailed>,
}

/// Per-course results of a batch run, in request order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<CourseOutcome>,

    /// Requested courses left out because a cached record already existed
    pub skipped: usize,

    pub elapsed: Duration,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successes(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count()
    }

    /// `(course_id, reason)` of every failed course
    pub fn failures(&self) -> Vec<(&str, &AggregationFailed)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match &outcome.result {
                Ok(_) => None,
                Err(failure) => Some((outcome.course_id.as_str(), failure)),
            })
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }
}

/// Runs the aggregator over every course
///
/// # Arguments
///
/// * `aggregator` - Shared aggregator, one task per course borrows it
/// * `course_ids` - Courses to aggregate; a repeated id runs once
/// * `template` - Year and semester applied to every course
/// * `config` - Concurrency cap and progress interval
///
/// # Returns
///
/// A report with one tagged result per course. Course failures, including a
/// panicking task, are reported there; this function itself never fails.
pub async fn run_batch<A>(
    aggregator: Arc<A>,
    course_ids: &[String],
    template: &CourseIdentity,
    config: &BatchConfig,
) -> BatchReport
where
    A: Aggregate + 'static,
{
    let mut seen = BTreeSet::new();
    let course_ids: Vec<&String> = course_ids
        .iter()
        .filter(|course_id| seen.insert(course_id.as_str()))
        .collect();

    let total = course_ids.len();
    let start_time = Instant::now();
    tracing::info!(
        "Aggregating {} courses, at most {} at a time",
        total,
        config.max_concurrent_courses
    );

    let gate = Arc::new(Semaphore::new(config.max_concurrent_courses.max(1)));
    let completed = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::with_capacity(total);
    for course_id in course_ids {
        let identity = template.for_course(course_id.as_str());
        let aggregator = Arc::clone(&aggregator);
        let gate = Arc::clone(&gate);
        let completed = Arc::clone(&completed);

        let handle = tokio::spawn(async move {
            let result = match gate.acquire_owned().await {
                Ok(_permit) => aggregator.aggregate(&identity).await,
                Err(closed) => Err(AggregationFailed::new(
                    &identity.course_id,
                    FailureCause::Aborted(closed.to_string()),
                )),
            };
            completed.fetch_add(1, Ordering::Relaxed);
            result
        });

        handles.push((course_id.clone(), handle));
    }

    let reporter = (config.progress_interval_ms > 0).then(|| {
        spawn_progress_reporter(
            Arc::clone(&completed),
            total,
            Duration::from_millis(config.progress_interval_ms),
        )
    });

    let mut outcomes = Vec::with_capacity(total);
    for (course_id, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(join_error) => Err(AggregationFailed::new(
                &course_id,
                FailureCause::Aborted(join_error.to_string()),
            )),
        };

        match &result {
            Ok(_) => tracing::debug!("Course {} done", course_id),
            Err(failure) => tracing::error!("{}", failure),
        }

        outcomes.push(CourseOutcome { course_id, result });
    }

    if let Some(reporter) = reporter {
        reporter.abort();
    }

    let report = BatchReport {
        outcomes,
        skipped: 0,
        elapsed: start_time.elapsed(),
    };

    tracing::info!(
        "Successfully downloaded {} of {} courses in {:?}",
        report.successes(),
        total,
        report.elapsed
    );

    report
}

/// Logs `completed/total` on a fixed interval until everything finished
fn spawn_progress_reporter(
    completed: Arc<AtomicUsize>,
    total: usize,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let done = completed.load(Ordering::Relaxed);
            tracing::info!("Progress: {}/{} courses", done, total);
            if done >= total {
                break;
            }
        }
    })
}
