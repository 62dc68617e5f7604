//! Course aggregator - builds and persists one course record
//!
//! For one course this module:
//! - Runs the timetable, syllabus and exam collectors concurrently
//! - Falls back to the general info page when the syllabus lacks a name or faculty
//! - Merges everything into a `CourseRecord` and persists it
//!
//! Any collector failure not covered by the fallback fails this course only.

use crate::collectors::{
    collect, ExamDatesCollector, GeneralInfoCollector, ScheduleCollector, SyllabusCollector,
};
use crate::config::SourcesConfig;
use crate::harvest::FetchClient;
use crate::model::{CourseDetails, CourseIdentity, CourseRecord, SyllabusInfo};
use crate::storage::RecordStore;
use crate::{AggregationFailed, FailureCause};
use std::future::Future;

/// Produces the record of a single course
///
/// This is the seam the batch orchestrator schedules work through.
pub trait Aggregate: Send + Sync {
    fn aggregate(
        &self,
        identity: &CourseIdentity,
    ) -> impl Future<Output = Result<CourseRecord, AggregationFailed>> + Send;
}

/// Progress of resolving a course's name and faculty
#[derive(Debug)]
enum Resolution {
    /// The syllabus has been fetched
    SyllabusAttempted(SyllabusInfo),
    /// The syllabus lacked the name or the faculty
    FallbackNeeded(SyllabusInfo),
    /// Terminal
    Merged(CourseDetails),
}

/// Aggregates courses from the live sources and persists them to a store
pub struct CourseAggregator<S> {
    fetch: FetchClient,
    sources: SourcesConfig,
    store: S,
}

impl<S: RecordStore> CourseAggregator<S> {
    pub fn new(fetch: FetchClient, sources: SourcesConfig, store: S) -> Self {
        Self {
            fetch,
            sources,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Collects and merges a course record without persisting it
    pub async fn build_record(&self, identity: &CourseIdentity) -> Result<CourseRecord, FailureCause> {
        let schedule = ScheduleCollector::new(identity, &self.sources);
        let syllabus = SyllabusCollector::new(identity, &self.sources);
        let exams = ExamDatesCollector::new(identity, &self.sources);

        let (lessons, syllabus, exams) = tokio::try_join!(
            collect(&schedule, &self.fetch),
            collect(&syllabus, &self.fetch),
            collect(&exams, &self.fetch),
        )?;

        let details = self.resolve_details(identity, syllabus).await?;

        Ok(CourseRecord::assemble(identity, details, &exams, lessons))
    }

    async fn resolve_details(
        &self,
        identity: &CourseIdentity,
        syllabus: SyllabusInfo,
    ) -> Result<CourseDetails, FailureCause> {
        let mut state = Resolution::SyllabusAttempted(syllabus);

        loop {
            state = match state {
                Resolution::SyllabusAttempted(syllabus) => {
                    match CourseDetails::from_syllabus(&syllabus) {
                        Some(details) => Resolution::Merged(details),
                        None => Resolution::FallbackNeeded(syllabus),
                    }
                }
                Resolution::FallbackNeeded(syllabus) => {
                    tracing::warn!(
                        "Syllabus of {} has no name or faculty, using general info page",
                        identity.course_id
                    );
                    let collector = GeneralInfoCollector::new(identity, &self.sources);
                    let general = collect(&collector, &self.fetch).await?;
                    Resolution::Merged(CourseDetails::with_fallback(syllabus, general))
                }
                Resolution::Merged(details) => {
                    return if details.is_complete() {
                        Ok(details)
                    } else {
                        Err(FailureCause::MissingIdentity)
                    };
                }
            };
        }
    }
}

impl<S: RecordStore> Aggregate for CourseAggregator<S> {
    /// Builds the record, then persists it; nothing is written for a failed course
    fn aggregate(
        &self,
        identity: &CourseIdentity,
    ) -> impl Future<Output = Result<CourseRecord, AggregationFailed>> + Send {
        async move {
            tracing::debug!("Aggregating {}", identity);

            let record = self
                .build_record(identity)
                .await
                .map_err(|cause| AggregationFailed::new(&identity.course_id, cause))?;

            self.store
                .save(identity, &record)
                .map_err(|e| AggregationFailed::new(&identity.course_id, e))?;

            Ok(record)
        }
    }
}
