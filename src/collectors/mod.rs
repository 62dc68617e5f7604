//! Source collectors
//!
//! Each collector targets one upstream endpoint and one response shape:
//! - `ScheduleCollector`: lesson hours from the JSON timetable service
//! - `SyllabusCollector`: credits, faculty, instructor and name from the syllabus page
//! - `GeneralInfoCollector`: faculty and name from the general info page (fallback source)
//! - `ExamDatesCollector`: exam dates of the requested semester
//!
//! A collector only describes its request and parses the body; the network
//! round trip goes through the shared [`FetchClient`]. Collectors never retry.

mod exams;
mod general_info;
mod html;
mod schedule;
mod syllabus;

pub use exams::{parse_exam_dates, ExamDatesCollector};
pub use general_info::{parse_general_info, GeneralInfoCollector};
pub use schedule::{parse_schedule, ScheduleCollector};
pub use syllabus::{parse_syllabus, SyllabusCollector};

use crate::harvest::{FetchClient, SourceRequest};
use crate::{CollectError, CollectResult};

/// One upstream source and the shape of its response
pub trait Collector {
    /// Partial record produced by this source
    type Output;

    /// Source name used in errors and logs
    const SOURCE: &'static str;

    /// The request to send for this collector's course
    fn request(&self) -> SourceRequest;

    /// Parses a response body; never performs I/O
    fn parse(&self, body: &str) -> CollectResult<Self::Output>;
}

/// Fetches a collector's source and parses the response
///
/// Transport failures become [`CollectError::SourceUnreachable`].
pub async fn collect<C>(collector: &C, fetch: &FetchClient) -> CollectResult<C::Output>
where
    C: Collector + Sync,
{
    let request = collector.request();
    tracing::debug!("Fetching {} from {}", C::SOURCE, request.url);

    let body = fetch
        .send(&request)
        .await
        .map_err(|source| CollectError::SourceUnreachable {
            source_name: C::SOURCE,
            url: request.url.clone(),
            source,
        })?;

    collector.parse(&body)
}
