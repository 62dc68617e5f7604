//! Timetable collector
//!
//! The timetable service answers with `{"lessons": [...]}`; every lesson has an
//! abbreviated type label and a list of hour entries, each tagged with the
//! semester it belongs to.

use crate::collectors::Collector;
use crate::config::SourcesConfig;
use crate::harvest::SourceRequest;
use crate::model::{CourseIdentity, RawLessonHour, Semester, SessionType};
use crate::{CollectError, CollectResult};
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;

const SOURCE: &str = "timetable";

/// Sequence number of the first lesson; later lessons count up from here
const FIRST_SEQUENCE_NUMBER: u32 = 10;

/// Collects the lesson hours of a course for one semester
#[derive(Debug, Clone)]
pub struct ScheduleCollector {
    url: String,
    course_id: String,
    year: i32,
    semester: Semester,
}

impl ScheduleCollector {
    pub fn new(identity: &CourseIdentity, sources: &SourcesConfig) -> Self {
        Self {
            url: sources.schedule_url.clone(),
            course_id: identity.course_id.clone(),
            year: identity.year,
            semester: identity.semester,
        }
    }
}

impl Collector for ScheduleCollector {
    type Output = Vec<RawLessonHour>;
    const SOURCE: &'static str = SOURCE;

    fn request(&self) -> SourceRequest {
        SourceRequest::get(&self.url)
            .query("year", self.year)
            .query("course", &self.course_id)
    }

    fn parse(&self, body: &str) -> CollectResult<Self::Output> {
        parse_schedule(body, self.semester)
    }
}

#[derive(Debug, Deserialize)]
struct TimetableResponse {
    lessons: Vec<Lesson>,
}

#[derive(Debug, Deserialize)]
struct Lesson {
    teacher: Scalar,
    group: Scalar,
    #[serde(rename = "type")]
    kind: String,
    hours: Vec<HourEntry>,
}

#[derive(Debug, Deserialize)]
struct HourEntry {
    #[serde(default)]
    semester: Option<String>,
    #[serde(default)]
    hour: Option<String>,
    /// `None` only when the key is missing; an explicit `null` is kept
    #[serde(default, deserialize_with = "present")]
    place: Option<Scalar>,
    #[serde(default)]
    day: Option<String>,
}

/// A JSON value the timetable sends as text, number or null interchangeably
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Null,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Scalar>, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Some)
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
            Self::Null => String::new(),
        }
    }
}

/// Parses a timetable response into lesson hours of the requested semester
///
/// # Filtering
///
/// | Hour entry | Action |
/// |------------|--------|
/// | Tagged with the other semester | Skipped |
/// | No semester tag at all | Skipped |
/// | Empty hour (unscheduled placeholder) | Skipped |
/// | Anything else | Emitted, in source order |
///
/// # Errors
///
/// * `UnknownSessionType` - a lesson type outside the known vocabulary
/// * `MalformedResponse` - the body is not the expected JSON, or an emitted hour
///   lacks its place, day or a `start-end` range
pub fn parse_schedule(body: &str, semester: Semester) -> CollectResult<Vec<RawLessonHour>> {
    let response: TimetableResponse = serde_json::from_str(&fold_control_chars(body))
        .map_err(|e| CollectError::malformed(SOURCE, e.to_string()))?;

    let mut hours = Vec::new();
    let mut sequence_number = FIRST_SEQUENCE_NUMBER;

    for lesson in response.lessons {
        let session_type = SessionType::from_source_label(&lesson.kind)
            .ok_or_else(|| CollectError::UnknownSessionType(lesson.kind.clone()))?;
        let teacher = lesson.teacher.into_text();
        let group = lesson.group.into_text();

        for entry in lesson.hours {
            let Some(tag) = entry.semester else {
                continue;
            };
            if semester.conflicts_with(&tag) {
                continue;
            }

            let hour = entry.hour.unwrap_or_default();
            if hour.trim().is_empty() {
                continue;
            }

            let time_range = render_time_range(&hour)?;
            let building = entry
                .place
                .map(Scalar::into_text)
                .ok_or_else(|| CollectError::malformed(SOURCE, format!("hour {hour:?} has no place")))?;
            let day = entry
                .day
                .ok_or_else(|| CollectError::malformed(SOURCE, format!("hour {hour:?} has no day")))?;

            hours.push(RawLessonHour {
                teacher: teacher.clone(),
                group: group.clone(),
                sequence_number,
                session_type,
                building,
                room: String::new(),
                time_range,
                day_of_week: normalize_day(&day),
                semester_tag: tag,
            });
        }

        sequence_number += 1;
    }

    Ok(hours)
}

/// Re-renders `"<a>-<b>"` as `"<b> - <a>"`, the order the planner expects
fn render_time_range(hour: &str) -> CollectResult<String> {
    match hour.split('-').collect::<Vec<_>>().as_slice() {
        [from, to] => Ok(format!("{} - {}", to.trim(), from.trim())),
        _ => Err(CollectError::malformed(
            SOURCE,
            format!("hour {hour:?} is not a start-end range"),
        )),
    }
}

/// `"יום ג'"` becomes `"ג"`
fn normalize_day(day: &str) -> String {
    day.replace("יום ", "").replace('\'', "")
}

/// The timetable emits raw control characters inside strings
fn fold_control_chars(body: &str) -> Cow<'_, str> {
    if body.chars().any(char::is_control) {
        Cow::Owned(
            body.chars()
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(body)
    }
}
