//! Exam dates collector
//!
//! The exam page is a nested table. After four header rows every row has six
//! cells: date, hour, notes, location, sitting ("moed") and semester.

use crate::collectors::html::{element_text, selector};
use crate::collectors::Collector;
use crate::config::SourcesConfig;
use crate::harvest::SourceRequest;
use crate::model::{CourseIdentity, ExamDates, ExamSitting, Semester};
use crate::{CollectError, CollectResult};
use scraper::Html;

const SOURCE: &str = "exam dates";

const HEADER_ROWS: usize = 4;
const ROW_CELLS: usize = 6;
const MOED_CELL: usize = 4;
const SEMESTER_CELL: usize = 5;

/// Only sittings carrying this marker belong to the regular exam track
const TRACK_MARKER: &str = "3";
const FIRST_SITTING_MARKER: &str = "חלקי א";
const SECOND_SITTING_MARKER: &str = "חלקי ב";

/// Collects the exam dates of a course for one semester
#[derive(Debug, Clone)]
pub struct ExamDatesCollector {
    url: String,
    course_id: String,
    year: i32,
    semester: Semester,
}

impl ExamDatesCollector {
    pub fn new(identity: &CourseIdentity, sources: &SourcesConfig) -> Self {
        Self {
            url: sources.shnaton_url.clone(),
            course_id: identity.course_id.clone(),
            year: identity.year,
            semester: identity.semester,
        }
    }
}

impl Collector for ExamDatesCollector {
    type Output = ExamDates;
    const SOURCE: &'static str = SOURCE;

    fn request(&self) -> SourceRequest {
        SourceRequest::post(&self.url)
            .form("peula", "CourseD")
            .form("course", &self.course_id)
            .form("detail", "examDates")
            .form("year", self.year)
            .form("faculty", 2)
            .form("maslul", 0)
    }

    fn parse(&self, body: &str) -> CollectResult<Self::Output> {
        parse_exam_dates(body, self.semester)
    }
}

/// Parses the exam page into the dates of the requested semester
///
/// A row is kept when its semester is not the other semester's (blank
/// semesters are kept) and its sitting carries the track marker. Dates are
/// re-separated with `.`; a later row replaces an earlier one for the same
/// sitting.
pub fn parse_exam_dates(body: &str, semester: Semester) -> CollectResult<ExamDates> {
    let document = Html::parse_document(body);
    let table = selector(SOURCE, "table")?;
    let tbody = selector(SOURCE, "tbody")?;
    let row = selector(SOURCE, "tr")?;
    let cell = selector(SOURCE, "td")?;

    let outer = document
        .select(&table)
        .next()
        .ok_or_else(|| CollectError::malformed(SOURCE, "missing exam table"))?;
    let inner = outer
        .select(&table)
        .next()
        .ok_or_else(|| CollectError::malformed(SOURCE, "missing nested exam table"))?;
    let rows = inner
        .select(&tbody)
        .next()
        .ok_or_else(|| CollectError::malformed(SOURCE, "missing exam table body"))?;

    let mut exams = ExamDates::default();

    for tr in rows.select(&row).skip(HEADER_ROWS) {
        let cells: Vec<String> = tr
            .select(&cell)
            .map(|td| element_text(td).trim().to_string())
            .collect();

        // Layout rows carry no cells at all
        if cells.is_empty() {
            continue;
        }
        if cells.len() != ROW_CELLS {
            return Err(CollectError::malformed(
                SOURCE,
                format!("expected {} cells per exam row, found {}", ROW_CELLS, cells.len()),
            ));
        }

        if semester.conflicts_with(&cells[SEMESTER_CELL]) {
            continue;
        }

        let moed = &cells[MOED_CELL];
        if !moed.contains(TRACK_MARKER) {
            continue;
        }

        let sitting = if moed.contains(FIRST_SITTING_MARKER) {
            ExamSitting::A
        } else if moed.contains(SECOND_SITTING_MARKER) {
            ExamSitting::B
        } else {
            continue;
        };

        exams.insert(sitting, cells[0].replace('-', "."));
    }

    Ok(exams)
}
