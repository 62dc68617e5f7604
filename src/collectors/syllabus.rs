//! Syllabus page collector
//!
//! The syllabus page is a flat list of `<div>`s, each holding a label element
//! followed by its value. Labels are matched on their exact text, trailing
//! spaces included.

use crate::collectors::html::{element_text, selector};
use crate::collectors::Collector;
use crate::config::SourcesConfig;
use crate::harvest::SourceRequest;
use crate::model::{CourseIdentity, SyllabusInfo};
use crate::{CollectError, CollectResult};
use scraper::{ElementRef, Html, Node};
use std::collections::HashMap;

const SOURCE: &str = "syllabus";

/// Phrase shown instead of the syllabus when the course has none
const NO_SYLLABUS_MARKER: &str = "אין סילבוס";

const CREDITS_LABEL: &str = "נקודות זכות באוניברסיטה העברית: ";
const FACULTY_LABEL: &str = "היחידה האקדמית שאחראית על הקורס:  ";
const INSTRUCTOR_LABEL: &str = "מורה אחראי על הקורס (רכז): ";

/// Collects credits, faculty, instructor and course name from the syllabus page
#[derive(Debug, Clone)]
pub struct SyllabusCollector {
    url: String,
}

impl SyllabusCollector {
    pub fn new(identity: &CourseIdentity, sources: &SourcesConfig) -> Self {
        let url = sources
            .syllabus_url
            .replace("{course}", &identity.course_id)
            .replace("{year}", &identity.year.to_string());
        Self { url }
    }
}

impl Collector for SyllabusCollector {
    type Output = SyllabusInfo;
    const SOURCE: &'static str = SOURCE;

    fn request(&self) -> SourceRequest {
        SourceRequest::get(&self.url)
    }

    fn parse(&self, body: &str) -> CollectResult<Self::Output> {
        parse_syllabus(body)
    }
}

/// Parses a syllabus page
///
/// A page carrying the "no syllabus" marker yields an all-absent result, which
/// is not an error. Otherwise the three labeled fields and the title must all
/// be present; blank values are reported as absent.
pub fn parse_syllabus(body: &str) -> CollectResult<SyllabusInfo> {
    let document = Html::parse_document(body);

    let page_text = element_text(document.root_element());
    if page_text.contains(NO_SYLLABUS_MARKER) {
        return Ok(SyllabusInfo::absent());
    }

    let fields = labeled_fields(&document)?;
    let field = |label: &str| {
        fields
            .get(label)
            .map(|value| non_blank(value))
            .ok_or_else(|| CollectError::malformed(SOURCE, format!("missing field {label:?}")))
    };

    let credit_points = field(CREDITS_LABEL)?;
    let faculty = field(FACULTY_LABEL)?;
    let instructor = field(INSTRUCTOR_LABEL)?;

    let title_selector = selector(SOURCE, "span.h1Syl")?;
    let title = document
        .select(&title_selector)
        .next()
        .map(element_text)
        .ok_or_else(|| CollectError::malformed(SOURCE, "missing course title"))?;
    let course_name = title
        .trim()
        .split(" - ")
        .next()
        .and_then(non_blank);

    Ok(SyllabusInfo {
        credit_points,
        faculty,
        instructor,
        course_name,
    })
}

/// Maps each div's label (its second child) to its value (its last child)
///
/// Later divs win when a label repeats.
fn labeled_fields(document: &Html) -> CollectResult<HashMap<String, String>> {
    let div_selector = selector(SOURCE, "div")?;
    let mut fields = HashMap::new();

    for div in document.select(&div_selector) {
        let children: Vec<_> = div.children().collect();
        if children.len() < 2 {
            continue;
        }

        let node_text = |index: usize| match ElementRef::wrap(children[index]) {
            Some(element) => element_text(element),
            None => match children[index].value() {
                Node::Text(text) => String::from(&**text),
                _ => String::new(),
            },
        };

        let label = node_text(1);
        let value = node_text(children.len() - 1).trim_matches('\n').to_string();
        fields.insert(label, value);
    }

    Ok(fields)
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
