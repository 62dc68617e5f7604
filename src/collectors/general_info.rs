//! General info page collector
//!
//! This page has no field labels. Values are found by position:
//!
//! 1. the faculty is the text of `div.courseTitle`
//! 2. the first table after it holds three `<b>`: English name, Hebrew name, course id
//! 3. the table after that holds exactly six cells of course details
//!
//! All positional knowledge about the page lives in this file. The expected
//! counts are checked so a layout change fails loudly instead of returning the
//! wrong cell.

use crate::collectors::html::{element_text, elements_in_order, next_tag_after, selector};
use crate::collectors::Collector;
use crate::config::SourcesConfig;
use crate::harvest::SourceRequest;
use crate::model::{CourseIdentity, GeneralInfo};
use crate::{CollectError, CollectResult};
use scraper::Html;

const SOURCE: &str = "general info";

const NAME_CELLS: usize = 3;
const HEBREW_NAME_CELL: usize = 1;
const DETAIL_CELLS: usize = 6;

/// Collects faculty and Hebrew course name from the general info page
#[derive(Debug, Clone)]
pub struct GeneralInfoCollector {
    url: String,
    course_id: String,
    year: i32,
}

impl GeneralInfoCollector {
    pub fn new(identity: &CourseIdentity, sources: &SourcesConfig) -> Self {
        Self {
            url: sources.shnaton_url.clone(),
            course_id: identity.course_id.clone(),
            year: identity.year,
        }
    }
}

impl Collector for GeneralInfoCollector {
    type Output = GeneralInfo;
    const SOURCE: &'static str = SOURCE;

    fn request(&self) -> SourceRequest {
        SourceRequest::post(&self.url)
            .form("peula", "Simple")
            .form("maslul", 0)
            .form("shana", 0)
            .form("year", self.year)
            .form("course", &self.course_id)
    }

    fn parse(&self, body: &str) -> CollectResult<Self::Output> {
        parse_general_info(body)
    }
}

/// Parses the general info page
pub fn parse_general_info(body: &str) -> CollectResult<GeneralInfo> {
    let document = Html::parse_document(body);
    let elements = elements_in_order(&document);

    let title = elements
        .iter()
        .position(|element| {
            element.value().name() == "div"
                && element.value().classes().any(|class| class == "courseTitle")
        })
        .ok_or_else(|| CollectError::malformed(SOURCE, "missing div.courseTitle"))?;
    let faculty = element_text(elements[title]).trim().to_string();

    let names_table = next_tag_after(&elements, title, "table")
        .ok_or_else(|| CollectError::malformed(SOURCE, "missing course name table"))?;
    let bold = selector(SOURCE, "b")?;
    let names: Vec<String> = elements[names_table]
        .select(&bold)
        .map(element_text)
        .collect();
    if names.len() != NAME_CELLS {
        return Err(CollectError::malformed(
            SOURCE,
            format!("expected {} names, found {}", NAME_CELLS, names.len()),
        ));
    }

    let details_table = next_tag_after(&elements, names_table, "table")
        .ok_or_else(|| CollectError::malformed(SOURCE, "missing course details table"))?;
    let cell = selector(SOURCE, "td")?;
    let detail_count = elements[details_table].select(&cell).count();
    if detail_count != DETAIL_CELLS {
        return Err(CollectError::malformed(
            SOURCE,
            format!("expected {} detail cells, found {}", DETAIL_CELLS, detail_count),
        ));
    }

    Ok(GeneralInfo {
        faculty,
        course_name: names[HEBREW_NAME_CELL].trim().to_string(),
    })
}
