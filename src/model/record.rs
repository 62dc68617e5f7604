//! Partial collector results and the canonical course record
use crate::model::{CourseIdentity, RawLessonHour};
use serde::{Deserialize, Serialize};

/// Fields scraped from the syllabus page; all absent when the course has no syllabus
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyllabusInfo {
    pub credit_points: Option<String>,
    pub faculty: Option<String>,
    pub instructor: Option<String>,
    pub course_name: Option<String>,
}

impl SyllabusInfo {
    /// The result for a course without a syllabus
    pub fn absent() -> Self {
        Self::default()
    }

    /// Name and faculty, when the syllabus provided both
    pub fn identity_fields(&self) -> Option<(&str, &str)> {
        match (self.course_name.as_deref(), self.faculty.as_deref()) {
            (Some(name), Some(faculty)) => Some((name, faculty)),
            _ => None,
        }
    }
}

/// Fields scraped from the general info page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralInfo {
    pub faculty: String,
    pub course_name: String,
}

/// Syllabus data with name and faculty resolved, possibly through the general info fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDetails {
    pub credit_points: Option<String>,
    pub instructor: Option<String>,
    pub faculty: String,
    pub course_name: String,
}

impl CourseDetails {
    /// Takes name and faculty from the syllabus itself
    ///
    /// Returns `None` if either is missing.
    pub fn from_syllabus(syllabus: &SyllabusInfo) -> Option<Self> {
        let (name, faculty) = syllabus.identity_fields()?;
        Some(Self {
            credit_points: syllabus.credit_points.clone(),
            instructor: syllabus.instructor.clone(),
            faculty: faculty.to_string(),
            course_name: name.to_string(),
        })
    }

    /// Takes name and faculty from the general info page, credits and instructor from the syllabus
    pub fn with_fallback(syllabus: SyllabusInfo, general: GeneralInfo) -> Self {
        Self {
            credit_points: syllabus.credit_points,
            instructor: syllabus.instructor,
            faculty: general.faculty,
            course_name: general.course_name,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.faculty.is_empty() && !self.course_name.is_empty()
    }
}

/// First or second exam sitting ("moed")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExamSitting {
    A,
    B,
}

impl ExamSitting {
    pub fn key(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
        }
    }
}

/// Exam dates of the requested semester, at most one per sitting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamDates {
    first: Option<String>,
    second: Option<String>,
}

impl ExamDates {
    /// Sets the date of a sitting, replacing an earlier one
    pub fn insert(&mut self, sitting: ExamSitting, date: String) {
        match sitting {
            ExamSitting::A => self.first = Some(date),
            ExamSitting::B => self.second = Some(date),
        }
    }

    pub fn get(&self, sitting: ExamSitting) -> Option<&str> {
        match sitting {
            ExamSitting::A => self.first.as_deref(),
            ExamSitting::B => self.second.as_deref(),
        }
    }

    pub fn len(&self) -> usize {
        usize::from(self.first.is_some()) + usize::from(self.second.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The `general` block of a course record, in the planner's key order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseGeneral {
    #[serde(rename = "אחראים")]
    pub responsible_person: String,
    #[serde(rename = "הערות")]
    pub notes: String,
    #[serde(rename = "הרצאה")]
    pub lecture_hours: String,
    #[serde(rename = "מספר מקצוע")]
    pub course_number: String,
    #[serde(rename = "מעבדה")]
    pub lab_hours: String,
    #[serde(rename = "מקצועות ללא זיכוי נוסף")]
    pub no_extra_credit_courses: String,
    #[serde(rename = "מקצועות קדם")]
    pub prerequisites: String,
    #[serde(rename = "נקודות")]
    pub credits: String,
    #[serde(rename = "סילבוס")]
    pub syllabus: String,
    #[serde(rename = "סמינר/פרויקט")]
    pub seminar_project: String,
    #[serde(rename = "פקולטה")]
    pub faculty: String,
    #[serde(rename = "שם מקצוע")]
    pub course_name: String,
    #[serde(rename = "תרגיל")]
    pub exercise_hours: String,
    #[serde(rename = "מועד א", default, skip_serializing_if = "Option::is_none")]
    pub exam_date_a: Option<String>,
    #[serde(rename = "מועד ב", default, skip_serializing_if = "Option::is_none")]
    pub exam_date_b: Option<String>,
}

/// Canonical per-course record, persisted and later injected into the planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub general: CourseGeneral,
    pub schedule: Vec<RawLessonHour>,
}

impl CourseRecord {
    /// Merges the collector outputs into a record
    pub fn assemble(
        identity: &CourseIdentity,
        details: CourseDetails,
        exams: &ExamDates,
        schedule: Vec<RawLessonHour>,
    ) -> Self {
        let general = CourseGeneral {
            responsible_person: details.instructor.unwrap_or_default(),
            notes: String::new(),
            lecture_hours: "2".to_string(),
            course_number: identity.course_id.clone(),
            lab_hours: "0".to_string(),
            no_extra_credit_courses: String::new(),
            prerequisites: String::new(),
            credits: details.credit_points.unwrap_or_default(),
            syllabus: String::new(),
            seminar_project: "0".to_string(),
            faculty: details.faculty,
            course_name: details.course_name,
            exercise_hours: "2".to_string(),
            exam_date_a: exams
                .get(ExamSitting::A)
                .map(|date| format!("בתאריך {date} יום ה")),
            exam_date_b: exams
                .get(ExamSitting::B)
                .map(|date| format!("בתאריך {date} יום ו")),
        };

        Self { general, schedule }
    }
}
