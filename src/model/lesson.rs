//! Scheduled meetings of a course
use serde::{Deserialize, Serialize};

/// Canonical classification of a course meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    #[serde(rename = "הרצאה")]
    Lecture,
    #[serde(rename = "תרגול")]
    Tutorial,
    #[serde(rename = "מעבדה")]
    Lab,
}

impl SessionType {
    /// Translates the timetable's abbreviated lesson type
    ///
    /// Returns `None` for labels outside the known vocabulary.
    pub fn from_source_label(label: &str) -> Option<Self> {
        match label {
            "שעור" | "שות" => Some(Self::Lecture),
            "תרג" | "סדנה" => Some(Self::Tutorial),
            "מעב" => Some(Self::Lab),
            _ => None,
        }
    }
}

/// One meeting-time entry of a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLessonHour {
    #[serde(rename = "מרצה/מתרגל")]
    pub teacher: String,

    #[serde(rename = "קבוצה")]
    pub group: String,

    /// Shared by every hour of the same lesson
    #[serde(rename = "מס.", with = "display_string")]
    pub sequence_number: u32,

    #[serde(rename = "סוג")]
    pub session_type: SessionType,

    #[serde(rename = "בניין")]
    pub building: String,

    #[serde(rename = "חדר")]
    pub room: String,

    /// Rendered as `"<end> - <start>"`
    #[serde(rename = "שעה")]
    pub time_range: String,

    #[serde(rename = "יום")]
    pub day_of_week: String,

    /// Semester label of the source entry; not part of the planner's shape
    #[serde(skip)]
    pub semester_tag: String,
}

/// Serializes a value through its `Display`/`FromStr` text form
mod display_string {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}
