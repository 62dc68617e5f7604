//! Course identity and semester definitions
use std::fmt;
use std::str::FromStr;

/// One of the two teaching semesters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semester {
    A,
    B,
}

impl Semester {
    /// Numeric form used in cache file names
    pub fn number(&self) -> u8 {
        match self {
            Self::A => 1,
            Self::B => 2,
        }
    }

    /// The label the upstream sources attach to entries of this semester
    pub fn source_tag(&self) -> &'static str {
        match self {
            Self::A => "סמסטר א",
            Self::B => "סמסטר ב",
        }
    }

    /// The other semester
    pub fn other(&self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Returns true if a source tag explicitly belongs to the other semester
    ///
    /// Tags that name neither semester (year-long courses, blanks) never conflict.
    pub fn conflicts_with(&self, tag: &str) -> bool {
        tag == self.other().source_tag()
    }
}

impl FromStr for Semester {
    type Err = String;

    /// Parses the command-line selector; only lowercase `a` and `b` are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" => Ok(Self::A),
            "b" => Ok(Self::B),
            other => Err(format!("semester must be 'a' or 'b', got '{other}'")),
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "a"),
            Self::B => write!(f, "b"),
        }
    }
}

/// Identifies one course offering: the cache key and the parameter set of every collector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CourseIdentity {
    pub course_id: String,
    pub year: i32,
    pub semester: Semester,
}

impl CourseIdentity {
    pub fn new(course_id: impl Into<String>, year: i32, semester: Semester) -> Self {
        Self {
            course_id: course_id.into(),
            year,
            semester,
        }
    }

    /// Same year and semester, different course
    pub fn for_course(&self, course_id: impl Into<String>) -> Self {
        Self::new(course_id, self.year, self.semester)
    }
}

impl fmt::Display for CourseIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, semester {})", self.course_id, self.year, self.semester)
    }
}
