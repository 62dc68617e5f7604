//! Data model for harvested course data
//!
//! # Components
//!
//! - `CourseIdentity`: the `(course, year, semester)` key every collector and the store use
//! - `RawLessonHour`: one scheduled meeting of a course, in source order
//! - `SyllabusInfo`, `GeneralInfo`, `ExamDates`: partial results of the individual collectors
//! - `CourseRecord`: the canonical merged record handed to the planner

mod identity;
mod lesson;
mod record;

pub use identity::{CourseIdentity, Semester};
pub use lesson::{RawLessonHour, SessionType};
pub use record::{CourseDetails, CourseGeneral, CourseRecord, ExamDates, ExamSitting, GeneralInfo, SyllabusInfo};
