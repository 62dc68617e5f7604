//! Storage module for cached course records
//!
//! One UTF-8 JSON file per `(course, year, semester)`, named
//! `{course}_{year}_{n}.txt` with `n` = 1 for semester A and 2 for B.
//! The proxy layer reads these files back to build its injected payload.

mod files;
mod traits;

pub use files::{check_course_id, record_file_name, FileStore};
pub use traits::{RecordStore, StorageError, StorageResult};

use crate::model::CourseIdentity;
use std::collections::BTreeSet;

/// Selects the courses that still need downloading
///
/// With `recreate` every requested course is returned; otherwise courses that
/// already have a cached record are skipped. Duplicates are collapsed, keeping
/// the first occurrence's position.
pub fn plan_downloads(
    store: &dyn RecordStore,
    course_ids: &[String],
    template: &CourseIdentity,
    recreate: bool,
) -> Vec<String> {
    let mut seen = BTreeSet::new();
    course_ids
        .iter()
        .filter(|course_id| seen.insert(course_id.as_str()))
        .filter(|course_id| recreate || !store.contains(&template.for_course(course_id.as_str())))
        .cloned()
        .collect()
}
