//! Combined payload of cached records for the planner's injection layer

use crate::model::{CourseIdentity, CourseRecord};
use crate::output::OutputResult;
use crate::storage::{record_file_name, RecordStore, StorageError, StorageResult};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Name of the script variable the planner reads its courses from
pub const SCRIPT_VARIABLE: &str = "courses_from_rishum";

/// How a payload is written to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    /// JSON object keyed by course id
    Json,
    /// `var courses_from_rishum = [...]`
    Script,
}

impl PayloadFormat {
    /// `.js` files get the script form, everything else JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("js") => Self::Script,
            _ => Self::Json,
        }
    }
}

/// Persisted records of a set of courses, in request order
#[derive(Debug, Clone, Default)]
pub struct CoursePayload {
    records: Vec<(String, CourseRecord)>,
}

impl CoursePayload {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, course_id: &str) -> Option<&CourseRecord> {
        self.records
            .iter()
            .find(|(id, _)| id == course_id)
            .map(|(_, record)| record)
    }

    /// JSON object mapping each course id to its record
    pub fn to_json(&self) -> serde_json::Result<String> {
        let keyed: BTreeMap<&str, &CourseRecord> = self
            .records
            .iter()
            .map(|(id, record)| (id.as_str(), record))
            .collect();
        serde_json::to_string_pretty(&keyed)
    }

    /// Script assignment of the record list
    pub fn to_script(&self) -> serde_json::Result<String> {
        let records: Vec<&CourseRecord> = self.records.iter().map(|(_, record)| record).collect();
        Ok(format!(
            "var {} = {}",
            SCRIPT_VARIABLE,
            serde_json::to_string(&records)?
        ))
    }

    /// Writes the payload in the given format
    pub fn write(&self, path: &Path, format: PayloadFormat) -> OutputResult<()> {
        let rendered = match format {
            PayloadFormat::Json => self.to_json()?,
            PayloadFormat::Script => self.to_script()?,
        };
        fs::write(path, rendered)?;
        Ok(())
    }
}

/// Reads the persisted record of every requested course
///
/// # Arguments
///
/// * `store` - Store the batch persisted into
/// * `course_ids` - Requested courses; duplicates are collapsed
/// * `template` - Year and semester of the records
///
/// # Returns
///
/// * `Ok(CoursePayload)` - Every requested course had a record
/// * `Err(StorageError::RecordMissing)` - At least one course was never persisted
pub fn build_payload(
    store: &dyn RecordStore,
    course_ids: &[String],
    template: &CourseIdentity,
) -> StorageResult<CoursePayload> {
    let mut seen = BTreeSet::new();
    let mut records = Vec::with_capacity(course_ids.len());

    for course_id in course_ids {
        if !seen.insert(course_id.as_str()) {
            continue;
        }

        let identity = template.for_course(course_id.as_str());
        let record = store
            .load(&identity)?
            .ok_or_else(|| StorageError::RecordMissing {
                course_id: course_id.clone(),
                file_name: record_file_name(&identity),
            })?;
        records.push((course_id.clone(), record));
    }

    Ok(CoursePayload { records })
}
