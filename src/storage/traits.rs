//! Storage traits and error types
//!
//! This module defines the trait interface for record stores and the
//! associated error type.

use crate::model::{CourseIdentity, CourseRecord};
use thiserror::Error;

/// Errors that can occur while persisting or reading course records
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Corrupt record {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid course id {0:?}")]
    InvalidCourseId(String),

    #[error("No cached record for course {course_id} ({file_name})")]
    RecordMissing { course_id: String, file_name: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Keyed store of course records
///
/// Records are keyed by `(course, year, semester)` and replaced wholesale on
/// every save; there is no history.
pub trait RecordStore: Send + Sync {
    /// Persists a record, overwriting any previous one for the same identity
    fn save(&self, identity: &CourseIdentity, record: &CourseRecord) -> StorageResult<()>;

    /// Reads a record back, `Ok(None)` if it was never saved
    fn load(&self, identity: &CourseIdentity) -> StorageResult<Option<CourseRecord>>;

    /// Returns true if a record exists for the identity
    fn contains(&self, identity: &CourseIdentity) -> bool;
}
