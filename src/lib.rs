//! HUJI-Cheese: course schedule harvester
//!
//! This crate collects course data from the university's timetable and
//! syllabus services, normalizes it into the record shape expected by the
//! CheeseFork planner, and caches one record per course on disk.

pub mod collectors;
pub mod config;
pub mod harvest;
pub mod model;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for run-level (systemic) failures
#[derive(Debug, Error)]
pub enum CheeseError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised by a single source collector
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("{source_name} unreachable at {url}: {source}")]
    SourceUnreachable {
        source_name: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response from {source_name}: {message}")]
    MalformedResponse {
        source_name: &'static str,
        message: String,
    },

    #[error("Unknown session type: {0:?}")]
    UnknownSessionType(String),
}

impl CollectError {
    pub(crate) fn malformed(source_name: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            source_name,
            message: message.into(),
        }
    }
}

/// Why a single course could not be aggregated
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error("neither the syllabus nor the general info page named the course and its faculty")]
    MissingIdentity,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("aggregation task aborted: {0}")]
    Aborted(String),
}

/// A course-scoped failure, reported per course by the batch orchestrator
#[derive(Debug, Error)]
#[error("Course {course_id} failed: {cause}")]
pub struct AggregationFailed {
    pub course_id: String,
    #[source]
    pub cause: FailureCause,
}

impl AggregationFailed {
    pub fn new(course_id: impl Into<String>, cause: impl Into<FailureCause>) -> Self {
        Self {
            course_id: course_id.into(),
            cause: cause.into(),
        }
    }
}

/// Result type alias for run-level operations
pub type Result<T> = std::result::Result<T, CheeseError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for collector operations
pub type CollectResult<T> = std::result::Result<T, CollectError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{run_batch, Aggregate, BatchReport, CourseAggregator, FetchClient};
pub use model::{CourseIdentity, CourseRecord, Semester};
pub use storage::{FileStore, RecordStore, StorageError, StorageResult};
