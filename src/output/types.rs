//! Output error type and run metadata

use crate::model::CourseIdentity;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Context of a batch run shown alongside its report
#[derive(Debug, Clone)]
pub struct RunInfo {
    /// Year and semester of the run; the course id is unused
    pub template: CourseIdentity,

    /// Requested course count, cached ones included
    pub requested: usize,

    /// Hash of the configuration file, if one was loaded
    pub config_hash: Option<String>,

    /// RFC 3339 timestamp of when the run finished
    pub finished_at: String,
}

impl RunInfo {
    pub fn new(template: CourseIdentity, requested: usize) -> Self {
        Self {
            template,
            requested,
            config_hash: None,
            finished_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }
}
