//! File-per-course record store
use crate::model::{CourseIdentity, CourseRecord};
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Deterministic file name of a course's cached record
pub fn record_file_name(identity: &CourseIdentity) -> String {
    format!(
        "{}_{}_{}.txt",
        identity.course_id,
        identity.year,
        identity.semester.number()
    )
}

/// Rejects course ids that could not name a file inside the record directory
pub fn check_course_id(course_id: &str) -> StorageResult<()> {
    if course_id.is_empty() || course_id.contains(['/', '\\']) {
        return Err(StorageError::InvalidCourseId(course_id.to_string()));
    }
    Ok(())
}

/// Stores each record as a JSON file under one directory
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Opens the store, creating the directory if needed
    pub fn open(directory: impl Into<PathBuf>) -> StorageResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|source| io_error(&directory, source))?;
        Ok(Self { directory })
    }

    /// Full path of a course's record file
    pub fn path_for(&self, identity: &CourseIdentity) -> StorageResult<PathBuf> {
        check_course_id(&identity.course_id)?;
        Ok(self.directory.join(record_file_name(identity)))
    }
}

impl RecordStore for FileStore {
    /// Writes to a temporary sibling first, then renames it over the target
    fn save(&self, identity: &CourseIdentity, record: &CourseRecord) -> StorageResult<()> {
        let path = self.path_for(identity)?;
        let bytes = serde_json::to_vec(record)?;

        let staging = self
            .directory
            .join(format!(".{}.tmp", record_file_name(identity)));

        fs::write(&staging, &bytes).map_err(|source| io_error(&staging, source))?;
        fs::rename(&staging, &path).map_err(|source| io_error(&path, source))?;

        tracing::debug!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    fn load(&self, identity: &CourseIdentity) -> StorageResult<Option<CourseRecord>> {
        let path = self.path_for(identity)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(io_error(&path, source)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StorageError::Decode {
                path: path.display().to_string(),
                source,
            })
    }

    fn contains(&self, identity: &CourseIdentity) -> bool {
        self.path_for(identity).is_ok_and(|path| path.is_file())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}
