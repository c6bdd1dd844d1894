//! File-origin metadata stamped on documents by the loader.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// Where a document was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Path the document was opened from
    pub path: PathBuf,
    /// Final path component
    pub file_name: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// Last modification time, when the platform reports one
    pub modified: Option<DateTime<Utc>>,
}

impl FileInfo {
    /// Reads the file system metadata for `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be read.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size_bytes: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        })
    }
}
