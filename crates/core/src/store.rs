//! Persistent Progress Store
//!
//! Loads and saves the whole [`ProgressRecord`] at once. There is no locking:
//! one process, one session. Two processes sharing a file will overwrite each
//! other (last writer wins).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::progress::ProgressRecord;

/// Defines the contract for durable storage of the progress record.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressStore: Send + Sync {
    /// Returns the saved record, or an empty one if nothing was saved yet.
    fn load(&self) -> Result<ProgressRecord, StorageError>;

    /// Replaces the saved record with `record`.
    fn save(&self, record: &ProgressRecord) -> Result<(), StorageError>;
}

/// Stores the record as a pretty-printed JSON document on disk.
///
/// Saves go through a sibling temporary file that is renamed over the target,
/// so a reader never sees a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "progress.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_err(&self, source: io::Error) -> StorageError {
        StorageError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

/// Encodes `record` with four-space indentation and no trailing newline.
pub fn encode_record(record: &ProgressRecord) -> Result<Vec<u8>, StorageError> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    record
        .serialize(&mut serializer)
        .map_err(StorageError::Encode)?;
    Ok(buf)
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> Result<ProgressRecord, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No progress file yet, starting empty");
                return Ok(ProgressRecord::new());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if text.trim().is_empty() {
            warn!(path = %self.path.display(), "Progress file is empty, starting empty");
            return Ok(ProgressRecord::new());
        }

        serde_json::from_str(&text).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let bytes = encode_record(record)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_err(e))?;
        }

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path).map_err(|e| self.write_err(e))?;
        file.write_all(&bytes).map_err(|e| self.write_err(e))?;
        file.sync_all().map_err(|e| self.write_err(e))?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.write_err(e));
        }

        debug!(path = %self.path.display(), bytes = bytes.len(), "Progress saved");
        Ok(())
    }
}
