//! JSON file store for the persisted creature.
//!
//! The record is written as one flat JSON object with a `saved_at`
//! timestamp added. Writes go to a sibling temp file that is then renamed
//! over the target, so a crash mid-save leaves the previous record intact.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tamafi_core::{PersistError, PersistedRecord, StateStore};
use tracing::{debug, info};

/// On-disk layout: the record plus when it was written.
#[derive(Debug, Serialize, Deserialize)]
struct StoredFile {
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    record: PersistedRecord,
}

/// A [`StateStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at `path`. Nothing is touched until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The target file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn encoding(err: &serde_json::Error) -> PersistError {
    PersistError::Encoding {
        message: err.to_string(),
    }
}

impl StateStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<PersistedRecord>, PersistError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored state");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let stored: StoredFile = serde_json::from_str(&contents).map_err(|e| encoding(&e))?;
        info!(
            path = %self.path.display(),
            saved_at = ?stored.saved_at,
            "Stored state loaded"
        );
        Ok(Some(stored.record))
    }

    fn save(&mut self, record: &PersistedRecord) -> Result<(), PersistError> {
        let stored = StoredFile {
            saved_at: Some(Utc::now()),
            record: record.clone(),
        };
        let json = serde_json::to_string_pretty(&stored).map_err(|e| encoding(&e))?;

        let temp = self.temp_path();
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), "State saved");
        Ok(())
    }
}
