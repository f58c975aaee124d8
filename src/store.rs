//! File-backed store for the last review result.
//!
//! One store instance owns one JSON file holding a single [`CacheRecord`]:
//!
//! ```json
//! { "feedback": "…markdown…", "cvData": { … } }
//! ```
//!
//! Semantics follow the browser-local-storage model the consumers expect:
//!
//! * [`CvStore::read`] always answers — the in-memory default is returned
//!   immediately on a fresh store, and the one-time load from disk swallows
//!   parse and IO failures with a logged warning. A corrupt file never
//!   propagates an error to a reader.
//! * [`CvStore::update`] shallow-merges a partial record and persists the
//!   result before returning it; omitted fields keep their previous value.
//! * [`CvStore::clear`] removes the persisted file entirely — not merely a
//!   reset-in-place — and restores the in-memory default.
//!
//! Writes are atomic (temp file + rename) so a crash mid-write never leaves
//! a half-serialized record behind. There is no locking: two stores on the
//! same path race and the last write wins.

use crate::error::CoachError;
use crate::output::StructuredCv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The persisted record: last feedback text plus last extracted CV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheRecord {
    /// Last feedback markdown; `""` is the canonical "no feedback yet".
    pub feedback: String,
    /// Last extracted record, if an extraction pass has run.
    #[serde(rename = "cvData")]
    pub cv_data: Option<StructuredCv>,
}

/// A partial record for [`CvStore::update`]. `None` fields keep their
/// previous value (shallow merge).
#[derive(Debug, Clone, Default)]
pub struct CacheUpdate {
    pub feedback: Option<String>,
    pub cv_data: Option<StructuredCv>,
}

impl CacheUpdate {
    pub fn feedback(text: impl Into<String>) -> Self {
        CacheUpdate {
            feedback: Some(text.into()),
            cv_data: None,
        }
    }

    pub fn cv_data(cv: StructuredCv) -> Self {
        CacheUpdate {
            feedback: None,
            cv_data: Some(cv),
        }
    }

    pub fn with_cv_data(mut self, cv: StructuredCv) -> Self {
        self.cv_data = Some(cv);
        self
    }
}

/// File-backed single-entry store.
pub struct CvStore {
    path: PathBuf,
    record: CacheRecord,
    loaded: bool,
}

impl CvStore {
    /// Open a store at the given path. No IO happens here; the persisted
    /// record (if any) is loaded lazily on first access.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        CvStore {
            path: path.into(),
            record: CacheRecord::default(),
            loaded: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current record, loading from disk on first call.
    ///
    /// Load failures (missing file, unreadable file, corrupt JSON) are
    /// logged and the in-memory default is kept — they never propagate.
    pub async fn read(&mut self) -> CacheRecord {
        self.ensure_loaded().await;
        self.record.clone()
    }

    /// Merge a partial record into the current one and persist the result.
    ///
    /// Returns the merged record. Persistence failures are real errors:
    /// a caller that asked to save deserves to know the save did not happen.
    pub async fn update(&mut self, update: CacheUpdate) -> Result<CacheRecord, CoachError> {
        self.ensure_loaded().await;

        if let Some(feedback) = update.feedback {
            self.record.feedback = feedback;
        }
        if let Some(cv) = update.cv_data {
            self.record.cv_data = Some(cv);
        }

        self.persist().await?;
        Ok(self.record.clone())
    }

    /// Remove the persisted file and reset the in-memory record.
    ///
    /// A file that never existed is not an error.
    pub async fn clear(&mut self) -> Result<(), CoachError> {
        self.record = CacheRecord::default();
        self.loaded = true;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Cleared store at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoachError::StorePersistFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    async fn ensure_loaded(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;

        let body = match tokio::fs::read_to_string(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                warn!("Failed to read store at {}: {e}", self.path.display());
                return;
            }
        };

        match serde_json::from_str(&body) {
            Ok(record) => {
                debug!("Loaded store from {}", self.path.display());
                self.record = record;
            }
            Err(e) => {
                warn!(
                    "Failed to parse store at {}, keeping defaults: {e}",
                    self.path.display()
                );
            }
        }
    }

    /// Atomic write: serialise to a temp file next to the target, then rename.
    async fn persist(&self) -> Result<(), CoachError> {
        let io_err = |e| CoachError::StorePersistFailed {
            path: self.path.clone(),
            source: e,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
            }
        }

        let body = serde_json::to_string(&self.record).map_err(|e| {
            CoachError::StorePersistFailed {
                path: self.path.clone(),
                source: std::io::Error::other(e),
            }
        })?;

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &body).await.map_err(io_err)?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(io_err)?;
        Ok(())
    }
}
