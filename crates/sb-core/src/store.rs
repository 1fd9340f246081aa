//! File-backed session store.
//!
//! The whole session list lives under one key, `steepbook_sessions`, stored
//! as a compact JSON array in `<data_dir>/steepbook_sessions.json`. Writes go
//! through a temp file and a rename so a failed save never leaves a
//! truncated list behind.

use sb_common::{Message, Session};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Storage key for the session list.
pub const STORAGE_KEY: &str = "steepbook_sessions";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored sessions in {path} are not valid JSON: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize sessions: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// User-facing message: load failures and save failures read differently.
    pub fn message(&self) -> Message {
        match self {
            StoreError::Read { .. } | StoreError::Decode { .. } => Message::LocalStorageLoadError,
            StoreError::Encode(_) | StoreError::Write { .. } => Message::SessionSaveError,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store rooted in `data_dir`. The directory is created on first save.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored list. A missing file is an empty list.
    ///
    /// Stored data is trusted: no datetime re-validation. Fields missing from
    /// older data come back empty.
    pub fn load(&self) -> Result<Vec<Session>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored sessions yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let sessions: Vec<Session> =
            serde_json::from_str(&content).map_err(|e| StoreError::Decode {
                path: self.path.clone(),
                source: e,
            })?;
        debug!(path = %self.path.display(), sessions = sessions.len(), "Loaded sessions");
        Ok(sessions)
    }

    /// Replace the stored list.
    pub fn save(&self, sessions: &[Session]) -> Result<()> {
        let content = serde_json::to_vec(sessions).map_err(StoreError::Encode)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let file_name = self
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("steepbook_sessions.json");
        let tmp_path = self
            .path
            .with_file_name(format!("{}.tmp.{}", file_name, std::process::id()));
        {
            let mut file = fs::File::create(&tmp_path).map_err(|e| StoreError::Write {
                path: tmp_path.clone(),
                source: e,
            })?;
            file.write_all(&content).map_err(|e| StoreError::Write {
                path: tmp_path.clone(),
                source: e,
            })?;
            let _ = file.sync_all();
        }
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Session store rename failed");
            let _ = fs::remove_file(&tmp_path);
            StoreError::Write {
                path: self.path.clone(),
                source: e,
            }
        })?;

        info!(path = %self.path.display(), sessions = sessions.len(), "Sessions saved");
        Ok(())
    }
}
