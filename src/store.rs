//! Project file persistence.
//!
//! The whole [`ProjectState`] lives in one JSON file. Every CLI action is
//! load → mutate → save, so the file is always in sync with the last edit.
//!
//! Loading is deliberately forgiving: a missing file means a fresh project,
//! and a file that fails to parse is logged and replaced with defaults on the
//! next save. Corruption never aborts the tool — there is nothing to recover
//! that the user cannot re-enter.

use crate::project::ProjectState;
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default project file name in the working directory.
pub const DEFAULT_PROJECT_FILE: &str = "garden-project.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Handle to the on-disk project file.
pub struct ProjectStore {
    path: PathBuf,
}

impl ProjectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the project, falling back to defaults when the file is absent or
    /// unreadable. Parse failures are logged, never surfaced as errors.
    pub fn load(&self) -> ProjectState {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return ProjectState::default();
            }
            Err(e) => {
                warn!("failed to read {}: {e}; starting fresh", self.path.display());
                return ProjectState::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(project) => project,
            Err(e) => {
                warn!(
                    "failed to parse {}: {e}; starting fresh",
                    self.path.display()
                );
                ProjectState::default()
            }
        }
    }

    /// Persist the full state as pretty-printed JSON.
    pub fn save(&self, project: &ProjectState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(project)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Delete the project file. Subsequent loads yield defaults.
    pub fn reset(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
