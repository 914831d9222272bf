//! Scoped download workspaces.
//!
//! Each orchestration call owns one temporary directory for the lifetime of
//! the call. Removal rides on `TempDir`'s drop, so it fires on success, tool
//! failure, upload failure, and panic alike; downloads of large media files
//! must never leak directories under repeated failure.

use crate::error::PipelineError;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

/// A temporary directory owned exclusively by one in-flight download.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn create() -> Result<Self, PipelineError> {
        let dir = TempDir::new()?;
        tracing::debug!(path = %dir.path().display(), "Created download workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Select the produced artifact. Zero files is an error: a clean tool
    /// exit that produced nothing is a failure, not a silent success. When
    /// the tool leaves more than one file (e.g. fragments next to the merged
    /// output), the most-recently-modified regular file wins.
    pub fn artifact(&self) -> Result<PathBuf, PipelineError> {
        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for entry in std::fs::read_dir(self.dir.path())? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified()?;
            match &newest {
                Some((best, _)) if *best >= modified => {}
                _ => newest = Some((modified, entry.path())),
            }
        }
        newest
            .map(|(_, path)| path)
            .ok_or(PipelineError::NoArtifactProduced)
    }
}
