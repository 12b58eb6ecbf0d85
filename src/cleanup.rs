//! Removal of converted files, one at a time or in bulk.

use crate::models::ClearReport;
use crate::naming::TempFileNamer;
use crate::uri;
use crate::{Error, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

pub struct CleanupManager {
    namer: TempFileNamer,
    temp_dir: PathBuf,
    strict: bool,
}

impl CleanupManager {
    pub fn new(namer: TempFileNamer, temp_dir: &Path) -> Self {
        let temp_dir = std::path::absolute(temp_dir).unwrap_or_else(|_| temp_dir.to_path_buf());
        Self {
            namer,
            temp_dir,
            strict: false,
        }
    }

    /// Only delete paths that sit directly in the temp directory and carry a
    /// converter file name.
    pub fn with_strict_delete(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Delete a single file. Without strict mode any caller-supplied path is
    /// accepted.
    pub async fn delete_one(&self, file_uri: &str) -> Result<PathBuf> {
        let path = uri::to_file_path(file_uri).ok_or(Error::MissingInput("file path"))?;

        if self.strict && !self.is_owned(&path) {
            warn!("Refusing to delete foreign path {}", path.display());
            return Err(Error::ForeignPath(path));
        }

        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted {}", path.display());
                Ok(path)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound(path)),
            Err(e) => Err(Error::DeleteFailed { path, source: e }),
        }
    }

    /// Delete every file in the temp directory whose name the namer
    /// recognises. Per-file failures are logged and counted, never returned;
    /// only failing to list the directory is an error.
    pub async fn clear_all(&self) -> Result<ClearReport> {
        let enumeration_error = |source| Error::EnumerationError {
            path: self.temp_dir.clone(),
            source,
        };

        let mut entries = fs::read_dir(&self.temp_dir)
            .await
            .map_err(enumeration_error)?;
        let mut report = ClearReport::default();

        while let Some(entry) = entries.next_entry().await.map_err(enumeration_error)? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !self.namer.matches(name) {
                continue;
            }
            if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                debug!("Skipping directory {}", name);
                continue;
            }

            match fs::remove_file(entry.path()).await {
                Ok(()) => report.removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("{} already gone", name);
                }
                Err(e) => {
                    warn!("Failed to delete {}: {}", name, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Cleared {} converted files from {} ({} failed)",
            report.removed,
            self.temp_dir.display(),
            report.failed
        );
        Ok(report)
    }

    fn is_owned(&self, path: &Path) -> bool {
        if path.components().any(|c| c == Component::ParentDir) {
            return false;
        }
        let Ok(path) = std::path::absolute(path) else {
            return false;
        };
        let name_matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| self.namer.matches(n));
        name_matches && path.parent() == Some(self.temp_dir.as_path())
    }
}
