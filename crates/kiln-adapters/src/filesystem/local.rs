//! Local filesystem adapter using std::fs.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::trace;
use walkdir::WalkDir;

use kiln_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{KilnError, KilnResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> KilnResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn read_to_string(&self, path: &Path) -> KilnResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    /// Writes to a temporary file next to `path`, then renames it over the
    /// target so readers never observe a half-written file.
    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp =
            NamedTempFile::new_in(parent).map_err(|e| map_io_error(path, e, "create temp file"))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| map_io_error(path, e, "write file"))?;

        // The temp file starts out owner-only; an existing target keeps its mode.
        if let Ok(metadata) = std::fs::metadata(path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| map_io_error(path, e, "copy permissions"))?;
        }

        tmp.persist(path)
            .map_err(|e| map_io_error(path, e.error, "replace file"))?;

        trace!(path = %path.display(), bytes = content.len(), "wrote file");
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> KilnResult<()> {
        if let Some(parent) = to.parent() {
            self.create_dir_all(parent)?;
        }
        std::fs::copy(from, to).map_err(|e| map_io_error(from, e, "copy file"))?;
        trace!(from = %from.display(), to = %to.display(), "copied file");
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> KilnResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename file"))
    }

    fn list_files(&self, root: &Path) -> KilnResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                KilnError::from(ApplicationError::FilesystemError {
                    reason: format!("Failed to list directory: {e}"),
                    path,
                })
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> KilnError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
