//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `kiln-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{CommandStatus, Invocation};
use crate::error::KilnResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kiln_adapters::filesystem::LocalFilesystem` (production)
/// - `kiln_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if a file or directory exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KilnResult<()>;

    /// Read a UTF-8 file.
    fn read_to_string(&self, path: &Path) -> KilnResult<String>;

    /// Replace the content of a file. The write is all-or-nothing.
    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()>;

    /// Copy a file, creating the destination's parent directories.
    fn copy_file(&self, from: &Path, to: &Path) -> KilnResult<()>;

    /// Rename a file, replacing any existing destination.
    fn rename(&self, from: &Path, to: &Path) -> KilnResult<()>;

    /// All files below `root`, recursively, in sorted order.
    fn list_files(&self, root: &Path) -> KilnResult<Vec<PathBuf>>;
}

/// Port for running external processes.
///
/// Implemented by:
/// - `kiln_adapters::process::SystemCommandRunner` (production)
/// - `mockall` doubles in tests
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run to completion. `Err` means the process could not be started.
    fn run(&self, invocation: &Invocation) -> KilnResult<CommandStatus>;
}

/// Receives milestone messages while a plan executes.
pub trait InstallObserver {
    fn notice(&self, message: &str);

    /// A non-fatal problem, such as a failed Node build.
    fn warning(&self, message: &str);
}

/// Observer that discards every message.
pub struct SilentObserver;

impl InstallObserver for SilentObserver {
    fn notice(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
}
