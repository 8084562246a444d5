//! Application layer errors.
//!
//! These errors represent failures while executing a plan, not invalid input.
//! Input errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while executing an install.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Backend package installation exited unsuccessfully.
    #[error("Backend dependency installation failed: `{command}` exited with {status}")]
    BackendInstallFailed { command: String, status: String },

    /// A stub file or directory is missing from the stub tree.
    #[error("Stub not found: {path}")]
    StubMissing { path: PathBuf },

    /// The project directory does not exist.
    #[error("Project directory not found: {path}")]
    ProjectNotFound { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// An external command could not be started.
    #[error("Failed to run `{command}`: {reason}")]
    CommandSpawn { command: String, reason: String },

    /// Internal lock poisoned (in-memory adapters).
    #[error("Adapter state lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::BackendInstallFailed { command, .. } => vec![
                format!("The command `{}` did not succeed", command),
                "Check the composer output above for details".into(),
                "Use --composer <path> to point at a composer.phar".into(),
            ],
            Self::StubMissing { path } => vec![
                format!("Missing stub: {}", path.display()),
                "Set KILN_STUBS_DIR or stubs.path to the bundled stubs directory".into(),
            ],
            Self::ProjectNotFound { path } => vec![
                format!("No directory at {}", path.display()),
                "Run kiln from your application root or pass --path".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the file exists in the project".into(),
            ],
            Self::CommandSpawn { command, .. } => vec![
                format!("Could not start `{}`", command),
                "Ensure the command is installed and in your PATH".into(),
            ],
            Self::LockPoisoned => vec!["Try again".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BackendInstallFailed { .. } => ErrorCategory::Internal,
            Self::StubMissing { .. } => ErrorCategory::NotFound,
            Self::ProjectNotFound { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } | Self::CommandSpawn { .. } => ErrorCategory::Internal,
            Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}
