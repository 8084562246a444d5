//! Core domain layer for Kiln.
//!
//! Pure logic only: value objects, text patches, manifest merging, and the
//! install plan model. Nothing here performs I/O. Filesystem and process
//! access go through the ports in `crate::application::ports`.

pub mod command;
pub mod error;
pub mod manifest;
pub mod options;
pub mod package;
pub mod patch;
pub mod paths;
pub mod plan;

pub use command::{CommandStatus, Invocation};
pub use error::DomainError;
pub use manifest::{DependencySection, merge_packages};
pub use options::InstallOptions;
pub use package::{ComposerSource, PackageManager, PackageRequirement};
pub use paths::{ProjectPaths, StubRoot};
pub use plan::{FileFilter, InstallPlan, Operation};
