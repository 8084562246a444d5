//! Application layer for Kiln.
//!
//! This layer contains:
//! - **Stacks**: Turn install options into an ordered plan
//! - **Services**: Use case orchestration (InstallService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Text transformations and manifest rules live in `crate::domain`; this
//! layer only decides what runs when.

pub mod error;
pub mod ports;
pub mod services;
pub mod stacks;

pub use services::{InstallReport, InstallService, NodeOutcome};

// Re-export port traits (for adapter implementation)
pub use ports::{CommandRunner, Filesystem, InstallObserver, SilentObserver};

pub use stacks::{InertiaSvelte, Stack};

pub use error::ApplicationError;
