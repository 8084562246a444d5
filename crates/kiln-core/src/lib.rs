//! Kiln Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Kiln, a tool
//! that installs frontend starter stacks into an existing Laravel
//! application.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             kiln-cli (CLI)              │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   Stacks (plan) + InstallService (run)  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   Ports: Filesystem, CommandRunner,     │
//! │          InstallObserver                │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     kiln-adapters (Infrastructure)      │
//! │ (LocalFilesystem, SystemCommandRunner)  │
//! └─────────────────────────────────────────┘
//!
//!   Domain layer: paths, packages, patches, manifest merge, plans.
//!   No I/O.
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kiln_core::prelude::*;
//!
//! # fn run(service: InstallService) -> KilnResult<()> {
//! let stack = kiln_core::application::stacks::find("svelte")?;
//! let report = service.install(
//!     stack.as_ref(),
//!     &ProjectPaths::new("/srv/app"),
//!     &StubRoot::new("/usr/share/kiln/stubs"),
//!     &InstallOptions::new().ssr(true),
//!     &SilentObserver,
//! )?;
//! println!("{} files written", report.files_written);
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        InstallReport, InstallService, NodeOutcome, Stack,
        ports::{CommandRunner, Filesystem, InstallObserver, SilentObserver},
    };
    pub use crate::domain::{
        CommandStatus, ComposerSource, InstallOptions, InstallPlan, Invocation, Operation,
        PackageManager, PackageRequirement, ProjectPaths, StubRoot,
    };
    pub use crate::error::{ErrorCategory, KilnError, KilnResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
