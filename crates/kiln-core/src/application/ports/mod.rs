//! Application ports (traits) for external dependencies.
//!
//! Ports define the interfaces the application needs from the outside world.
//! Adapters in `kiln-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `CommandRunner`: External processes (composer, npm, yarn, pnpm)
//!   - `InstallObserver`: Milestone notices for the user

pub mod output;

pub use output::{CommandRunner, Filesystem, InstallObserver, SilentObserver};

#[cfg(test)]
pub use output::{MockCommandRunner, MockFilesystem};
