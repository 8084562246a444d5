//! Infrastructure adapters for Kiln.
//!
//! This crate implements the ports defined in `kiln_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod process;
pub mod stub_locator;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::SystemCommandRunner;
pub use stub_locator::locate_stubs;
