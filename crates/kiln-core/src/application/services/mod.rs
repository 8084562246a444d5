//! Application services - orchestrate use cases.
//!
//! Services coordinate stacks, the domain layer, and the ports to carry out
//! "install a stack into a project".

pub mod install_service;

pub use install_service::{InstallReport, InstallService, NodeOutcome};
