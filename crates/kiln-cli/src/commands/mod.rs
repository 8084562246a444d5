//! Command handlers, one module per subcommand.
//!
//! Handlers translate parsed arguments into calls on `kiln-core` and render
//! the result. No install logic lives here.

pub mod completions;
pub mod config;
pub mod init;
pub mod install;
pub mod stacks;
