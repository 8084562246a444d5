//! Runs external commands with `std::process`.

use std::process::Command;

use tracing::{debug, instrument};

use kiln_core::{
    application::{ApplicationError, ports::CommandRunner},
    domain::{CommandStatus, Invocation},
    error::KilnResult,
};

/// Production command runner.
///
/// Children inherit stdin, stdout, and stderr so composer and the Node
/// package manager can print progress and prompt as usual.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    #[instrument(skip_all, fields(command = %invocation, cwd = %invocation.cwd.display()))]
    fn run(&self, invocation: &Invocation) -> KilnResult<CommandStatus> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(invocation.env.iter().map(|(k, v)| (k, v)))
            .status()
            .map_err(|e| ApplicationError::CommandSpawn {
                command: invocation.to_string(),
                reason: e.to_string(),
            })?;

        debug!(code = ?status.code(), "command finished");
        Ok(CommandStatus::from_code(status.code()))
    }
}
