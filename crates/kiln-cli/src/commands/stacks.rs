//! Implementation of the `kiln stacks` command.

use serde::Serialize;

use kiln_core::application::stacks;

use crate::{
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct StackEntry {
    name: &'static str,
    description: &'static str,
}

pub fn execute(output: OutputManager) -> CliResult<()> {
    let entries: Vec<StackEntry> = stacks::registry()
        .iter()
        .map(|stack| StackEntry {
            name: stack.name(),
            description: stack.description(),
        })
        .collect();

    if output.is_json() {
        // Stdout stays parseable in JSON mode, even when piped.
        return output
            .print_json(&entries)
            .with_cli_context(|| "failed to write stack list");
    }

    output.header("Available stacks:")?;
    for entry in &entries {
        output.print(&format!("  {:<10} {}", entry.name, entry.description))?;
    }
    Ok(())
}
