//! `kiln config`: inspect configuration values.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config_file: Option<std::path::PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            if output.is_json() {
                let mut entry = serde_json::Map::new();
                entry.insert(key, serde_json::Value::String(value));
                output
                    .print_json(&entry)
                    .with_cli_context(|| "failed to write value")?;
            } else {
                output.print(&value)?;
            }
        }

        ConfigCommands::List => {
            if output.is_json() {
                output
                    .print_json(&config)
                    .with_cli_context(|| "failed to write configuration")?;
            } else {
                output.header("Current Configuration:")?;
                let serialised = toml::to_string_pretty(&config)
                    .with_cli_context(|| "Failed to serialise config")?;
                output.print(&serialised)?;
            }
        }

        ConfigCommands::Path => {
            let path = config_file.unwrap_or_else(AppConfig::config_path);
            output.print(&path.display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Known keys that are unset resolve to an empty string.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    if !AppConfig::keys().contains(&key) {
        return Err(CliError::ConfigError {
            message: format!(
                "Unknown config key: '{key}' (known keys: {})",
                AppConfig::keys().join(", ")
            ),
            source: None,
        });
    }
    Ok(config.get(key).unwrap_or_default())
}

// ── tests ─────────────────────────────────────────────────────────────────────
