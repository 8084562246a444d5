//! Implementation of the `kiln install` command.
//!
//! Responsibility: resolve the stack, options, and stub root from flags and
//! config, hand them to the core install service, and display the result.

use std::io::{self, IsTerminal};

use tracing::{debug, info, instrument};

use kiln_adapters::{LocalFilesystem, SystemCommandRunner, locate_stubs};
use kiln_core::{
    application::{InstallReport, InstallService, stacks},
    domain::{ComposerSource, InstallOptions, InstallPlan, ProjectPaths, StubRoot},
};

use crate::{
    cli::{InstallArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `kiln install` command.
///
/// 1. Resolve the stack, project paths, options, and stubs
/// 2. Build the plan (fails early if the project directory is missing)
/// 3. Print the plan and stop on `--dry-run`
/// 4. Confirm unless `--yes` or stdin is not a terminal
/// 5. Execute and summarise
#[instrument(skip_all, fields(stack = %args.stack, path = %args.path.display()))]
pub fn execute(
    args: InstallArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let stack = stacks::find(&args.stack)?;
    let paths = ProjectPaths::new(args.path.clone());
    let options = build_options(&args, &config);
    let stubs = locate_stubs(config.stubs.path.as_deref())?;

    debug!(
        dark = options.dark,
        ssr = options.ssr,
        pest = options.pest,
        composer = %options.composer,
        stubs = %stubs.as_path().display(),
        "Install resolved"
    );

    let service = InstallService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(SystemCommandRunner::new()),
    );
    let plan = service.plan(stack.as_ref(), &paths, &stubs, &options)?;

    if args.dry_run {
        return show_plan(&plan, &paths, &stubs, &output);
    }

    if needs_confirmation(&args, &global, &output) {
        show_plan(&plan, &paths, &stubs, &output)?;
        if !confirm(&format!(
            "Install {} into {}?",
            stack.name(),
            args.path.display()
        ))? {
            return Err(CliError::Cancelled);
        }
    }

    output.header(&format!("Installing {}...", stack.name()))?;
    info!(stack = stack.name(), "Install started");

    let report = service.execute(&plan, &output)?;

    info!(stack = stack.name(), "Install completed");
    show_report(&report, &output)
}

/// Flags win over config values.
fn build_options(args: &InstallArgs, config: &AppConfig) -> InstallOptions {
    let composer = args
        .composer
        .as_deref()
        .unwrap_or(config.backend.composer.as_str());
    let php = args.php.as_deref().unwrap_or(config.backend.php.as_str());

    InstallOptions::new()
        .dark(args.dark)
        .ssr(args.ssr)
        .pest(args.pest)
        .composer(ComposerSource::parse(composer))
        .php(php)
}

fn needs_confirmation(args: &InstallArgs, global: &GlobalArgs, output: &OutputManager) -> bool {
    !args.yes && !global.quiet && !output.is_json() && io::stdin().is_terminal()
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_plan(
    plan: &InstallPlan,
    paths: &ProjectPaths,
    stubs: &StubRoot,
    output: &OutputManager,
) -> CliResult<()> {
    if output.is_json() {
        output
            .print_json(plan)
            .with_cli_context(|| "failed to write plan")?;
        return Ok(());
    }

    output.header(&format!(
        "Plan for '{}' ({} steps)",
        plan.stack,
        plan.len()
    ))?;
    for (index, operation) in plan.iter().enumerate() {
        output.print(&format!(
            "  {:>2}. {}",
            index + 1,
            operation.describe(paths, stubs)
        ))?;
    }
    output.print("")?;
    Ok(())
}

fn show_report(report: &InstallReport, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        output
            .print_json(report)
            .with_cli_context(|| "failed to write report")?;
        return Ok(());
    }

    output.success(&format!(
        "Installed '{}': {} files written, {} patches applied, {} unchanged",
        report.stack, report.files_written, report.patches_applied, report.patches_unchanged,
    ))?;

    if let Some(node) = report.node.filter(|n| !n.succeeded()) {
        let pm = node.manager().as_str();
        output.print("")?;
        output.print("Finish the frontend by hand:")?;
        output.print(&format!("  {pm} install"))?;
        output.print(&format!("  {pm} run build"))?;
    }

    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm(prompt: &str) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(true)
        .interact()
        .map_err(io::Error::other)
        .with_cli_context(|| "failed to read confirmation input")
}

#[cfg(not(feature = "interactive"))]
fn confirm(prompt: &str) -> CliResult<bool> {
    use std::io::Write;

    print!("{prompt} [Y/n] ");
    io::stdout()
        .flush()
        .with_cli_context(|| "failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_cli_context(|| "failed to read confirmation input")?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args() -> InstallArgs {
        InstallArgs {
            stack: "svelte".into(),
            path: PathBuf::from("."),
            dark: false,
            ssr: false,
            pest: false,
            composer: None,
            php: None,
            dry_run: false,
            yes: false,
        }
    }

    #[test]
    fn options_come_from_config_by_default() {
        let mut config = AppConfig::default();
        config.backend.composer = "/opt/composer.phar".into();
        config.backend.php = "php8.2".into();

        let options = build_options(&args(), &config);
        assert_eq!(
            options.composer,
            ComposerSource::Phar(PathBuf::from("/opt/composer.phar"))
        );
        assert_eq!(options.php, "php8.2");
    }

    #[test]
    fn flags_override_config() {
        let mut config = AppConfig::default();
        config.backend.composer = "/opt/composer.phar".into();

        let args = InstallArgs {
            composer: Some("global".into()),
            php: Some("php7".into()),
            ssr: true,
            pest: true,
            ..args()
        };
        let options = build_options(&args, &config);
        assert_eq!(options.composer, ComposerSource::Global);
        assert_eq!(options.php, "php7");
        assert!(options.ssr && options.pest && !options.dark);
    }
}
