//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kiln",
    bin_name = "kiln",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Install frontend starter stacks into Laravel applications",
    long_about = "Kiln installs a frontend stack (controllers, routes, pages, \
                  build config, and tests) into an existing Laravel application, \
                  then installs and builds its dependencies.",
    after_help = "EXAMPLES:\n\
        \x20 kiln install svelte\n\
        \x20 kiln install svelte --ssr --dark --path ../my-app\n\
        \x20 kiln install svelte --dry-run --output-format json\n\
        \x20 kiln completions bash > /usr/share/bash-completion/completions/kiln",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install a stack into a Laravel application.
    #[command(
        visible_alias = "i",
        about = "Install a stack into a Laravel application",
        after_help = "EXAMPLES:\n\
            \x20 kiln install svelte\n\
            \x20 kiln install svelte --ssr --pest\n\
            \x20 kiln install svelte --composer ./composer.phar -y"
    )]
    Install(InstallArgs),

    /// List the stacks this build can install.
    #[command(visible_alias = "ls", about = "List available stacks")]
    Stacks,

    /// Write a default Kiln configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 kiln init                    # platform config directory\n\
            \x20 kiln --config kiln.toml init # explicit location\n\
            \x20 kiln init --force            # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kiln completions bash > ~/.local/share/bash-completion/completions/kiln\n\
            \x20 kiln completions zsh  > ~/.zfunc/_kiln\n\
            \x20 kiln completions fish > ~/.config/fish/completions/kiln.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Kiln configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 kiln config get backend.php\n\
            \x20 kiln config list\n\
            \x20 kiln config path"
    )]
    Config(ConfigCommands),
}

// ── install ───────────────────────────────────────────────────────────────────

/// Arguments for `kiln install`.
#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Stack to install. See `kiln stacks`.
    #[arg(value_name = "STACK", help = "Stack to install (e.g. svelte)")]
    pub stack: String,

    /// Root of the Laravel application.
    #[arg(
        short = 'p',
        long = "path",
        value_name = "DIR",
        default_value = ".",
        help = "Laravel application directory"
    )]
    pub path: PathBuf,

    /// Keep `dark:` classes in the installed components.
    #[arg(long = "dark", help = "Keep dark mode classes")]
    pub dark: bool,

    /// Add the server-side rendering entry point and build step.
    #[arg(long = "ssr", help = "Enable server-side rendering")]
    pub ssr: bool,

    /// Install the Pest test suite instead of PHPUnit tests.
    #[arg(long = "pest", help = "Install Pest tests")]
    pub pest: bool,

    /// `global` for the composer on PATH, or a path to composer.phar.
    #[arg(
        long = "composer",
        value_name = "PATH|global",
        help = "Composer to use (overrides backend.composer)"
    )]
    pub composer: Option<String>,

    /// PHP binary used to run a composer.phar.
    #[arg(
        long = "php",
        value_name = "BIN",
        help = "PHP binary (overrides backend.php)"
    )]
    pub php: Option<String>,

    /// Print the plan without touching the project.
    #[arg(long = "dry-run", help = "Show what would be done without doing it")]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation")]
    pub yes: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `kiln completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `kiln config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `backend.php`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
