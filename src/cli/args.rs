//! CLI argument definitions
//!
//! All Clap derive structs for `pomotick` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::Overrides;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Pomodoro interval timer.
#[derive(Parser, Debug)]
#[command(name = "pomotick", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "POMOTICK_COLOR")]
    pub color: ColorChoice,

    /// Log line format on stderr.
    #[arg(long, default_value = "human", global = true, env = "POMOTICK_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an interactive timer session.
    Run(RunArgs),

    /// Print the effective configuration.
    Config(ConfigArgs),

    /// Format second counts as countdown clocks.
    Format(FormatArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Shared Settings Flags
// ============================================================================

/// Settings flags shared by `run` and `config`.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Path to YAML settings file.
    #[arg(short, long, env = "POMOTICK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Work phase length (e.g. `25m`, `1500s`; bare numbers are minutes).
    #[arg(long, env = "POMOTICK_WORK")]
    pub work: Option<String>,

    /// Short break length.
    #[arg(long, env = "POMOTICK_SHORT_BREAK")]
    pub short_break: Option<String>,

    /// Long break length.
    #[arg(long, env = "POMOTICK_LONG_BREAK")]
    pub long_break: Option<String>,

    /// Restart the countdown automatically after a phase expires.
    #[arg(long, env = "POMOTICK_AUTO_CONTINUE")]
    pub auto_continue: bool,
}

impl SettingsArgs {
    /// Command-line values that take precedence over the settings file.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            work: self.work.clone(),
            short_break: self.short_break.clone(),
            long_break: self.long_break.clone(),
            auto_continue: self.auto_continue,
        }
    }
}

// ============================================================================
// Run Command
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Settings.
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Start counting immediately instead of waiting for `start`.
    #[arg(long)]
    pub start: bool,

    /// Append structured session events (JSONL) to this file.
    #[arg(long, env = "POMOTICK_EVENTS")]
    pub events: Option<PathBuf>,

    /// Serve Prometheus metrics on this local port.
    #[arg(long, env = "POMOTICK_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Milliseconds of wall-clock time per countdown second.
    #[arg(long, default_value_t = 1000, hide = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,
}

// ============================================================================
// Config Command
// ============================================================================

/// Arguments for `config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Settings.
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Format Command
// ============================================================================

/// Arguments for `format`.
#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Remaining seconds to render.
    #[arg(required = true)]
    pub seconds: Vec<u64>,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
