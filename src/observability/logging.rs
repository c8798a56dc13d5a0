//! Logging initialization for `pomotick`.
//!
//! `tracing` output always goes to stderr so it never interleaves with the
//! countdown on stdout. `POMOTICK_LOG_LEVEL` (an `EnvFilter` directive)
//! overrides the `-v` count.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_LEVEL_ENV: &str = "POMOTICK_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// Maps a `-v` count to a tracing directive; saturates at `trace`.
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Whether stderr output should carry ANSI colors.
///
/// `Auto` honors `NO_COLOR` and only colors a terminal.
#[must_use]
pub fn use_ansi(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
        }
    }
}

/// Installs the global subscriber.
///
/// Repeated calls are ignored (`try_init`).
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    // Module paths are noise below debug
    let show_target = verbosity >= 2;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(show_target)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Human => builder.with_ansi(use_ansi(color)).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
