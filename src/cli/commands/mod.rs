//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod config;
pub mod format;
pub mod run;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::PomotickError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), PomotickError> {
    match cli.command {
        Commands::Run(args) => run::run(&args).await,
        Commands::Config(args) => config::run(&args),
        Commands::Format(args) => {
            format::run(&args);
            Ok(())
        }
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
