//! `config` subcommand
//!
//! Resolves settings the same way `run` does and prints the result, so a
//! settings file can be checked without starting a session.

use crate::cli::args::{ConfigArgs, OutputFormat};
use crate::clock::format_remaining;
use crate::config::{ConfigLoader, LoaderOptions, Settings};
use crate::error::PomotickError;

/// Print the effective configuration.
///
/// # Errors
///
/// Returns a configuration error if the file or any override is invalid.
pub fn run(args: &ConfigArgs) -> Result<(), PomotickError> {
    let settings = ConfigLoader::new(LoaderOptions::default())
        .resolve(args.settings.config.as_deref(), &args.settings.overrides())?;

    match args.format {
        OutputFormat::Human => print!("{}", render_human(&settings)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
    }
    Ok(())
}

fn render_human(settings: &Settings) -> String {
    let source = settings
        .source
        .as_ref()
        .map_or_else(|| "built-in defaults".to_owned(), |p| p.display().to_string());
    format!(
        "work:          {}\nshort_break:   {}\nlong_break:    {}\nauto_continue: {}\nsource:        {source}\n",
        format_remaining(settings.durations.work()),
        format_remaining(settings.durations.short_break()),
        format_remaining(settings.durations.long_break()),
        settings.auto_continue,
    )
}
