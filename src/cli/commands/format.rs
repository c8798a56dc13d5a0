//! `format` subcommand: render second counts as countdown clocks.

use crate::cli::args::FormatArgs;
use crate::clock::format_remaining;

/// Print one formatted clock per input value.
pub fn run(args: &FormatArgs) {
    for seconds in &args.seconds {
        println!("{}", format_remaining(*seconds));
    }
}
