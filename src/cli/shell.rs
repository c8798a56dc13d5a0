//! Interactive session input
//!
//! Turns lines typed on stdin into [`ShellCommand`]s. Lines are split
//! with `shlex`, so `config "1h 30m" 10m 20m` works as expected.

use crate::clock;
use crate::error::InputError;

/// Canonical command words, in help order.
const COMMAND_NAMES: [&str; 10] = [
    "start",
    "pause",
    "toggle",
    "reset",
    "reset-cycle",
    "skip",
    "config",
    "status",
    "help",
    "quit",
];

/// Maximum edit distance for a "did you mean" suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

const CONFIG_USAGE: &str = "config <work> <short-break> <long-break>";

/// Help text printed by `help`.
pub const HELP: &str = "\
Commands:
  start, s            start or resume the countdown
  pause, p            pause the countdown
  toggle, t           start if paused, pause if running
  reset, r            rewind the current phase
  reset-cycle, R      back to the first work phase, counter zeroed
  skip, n             end the current phase now
  config W S L        set work/short/long durations (e.g. config 50m 10m 30m)
  status              print the current state
  help, ?             show this help
  quit, q             end the session";

/// A command entered in the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Resume the countdown.
    Start,
    /// Pause the countdown.
    Pause,
    /// Start or pause depending on the current state.
    Toggle,
    /// Rewind the current phase.
    ResetPhase,
    /// Start the cycle over.
    ResetCycle,
    /// End the current phase now.
    Skip,
    /// Replace the durations (seconds).
    Configure {
        /// Work phase length
        work: u64,
        /// Short break length
        short_break: u64,
        /// Long break length
        long_break: u64,
    },
    /// Print the current state.
    Status,
    /// Print the command list.
    Help,
    /// End the session.
    Quit,
}

impl ShellCommand {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] for unknown commands, wrong arity, or
    /// unparseable durations.
    pub fn parse(line: &str) -> Result<Option<Self>, InputError> {
        let words = shlex::split(line).ok_or(InputError::Unbalanced)?;
        let Some((head, rest)) = words.split_first() else {
            return Ok(None);
        };

        let command = match head.as_str() {
            "start" | "s" => Self::Start,
            "pause" | "p" => Self::Pause,
            "toggle" | "t" => Self::Toggle,
            "reset" | "r" => Self::ResetPhase,
            "reset-cycle" | "R" => Self::ResetCycle,
            "skip" | "n" | "next" => Self::Skip,
            "status" => Self::Status,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            "config" | "c" => return parse_config(rest).map(Some),
            other => {
                return Err(InputError::Unknown {
                    input: other.to_owned(),
                    suggestion: suggest_command(other),
                });
            }
        };

        if !rest.is_empty() {
            return Err(InputError::Usage(command.name()));
        }
        Ok(Some(command))
    }

    /// Canonical command word.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Toggle => "toggle",
            Self::ResetPhase => "reset",
            Self::ResetCycle => "reset-cycle",
            Self::Skip => "skip",
            Self::Configure { .. } => "config",
            Self::Status => "status",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

fn parse_config(args: &[String]) -> Result<ShellCommand, InputError> {
    let [work, short_break, long_break] = args else {
        return Err(InputError::Usage(CONFIG_USAGE));
    };
    let seconds = |field: &str, value: &str| {
        clock::parse_duration(field, value).map_err(|e| InputError::InvalidDuration(e.to_string()))
    };
    Ok(ShellCommand::Configure {
        work: seconds("work", work)?,
        short_break: seconds("short_break", short_break)?,
        long_break: seconds("long_break", long_break)?,
    })
}

/// Returns the closest known command within a small edit distance.
#[must_use]
pub fn suggest_command(input: &str) -> Option<String> {
    COMMAND_NAMES
        .iter()
        .map(|name| (*name, strsim::damerau_levenshtein(input, name)))
        .filter(|(_, dist)| *dist <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name.to_string())
}
