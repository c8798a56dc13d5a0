//! Clock formatting and duration parsing.
//!
//! Pure helpers shared by every renderer and input surface; nothing here
//! touches engine state.

use crate::error::ConfigError;

/// Formats a countdown as `H:MM:SS`, dropping the hour field when zero.
///
/// ```
/// use pomotick::clock::format_remaining;
///
/// assert_eq!(format_remaining(1500), "25:00");
/// assert_eq!(format_remaining(3725), "1:02:05");
/// ```
#[must_use]
pub fn format_remaining(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Parses a phase duration into whole seconds.
///
/// Accepts `humantime` strings (`"25m"`, `"90s"`, `"1h 30m"`) or a bare
/// integer, which is read as minutes.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for unparseable input, zero, or
/// a value with a sub-second remainder.
pub fn parse_duration(field: &str, input: &str) -> Result<u64, ConfigError> {
    let s = input.trim();

    let seconds = if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse::<u64>()
            .ok()
            .and_then(|minutes| minutes.checked_mul(60))
            .ok_or_else(|| ConfigError::invalid_duration(field, input))?
    } else {
        let duration = humantime::parse_duration(s)
            .map_err(|_| ConfigError::invalid_duration(field, input))?;
        if duration.subsec_nanos() != 0 {
            return Err(ConfigError::invalid_duration(field, input));
        }
        duration.as_secs()
    };

    if seconds == 0 {
        return Err(ConfigError::invalid_duration(field, input));
    }
    Ok(seconds)
}
