//! Error types for `pomotick`
//!
//! One small enum per layer (engine, configuration, driver) plus a
//! top-level [`PomotickError`] that the CLI maps onto process exit codes.

use std::path::PathBuf;
use thiserror::Error;

use crate::phase::PhaseKind;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `pomotick` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, non-positive duration)
    pub const CONFIG_ERROR: i32 = 2;

    /// Reading stdin or writing the events file failed
    pub const IO_ERROR: i32 = 3;

    /// Bad command-line usage
    pub const USAGE_ERROR: i32 = 64;

    /// Forced exit on a second SIGINT
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `pomotick` operations.
///
/// Aggregates the per-layer errors and maps each onto an exit code.
#[derive(Debug, Error)]
pub enum PomotickError {
    /// Settings could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Phase engine rejected a command
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The driver task is gone
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Arguments rejected by the command-line parser
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// Terminal or events-file I/O failed
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    /// `--format json` output could not be rendered
    #[error("json output: {0}")]
    Json(#[from] serde_json::Error),
}

impl PomotickError {
    /// Process exit code for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Engine(_) => ExitCode::CONFIG_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Driver(_) | Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Engine Errors
// ============================================================================

/// Errors raised by the phase engine.
///
/// Reconfiguration is the only fallible engine operation; every other
/// command is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A phase duration was not strictly positive.
    #[error("invalid configuration: {phase} duration must be positive, got {seconds}s")]
    InvalidConfiguration {
        /// Phase whose duration was rejected
        phase: PhaseKind,
        /// The rejected value in seconds
        seconds: u64,
    },
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Problems reading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file is not valid YAML or has unknown keys.
    #[error("cannot parse settings {path}: {message}")]
    ParseError {
        /// Settings file
        path: PathBuf,
        /// Parser diagnostic
        message: String,
    },

    /// The settings file could not be read.
    #[error("settings file not found: {path}")]
    MissingFile {
        /// Settings file
        path: PathBuf,
    },

    /// A setting has an unusable value.
    #[error("invalid {field} '{value}': expected {expected}")]
    InvalidValue {
        /// Setting name (`work`, `short_break`, `file_size`, ...)
        field: String,
        /// Offending value as written
        value: String,
        /// What would have been accepted
        expected: String,
    },

    /// Durations were parsed but rejected by the engine
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ConfigError {
    /// Builds an [`InvalidValue`](Self::InvalidValue) for a duration field.
    #[must_use]
    pub fn invalid_duration(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: "a positive whole-second duration such as '25m', '90s' or '1h 30m'"
                .to_owned(),
        }
    }
}

// ============================================================================
// Driver Errors
// ============================================================================

/// Errors returned by [`DriverHandle`](crate::driver::DriverHandle).
#[derive(Debug, Error)]
pub enum DriverError {
    /// The driver task has stopped and no longer accepts commands.
    #[error("timer driver has stopped")]
    Stopped,

    /// The engine rejected the command.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

// ============================================================================
// Shell Input Errors
// ============================================================================

/// Errors parsing a line typed into the interactive session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Unterminated quote or escape.
    #[error("could not split input: unbalanced quotes")]
    Unbalanced,

    /// The command word is not recognised.
    #[error("unknown command '{input}'{}", .suggestion.as_ref().map_or_else(String::new, |s| format!(" (did you mean '{s}'?)")))]
    Unknown {
        /// What was typed
        input: String,
        /// Closest known command, if any is close enough
        suggestion: Option<String>,
    },

    /// The command was recognised but its arguments were wrong.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// A duration argument did not parse.
    #[error("{0}")]
    InvalidDuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            PomotickError::Config(ConfigError::MissingFile {
                path: PathBuf::from("pomotick.yaml")
            })
            .exit_code(),
            ExitCode::CONFIG_ERROR
        );
        assert_eq!(
            PomotickError::from(clap::Error::new(clap::error::ErrorKind::InvalidSubcommand))
                .exit_code(),
            ExitCode::USAGE_ERROR
        );
        assert_eq!(
            PomotickError::Driver(DriverError::Stopped).exit_code(),
            ExitCode::ERROR
        );
        assert_eq!(
            PomotickError::Io(std::io::Error::other("x")).exit_code(),
            ExitCode::IO_ERROR
        );
    }

    #[test]
    fn test_invalid_configuration_message() {
        let err = EngineError::InvalidConfiguration {
            phase: PhaseKind::Work,
            seconds: 0,
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration: Work duration must be positive, got 0s"
        );
    }

    #[test]
    fn test_engine_error_maps_to_config_exit_code() {
        let err: PomotickError = EngineError::InvalidConfiguration {
            phase: PhaseKind::LongBreak,
            seconds: 0,
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }
}
