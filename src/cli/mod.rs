//! Command-line interface
//!
//! Clap argument definitions, the interactive shell parser, and the
//! subcommand handlers.

pub mod args;
pub mod commands;
pub mod shell;
