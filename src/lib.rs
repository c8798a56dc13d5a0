//! `pomotick` - Pomodoro interval timer
//!
//! A phase engine that alternates work phases with short and long breaks,
//! an async driver that ticks it once per second, and the CLI around them.

pub mod cli;
pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod observability;
pub mod phase;
