//! Phase engine
//!
//! Implements the work/break state machine at the heart of the timer.
//!
//! # Architecture
//!
//! - [`PhaseKind`] — Work, short break, long break
//! - [`PhaseState`] — Owned session state (mode, countdown, counter, durations)
//! - [`PhaseEngine`] — Command application, ticking, and the switch rule
//! - [`Snapshot`] / [`PhaseTransition`] — What renderers and subscribers see

pub mod engine;
pub mod kind;
pub mod state;

pub use engine::PhaseEngine;
pub use kind::{LONG_BREAK_EVERY, PhaseKind};
pub use state::{Durations, PhaseState, PhaseTransition, Snapshot, TransitionCause};
