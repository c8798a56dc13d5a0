//! Phase state representation
//!
//! Plain owned state for the single session. The engine is the only
//! writer; everything else reads through [`Snapshot`].

use serde::Serialize;

use crate::error::EngineError;

use super::kind::PhaseKind;

/// Default work phase length in seconds (25 minutes).
pub const DEFAULT_WORK_SECONDS: u64 = 25 * 60;

/// Default short break length in seconds (5 minutes).
pub const DEFAULT_SHORT_BREAK_SECONDS: u64 = 5 * 60;

/// Default long break length in seconds (15 minutes).
pub const DEFAULT_LONG_BREAK_SECONDS: u64 = 15 * 60;

/// Configured length of each phase kind, in seconds.
///
/// All three values are strictly positive; the only constructor
/// enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Durations {
    work: u64,
    short_break: u64,
    long_break: u64,
}

impl Durations {
    /// Creates a validated set of durations.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] naming the first
    /// phase whose duration is zero.
    pub const fn new(work: u64, short_break: u64, long_break: u64) -> Result<Self, EngineError> {
        if work == 0 {
            return Err(EngineError::InvalidConfiguration {
                phase: PhaseKind::Work,
                seconds: work,
            });
        }
        if short_break == 0 {
            return Err(EngineError::InvalidConfiguration {
                phase: PhaseKind::ShortBreak,
                seconds: short_break,
            });
        }
        if long_break == 0 {
            return Err(EngineError::InvalidConfiguration {
                phase: PhaseKind::LongBreak,
                seconds: long_break,
            });
        }
        Ok(Self {
            work,
            short_break,
            long_break,
        })
    }

    /// Duration of the given phase kind.
    #[must_use]
    pub const fn for_phase(&self, kind: PhaseKind) -> u64 {
        match kind {
            PhaseKind::Work => self.work,
            PhaseKind::ShortBreak => self.short_break,
            PhaseKind::LongBreak => self.long_break,
        }
    }

    /// Work phase length in seconds.
    #[must_use]
    pub const fn work(&self) -> u64 {
        self.work
    }

    /// Short break length in seconds.
    #[must_use]
    pub const fn short_break(&self) -> u64 {
        self.short_break
    }

    /// Long break length in seconds.
    #[must_use]
    pub const fn long_break(&self) -> u64 {
        self.long_break
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work: DEFAULT_WORK_SECONDS,
            short_break: DEFAULT_SHORT_BREAK_SECONDS,
            long_break: DEFAULT_LONG_BREAK_SECONDS,
        }
    }
}

/// Why a phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// The countdown reached zero on a tick.
    Expired,
    /// The phase was skipped by command.
    Skipped,
}

impl TransitionCause {
    /// Stable identifier used in metrics labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Skipped => "skipped",
        }
    }
}

/// Record of a phase transition, sent to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseTransition {
    /// Phase that just ended
    pub ended: PhaseKind,
    /// Phase that was entered
    pub entered: PhaseKind,
    /// Completed work phases after the transition
    pub completed_work_phases: u32,
    /// Expiry or skip
    pub cause: TransitionCause,
}

/// Read-only view of the engine for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Current phase
    pub mode: PhaseKind,
    /// Seconds left in the current phase
    pub remaining_seconds: u64,
    /// Whether the countdown is decrementing
    pub running: bool,
    /// Work phases ended so far (by expiry or skip)
    pub completed_work_phases: u32,
}

/// Mutable session state owned by [`PhaseEngine`](super::PhaseEngine).
///
/// `running` is never `true` while `remaining_seconds` is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseState {
    mode: PhaseKind,
    remaining_seconds: u64,
    running: bool,
    completed_work_phases: u32,
    durations: Durations,
}

impl PhaseState {
    /// Creates the initial state: paused at the start of a work phase.
    #[must_use]
    pub const fn new(durations: Durations) -> Self {
        Self {
            mode: PhaseKind::Work,
            remaining_seconds: durations.work(),
            running: false,
            completed_work_phases: 0,
            durations,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn mode(&self) -> PhaseKind {
        self.mode
    }

    /// Seconds left in the current phase.
    #[must_use]
    pub const fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// Whether the countdown is decrementing.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Work phases ended so far.
    #[must_use]
    pub const fn completed_work_phases(&self) -> u32 {
        self.completed_work_phases
    }

    /// Configured durations.
    #[must_use]
    pub const fn durations(&self) -> Durations {
        self.durations
    }

    /// Copies the renderable fields.
    #[must_use]
    pub const fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            remaining_seconds: self.remaining_seconds,
            running: self.running,
            completed_work_phases: self.completed_work_phases,
        }
    }

    pub(super) const fn set_running(&mut self, running: bool) {
        self.running = running && self.remaining_seconds > 0;
    }

    pub(super) const fn set_durations(&mut self, durations: Durations) {
        self.durations = durations;
    }

    /// Rewinds the current phase to its full configured length and pauses.
    pub(super) const fn rewind(&mut self) {
        self.running = false;
        self.remaining_seconds = self.durations.for_phase(self.mode);
    }

    /// Returns to the first work phase with a zeroed counter.
    pub(super) const fn restart_cycle(&mut self) {
        self.mode = PhaseKind::Work;
        self.completed_work_phases = 0;
        self.rewind();
    }

    /// Removes one second; returns `true` if this reached zero.
    pub(super) const fn decrement(&mut self) -> bool {
        if self.remaining_seconds == 0 {
            return false;
        }
        self.remaining_seconds -= 1;
        self.remaining_seconds == 0
    }

    /// Enters `mode` at its full length, paused.
    pub(super) const fn enter(&mut self, mode: PhaseKind) {
        self.mode = mode;
        self.rewind();
    }

    /// Counts one more finished work phase, returning the new total.
    pub(super) const fn complete_work_phase(&mut self) -> u32 {
        self.completed_work_phases = self.completed_work_phases.saturating_add(1);
        self.completed_work_phases
    }
}
