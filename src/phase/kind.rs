//! Phase kinds and cycle cadence.

use serde::{Deserialize, Serialize};

/// Number of completed work phases between long breaks.
pub const LONG_BREAK_EVERY: u32 = 4;

/// One contiguous timed segment of the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// Focused work.
    Work,
    /// Break following most work phases.
    ShortBreak,
    /// Break following every [`LONG_BREAK_EVERY`]th work phase.
    LongBreak,
}

impl PhaseKind {
    /// Returns all kinds in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Work, Self::ShortBreak, Self::LongBreak]
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
        }
    }

    /// Stable identifier used in metrics labels and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::ShortBreak => "short_break",
            Self::LongBreak => "long_break",
        }
    }

    /// Break that follows the work phase whose completion brought the
    /// counter to `completed_work_phases`.
    #[must_use]
    pub const fn break_after(completed_work_phases: u32) -> Self {
        if completed_work_phases % LONG_BREAK_EVERY == 0 {
            Self::LongBreak
        } else {
            Self::ShortBreak
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
