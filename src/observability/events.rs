//! Structured event stream for `pomotick`.
//!
//! Discrete, typed session events serialized as newline-delimited JSON
//! (JSONL). Every line carries a monotonically increasing sequence number
//! and the session id so several sessions can share one sink.

use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::phase::{Durations, PhaseKind, PhaseTransition, Snapshot, TransitionCause};

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// Something that happened during a session, tagged by `"type"` in JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The session has started.
    SessionStarted {
        /// When the session started.
        timestamp: DateTime<Utc>,
        /// Initial durations.
        durations: Durations,
        /// Whether expired phases restart automatically.
        auto_continue: bool,
    },

    /// A user command was applied to the engine.
    CommandApplied {
        /// When the command was applied.
        timestamp: DateTime<Utc>,
        /// Command name (e.g. `"start"`, `"skip"`).
        command: String,
        /// Engine state after the command.
        snapshot: Snapshot,
    },

    /// A phase ended and another began.
    PhaseChanged {
        /// When the phase switched.
        timestamp: DateTime<Utc>,
        /// Phase that ended.
        ended: PhaseKind,
        /// Phase that was entered.
        entered: PhaseKind,
        /// Completed work phases after the transition.
        completed_work_phases: u32,
        /// Expiry or skip.
        cause: TransitionCause,
    },

    /// Durations were replaced.
    Reconfigured {
        /// When the new durations were applied.
        timestamp: DateTime<Utc>,
        /// The new durations.
        durations: Durations,
    },

    /// The session has ended.
    SessionEnded {
        /// When the session ended.
        timestamp: DateTime<Utc>,
        /// Completed work phases at the end.
        completed_work_phases: u32,
        /// Why the session stopped (`quit`, `end of input`, `interrupted`).
        reason: String,
    },
}

impl Event {
    /// Builds a [`PhaseChanged`](Self::PhaseChanged) event stamped now.
    #[must_use]
    pub fn phase_changed(transition: &PhaseTransition) -> Self {
        Self::PhaseChanged {
            timestamp: Utc::now(),
            ended: transition.ended,
            entered: transition.entered,
            completed_work_phases: transition.completed_work_phases,
            cause: transition.cause,
        }
    }
}

/// One JSONL record: ordering metadata with the event inlined.
#[derive(Debug, Serialize)]
struct Record<'a> {
    sequence: u64,
    session_id: Uuid,
    #[serde(flatten)]
    event: &'a Event,
}

type Sink = Mutex<Box<dyn Write + Send>>;

/// Appends session events to a JSONL sink.
///
/// `sequence` starts at zero and is stamped in emission order. Write
/// failures are dropped: losing an event line never stops the timer.
pub struct EventEmitter {
    sink: Option<Sink>,
    next_sequence: AtomicU64,
    session_id: Uuid,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("session_id", &self.session_id)
            .field("enabled", &self.sink.is_some())
            .field("next_sequence", &self.next_sequence.load(Ordering::Relaxed))
            .finish()
    }
}

impl EventEmitter {
    fn build(sink: Option<Sink>) -> Self {
        Self {
            sink,
            next_sequence: AtomicU64::new(0),
            session_id: Uuid::new_v4(),
        }
    }

    /// Emitter writing to an arbitrary sink.
    #[must_use]
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self::build(Some(Mutex::new(writer)))
    }

    /// Emitter that records nothing. Events are not even serialized.
    #[must_use]
    pub fn discard() -> Self {
        Self::build(None)
    }

    /// Emitter appending to `path`, created if missing.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened for append.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::with_writer(Box::new(file)))
    }

    /// Session id stamped on every record.
    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Writes `event` as one line.
    pub fn emit(&self, event: Event) {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let Some(sink) = &self.sink else {
            return;
        };

        let record = Record {
            sequence,
            session_id: self.session_id,
            event: &event,
        };
        let Ok(mut line) = serde_json::to_vec(&record) else {
            return;
        };
        line.push(b'\n');

        // Single write per record so concurrent appenders never split a line
        if let Ok(mut sink) = sink.lock() {
            let _ = sink.write_all(&line).and_then(|()| sink.flush());
        }
    }

    /// Events emitted so far, including discarded ones.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.next_sequence.load(Ordering::Relaxed)
    }
}
