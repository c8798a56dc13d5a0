//! Phase engine orchestration
//!
//! The `PhaseEngine` owns the session state, applies commands, advances
//! the countdown one second per tick, and runs the work/break switch
//! rule when a phase expires or is skipped.

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::EngineError;

use super::kind::PhaseKind;
use super::state::{Durations, PhaseState, PhaseTransition, Snapshot, TransitionCause};

/// Capacity of the transition broadcast channel.
const TRANSITION_CHANNEL_CAPACITY: usize = 64;

/// Phase engine managing the work/break cycle.
///
/// Coordinates:
/// - Run/pause state of the countdown
/// - One-second ticks and natural expiry
/// - The switch rule (work → short/long break → work)
/// - Transition notifications to subscribers
///
/// The engine never schedules itself. A driver calls [`tick`](Self::tick)
/// roughly once per second while [`is_running`](Self::is_running) holds.
#[derive(Debug)]
pub struct PhaseEngine {
    /// Session state (single writer: this engine)
    state: PhaseState,
    /// Sender for transition notifications
    transition_tx: broadcast::Sender<PhaseTransition>,
}

impl PhaseEngine {
    /// Creates a new engine paused at the start of the first work phase.
    #[must_use]
    pub fn new(durations: Durations) -> Self {
        let (transition_tx, _) = broadcast::channel(TRANSITION_CHANNEL_CAPACITY);
        Self {
            state: PhaseState::new(durations),
            transition_tx,
        }
    }

    /// Subscribes to transition notifications.
    ///
    /// Every transition produced after this call is delivered to the
    /// returned receiver.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PhaseTransition> {
        self.transition_tx.subscribe()
    }

    /// Clone of the transition sender, so a driver handle can hand out
    /// subscriptions after the engine has moved onto its task.
    pub(crate) fn transition_sender(&self) -> broadcast::Sender<PhaseTransition> {
        self.transition_tx.clone()
    }

    /// Starts the countdown. Does nothing if no time remains.
    pub fn start(&mut self) {
        if self.state.remaining_seconds() == 0 {
            debug!("start ignored: no time remaining");
            return;
        }
        self.state.set_running(true);
        debug!(mode = %self.state.mode(), remaining = self.state.remaining_seconds(), "timer started");
    }

    /// Pauses the countdown. Idempotent.
    pub fn pause(&mut self) {
        self.state.set_running(false);
        debug!(mode = %self.state.mode(), remaining = self.state.remaining_seconds(), "timer paused");
    }

    /// Rewinds the current phase to its full configured length and pauses.
    ///
    /// The mode and completed-work counter are unchanged.
    pub fn reset_phase(&mut self) {
        self.state.rewind();
        debug!(mode = %self.state.mode(), remaining = self.state.remaining_seconds(), "phase reset");
    }

    /// Returns to a fresh session: paused, first work phase, zero completed.
    pub fn reset_cycle(&mut self) {
        self.state.restart_cycle();
        info!("pomodoro cycle reset");
    }

    /// Replaces the configured durations and rewinds the current phase.
    ///
    /// Durations for other phases take effect when those phases are next
    /// entered.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if any duration is
    /// zero. State is left untouched in that case.
    pub fn reconfigure(
        &mut self,
        work: u64,
        short_break: u64,
        long_break: u64,
    ) -> Result<(), EngineError> {
        let durations = Durations::new(work, short_break, long_break)?;
        self.apply_durations(durations);
        Ok(())
    }

    /// Like [`reconfigure`](Self::reconfigure) for an already validated set.
    pub fn apply_durations(&mut self, durations: Durations) {
        self.state.set_durations(durations);
        self.state.rewind();
        debug!(
            work = durations.work(),
            short_break = durations.short_break(),
            long_break = durations.long_break(),
            "durations reconfigured"
        );
    }

    /// Advances the countdown by one second.
    ///
    /// Only meaningful while running; a paused engine or one already at
    /// zero is left unchanged. When this tick reaches zero the switch rule
    /// runs immediately and the resulting transition is returned.
    pub fn tick(&mut self) -> Option<PhaseTransition> {
        if !self.state.is_running() {
            return None;
        }
        if self.state.decrement() {
            return Some(self.switch_mode(TransitionCause::Expired));
        }
        None
    }

    /// Ends the current phase immediately, running or not.
    pub fn skip(&mut self) -> PhaseTransition {
        self.switch_mode(TransitionCause::Skipped)
    }

    /// Applies the switch rule and notifies subscribers.
    ///
    /// Leaving work bumps the counter and picks a long break on every
    /// fourth completion; leaving either break returns to work. The new
    /// phase always starts paused at full length.
    fn switch_mode(&mut self, cause: TransitionCause) -> PhaseTransition {
        let ended = self.state.mode();
        let entered = if ended == PhaseKind::Work {
            let completed = self.state.complete_work_phase();
            PhaseKind::break_after(completed)
        } else {
            PhaseKind::Work
        };
        self.state.enter(entered);

        let transition = PhaseTransition {
            ended,
            entered,
            completed_work_phases: self.state.completed_work_phases(),
            cause,
        };

        info!(
            from = %ended,
            to = %entered,
            completed = transition.completed_work_phases,
            cause = cause.as_str(),
            "phase transition"
        );

        // No subscribers is fine
        let _ = self.transition_tx.send(transition);

        transition
    }

    /// Returns a read-only view of the current state.
    #[must_use]
    pub const fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Current phase.
    #[must_use]
    pub const fn mode(&self) -> PhaseKind {
        self.state.mode()
    }

    /// Seconds left in the current phase.
    #[must_use]
    pub const fn remaining_seconds(&self) -> u64 {
        self.state.remaining_seconds()
    }

    /// Whether the countdown is decrementing.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Work phases ended so far.
    #[must_use]
    pub const fn completed_work_phases(&self) -> u32 {
        self.state.completed_work_phases()
    }

    /// Configured durations.
    #[must_use]
    pub const fn durations(&self) -> Durations {
        self.state.durations()
    }

    /// Returns the underlying state.
    #[must_use]
    pub const fn state(&self) -> &PhaseState {
        &self.state
    }
}

impl Default for PhaseEngine {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}
