//! Timer driver
//!
//! Runs a [`PhaseEngine`] on a tokio task: applies commands in arrival
//! order and calls [`PhaseEngine::tick`] once per period while the
//! countdown is running. The engine itself never sleeps or schedules.
//!
//! A command sent through [`DriverHandle`] is fully applied, including
//! any resulting phase switch, before its future resolves and before the
//! next tick is considered. With [`DriverOptions::auto_continue`] the
//! restart after an expiry happens inside the same tick, so a command
//! queued behind it always has the last word.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::DriverError;
use crate::observability::metrics;
use crate::phase::{Durations, PhaseEngine, PhaseTransition, Snapshot};

/// Default time between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Capacity of the command channel.
const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// Driver tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    /// Wall-clock time per one-second tick.
    pub tick_interval: Duration,
    /// Restart the countdown when a phase expires on its own.
    pub auto_continue: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            auto_continue: false,
        }
    }
}

/// A command routed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Resume the countdown.
    Start,
    /// Pause the countdown.
    Pause,
    /// Rewind the current phase.
    ResetPhase,
    /// Start over from the first work phase.
    ResetCycle,
    /// End the current phase now.
    Skip,
    /// Replace durations and rewind the current phase.
    Reconfigure(Durations),
}

impl Command {
    /// Short name used in logs and events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::ResetPhase => "reset_phase",
            Self::ResetCycle => "reset_cycle",
            Self::Skip => "skip",
            Self::Reconfigure(_) => "reconfigure",
        }
    }
}

/// Command plus the channel its resulting snapshot is returned on.
struct Request {
    command: Command,
    reply: oneshot::Sender<Snapshot>,
}

/// Handle to a running driver task.
#[derive(Debug)]
pub struct DriverHandle {
    commands: mpsc::Sender<Request>,
    snapshots: watch::Receiver<Snapshot>,
    transitions: broadcast::Sender<PhaseTransition>,
    cancel: CancellationToken,
    task: JoinHandle<Snapshot>,
}

/// Moves `engine` onto a new tokio task and returns its handle.
///
/// Must be called from within a tokio runtime.
#[must_use]
pub fn spawn(engine: PhaseEngine, options: DriverOptions) -> DriverHandle {
    let (commands, requests) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    let (snapshot_tx, snapshots) = watch::channel(engine.snapshot());
    let transitions = engine.transition_sender();
    let cancel = CancellationToken::new();

    metrics::set_current_phase(engine.mode());
    metrics::set_remaining(engine.remaining_seconds());

    let task = tokio::spawn(run(engine, requests, snapshot_tx, cancel.clone(), options));

    DriverHandle {
        commands,
        snapshots,
        transitions,
        cancel,
        task,
    }
}

impl DriverHandle {
    /// Sends a command and waits until it has been applied.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Stopped`] if the driver task has exited.
    pub async fn send(&self, command: Command) -> Result<Snapshot, DriverError> {
        let (reply, applied) = oneshot::channel();
        self.commands
            .send(Request { command, reply })
            .await
            .map_err(|_| DriverError::Stopped)?;
        applied.await.map_err(|_| DriverError::Stopped)
    }

    /// Resumes the countdown.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Stopped`] if the driver task has exited.
    pub async fn start(&self) -> Result<Snapshot, DriverError> {
        self.send(Command::Start).await
    }

    /// Pauses the countdown.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Stopped`] if the driver task has exited.
    pub async fn pause(&self) -> Result<Snapshot, DriverError> {
        self.send(Command::Pause).await
    }

    /// Rewinds the current phase.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Stopped`] if the driver task has exited.
    pub async fn reset_phase(&self) -> Result<Snapshot, DriverError> {
        self.send(Command::ResetPhase).await
    }

    /// Starts the cycle over.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Stopped`] if the driver task has exited.
    pub async fn reset_cycle(&self) -> Result<Snapshot, DriverError> {
        self.send(Command::ResetCycle).await
    }

    /// Ends the current phase now.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Stopped`] if the driver task has exited.
    pub async fn skip(&self) -> Result<Snapshot, DriverError> {
        self.send(Command::Skip).await
    }

    /// Validates and applies new durations.
    ///
    /// Validation happens before anything is sent, so a rejected
    /// configuration never reaches the engine.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Engine`] for a zero duration, or
    /// [`DriverError::Stopped`] if the driver task has exited.
    pub async fn reconfigure(
        &self,
        work: u64,
        short_break: u64,
        long_break: u64,
    ) -> Result<Snapshot, DriverError> {
        let durations = Durations::new(work, short_break, long_break)?;
        self.send(Command::Reconfigure(durations)).await
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        *self.snapshots.borrow()
    }

    /// Receiver that is notified on every snapshot change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Subscribes to phase transitions.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PhaseTransition> {
        self.transitions.subscribe()
    }

    /// Stops the driver and returns the final snapshot.
    pub async fn shutdown(self) -> Snapshot {
        let last = self.snapshot();
        self.cancel.cancel();
        self.task.await.unwrap_or(last)
    }
}

/// Driver task body.
async fn run(
    mut engine: PhaseEngine,
    mut requests: mpsc::Receiver<Request>,
    snapshots: watch::Sender<Snapshot>,
    cancel: CancellationToken,
    options: DriverOptions,
) -> Snapshot {
    let period = options.tick_interval;
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                debug!("driver cancelled");
                break;
            }

            request = requests.recv() => {
                let Some(Request { command, reply }) = request else {
                    debug!("all driver handles dropped");
                    break;
                };

                let was_running = engine.is_running();
                if let Some(transition) = apply(&mut engine, command) {
                    metrics::record_transition(&transition);
                }
                if engine.is_running() && !was_running {
                    // First decrement lands one full period after start
                    interval.reset();
                }

                let snapshot = engine.snapshot();
                snapshots.send_replace(snapshot);
                metrics::set_remaining(snapshot.remaining_seconds);
                metrics::set_completed(snapshot.completed_work_phases);
                let _ = reply.send(snapshot);
            }

            _ = interval.tick(), if engine.is_running() => {
                let transition = engine.tick();
                metrics::record_tick(engine.remaining_seconds());
                if let Some(transition) = transition {
                    metrics::record_transition(&transition);
                    if options.auto_continue {
                        debug!(mode = %transition.entered, "auto-continue");
                        engine.start();
                    }
                }
                snapshots.send_replace(engine.snapshot());
            }
        }
    }

    engine.snapshot()
}

fn apply(engine: &mut PhaseEngine, command: Command) -> Option<PhaseTransition> {
    debug!(command = command.name(), "applying command");
    match command {
        Command::Start => engine.start(),
        Command::Pause => engine.pause(),
        Command::ResetPhase => engine.reset_phase(),
        Command::ResetCycle => engine.reset_cycle(),
        Command::Skip => return Some(engine.skip()),
        Command::Reconfigure(durations) => engine.apply_durations(durations),
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{PhaseKind, TransitionCause};

    fn engine() -> PhaseEngine {
        PhaseEngine::new(Durations::new(3, 1, 2).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_command_reply_reflects_state() {
        let handle = spawn(engine(), DriverOptions::default());
        let snap = handle.start().await.unwrap();
        assert!(snap.running);
        assert_eq!(snap.remaining_seconds, 3);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_while_running() {
        let handle = spawn(engine(), DriverOptions::default());
        let mut transitions = handle.subscribe();
        handle.start().await.unwrap();

        let t = transitions.recv().await.unwrap();
        assert_eq!(t.ended, PhaseKind::Work);
        assert_eq!(t.entered, PhaseKind::ShortBreak);

        let snap = handle.snapshot();
        assert_eq!(snap.mode, PhaseKind::ShortBreak);
        assert_eq!(snap.remaining_seconds, 1);
        assert!(!snap.running);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_while_paused() {
        let handle = spawn(engine(), DriverOptions::default());
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.snapshot().remaining_seconds, 3);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconfigure_rejected_before_send() {
        let handle = spawn(engine(), DriverOptions::default());
        let err = handle.reconfigure(0, 5, 15).await.unwrap_err();
        assert!(matches!(err, DriverError::Engine(_)));
        assert_eq!(handle.snapshot().remaining_seconds, 3);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_continue_restarts_inside_tick() {
        let handle = spawn(
            PhaseEngine::new(Durations::new(1, 5, 5).unwrap()),
            DriverOptions {
                auto_continue: true,
                ..DriverOptions::default()
            },
        );
        let mut transitions = handle.subscribe();
        handle.start().await.unwrap();

        let t = transitions.recv().await.unwrap();
        assert_eq!(t.entered, PhaseKind::ShortBreak);
        let snap = handle.snapshot();
        assert_eq!(snap.mode, PhaseKind::ShortBreak);
        assert!(snap.running);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_after_expiry_stays_paused_with_auto_continue() {
        let handle = spawn(
            PhaseEngine::new(Durations::new(1, 5, 5).unwrap()),
            DriverOptions {
                auto_continue: true,
                ..DriverOptions::default()
            },
        );
        let mut transitions = handle.subscribe();
        handle.start().await.unwrap();
        let expired = transitions.recv().await.unwrap();
        assert_eq!(expired.cause, TransitionCause::Expired);

        let after_skip = handle.skip().await.unwrap();
        assert_eq!(after_skip.mode, PhaseKind::Work);
        assert!(!after_skip.running);

        tokio::time::sleep(Duration::from_secs(3)).await;
        let snap = handle.snapshot();
        assert_eq!(snap.mode, PhaseKind::Work);
        assert_eq!(snap.remaining_seconds, 1);
        assert!(!snap.running);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_never_auto_continues() {
        let handle = spawn(
            engine(),
            DriverOptions {
                auto_continue: true,
                ..DriverOptions::default()
            },
        );
        let snap = handle.skip().await.unwrap();
        assert_eq!(snap.mode, PhaseKind::ShortBreak);
        assert!(!snap.running);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_after_shutdown_fails() {
        let handle = spawn(engine(), DriverOptions::default());
        handle.cancel.cancel();
        // Give the task a chance to observe cancellation
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(matches!(handle.skip().await, Err(DriverError::Stopped)));
    }
}
