//! Interactive timer session
//!
//! Reads shell commands from stdin, forwards them to the driver, and
//! renders status lines and transition messages on stdout.

use std::time::Duration;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, info, warn};

use crate::cli::args::RunArgs;
use crate::cli::shell::{HELP, ShellCommand};
use crate::clock::format_remaining;
use crate::config::{ConfigLoader, LoaderOptions};
use crate::driver::{self, Command, DriverHandle, DriverOptions};
use crate::error::PomotickError;
use crate::observability::{Event, EventEmitter, init_metrics};
use crate::phase::{Durations, PhaseEngine, PhaseKind, PhaseTransition, Snapshot};

/// Whether the input loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Runs an interactive session until EOF, `quit`, or Ctrl-C.
///
/// # Errors
///
/// Returns an error if settings fail to load, the events file cannot be
/// opened, the metrics exporter cannot bind, or stdin cannot be read.
pub async fn run(args: &RunArgs) -> Result<(), PomotickError> {
    let settings = ConfigLoader::new(LoaderOptions::default())
        .resolve(args.settings.config.as_deref(), &args.settings.overrides())?;

    init_metrics(args.metrics_port)?;

    let emitter = match &args.events {
        Some(path) => EventEmitter::open(path)?,
        None => EventEmitter::discard(),
    };

    let engine = PhaseEngine::new(settings.durations);
    let handle = driver::spawn(
        engine,
        DriverOptions {
            tick_interval: Duration::from_millis(args.tick_ms),
            auto_continue: settings.auto_continue,
        },
    );
    let mut transitions = handle.subscribe();
    let mut snapshots = handle.watch();

    info!(
        session_id = %emitter.session_id(),
        work = settings.durations.work(),
        short_break = settings.durations.short_break(),
        long_break = settings.durations.long_break(),
        auto_continue = settings.auto_continue,
        "session started"
    );
    emitter.emit(Event::SessionStarted {
        timestamp: Utc::now(),
        durations: settings.durations,
        auto_continue: settings.auto_continue,
    });

    let session = Session { handle, emitter };

    println!("{}", status_line(&session.handle.snapshot()));
    println!("Type 'help' for commands.");
    if args.start {
        session.execute(ShellCommand::Start).await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let reason = loop {
        tokio::select! {
            biased;

            _ = &mut ctrl_c => break "interrupted",

            received = transitions.recv() => match received {
                Ok(transition) => session.on_transition(&transition),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "transition notifications lagged");
                }
                Err(RecvError::Closed) => break "driver stopped",
            },

            changed = snapshots.changed() => {
                if changed.is_err() {
                    break "driver stopped";
                }
                let snapshot = *snapshots.borrow_and_update();
                println!("{}", status_line(&snapshot));
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    break "end of input";
                };
                match ShellCommand::parse(&line) {
                    Ok(Some(command)) => {
                        if session.execute(command).await? == Flow::Quit {
                            break "quit";
                        }
                    }
                    Ok(None) => {}
                    Err(e) => eprintln!("{e}"),
                }
            }
        }
    };

    // Transitions raised by the last command are already queued
    loop {
        match transitions.try_recv() {
            Ok(transition) => session.on_transition(&transition),
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "transition notifications lagged");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }

    session.finish(reason).await;
    Ok(())
}

/// Driver handle plus the session's event sink.
struct Session {
    handle: DriverHandle,
    emitter: EventEmitter,
}

impl Session {
    /// Applies one shell command.
    async fn execute(&self, command: ShellCommand) -> Result<Flow, PomotickError> {
        debug!(command = command.name(), "shell command");
        let applied = match command {
            ShellCommand::Start => self.handle.start().await?,
            ShellCommand::Pause => self.handle.pause().await?,
            ShellCommand::Toggle => {
                if self.handle.snapshot().running {
                    self.handle.pause().await?
                } else {
                    self.handle.start().await?
                }
            }
            ShellCommand::ResetPhase => self.handle.reset_phase().await?,
            ShellCommand::ResetCycle => {
                let snapshot = self.handle.reset_cycle().await?;
                println!("Pomodoro cycle reset.");
                snapshot
            }
            ShellCommand::Skip => self.handle.skip().await?,
            ShellCommand::Configure {
                work,
                short_break,
                long_break,
            } => {
                let durations = match Durations::new(work, short_break, long_break) {
                    Ok(durations) => durations,
                    Err(e) => {
                        eprintln!("{e}");
                        return Ok(Flow::Continue);
                    }
                };
                let snapshot = self.handle.send(Command::Reconfigure(durations)).await?;
                println!("{}", durations_line(&durations));
                self.emitter.emit(Event::Reconfigured {
                    timestamp: Utc::now(),
                    durations,
                });
                snapshot
            }
            ShellCommand::Status => {
                println!("{}", status_line(&self.handle.snapshot()));
                return Ok(Flow::Continue);
            }
            ShellCommand::Help => {
                println!("{HELP}");
                return Ok(Flow::Continue);
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        };

        self.emitter.emit(Event::CommandApplied {
            timestamp: Utc::now(),
            command: command.name().to_owned(),
            snapshot: applied,
        });
        Ok(Flow::Continue)
    }

    /// Announces a transition. Auto-continue already happened in the driver.
    fn on_transition(&self, transition: &PhaseTransition) {
        println!("{}", transition_message(transition));
        self.emitter.emit(Event::phase_changed(transition));
    }

    /// Stops the driver and prints the session summary.
    async fn finish(self, reason: &str) {
        let last = self.handle.shutdown().await;
        self.emitter.emit(Event::SessionEnded {
            timestamp: Utc::now(),
            completed_work_phases: last.completed_work_phases,
            reason: reason.to_owned(),
        });
        info!(
            reason,
            completed = last.completed_work_phases,
            events = self.emitter.emitted(),
            "session ended"
        );
        println!(
            "Session ended: {} pomodoros completed.",
            last.completed_work_phases
        );
    }
}

/// One-line rendering of a snapshot, e.g. `Work        24:59  running  (0 completed)`.
#[must_use]
pub fn status_line(snapshot: &Snapshot) -> String {
    let state = if snapshot.running { "running" } else { "paused" };
    format!(
        "{:<11} {:>7}  {:<7}  ({} completed)",
        snapshot.mode.label(),
        format_remaining(snapshot.remaining_seconds),
        state,
        snapshot.completed_work_phases
    )
}

/// Message shown once when a phase ends.
#[must_use]
pub fn transition_message(transition: &PhaseTransition) -> String {
    match transition.entered {
        PhaseKind::ShortBreak => format!(
            "Pomodoro {} done! Time for a short break.",
            transition.completed_work_phases
        ),
        PhaseKind::LongBreak => format!(
            "Pomodoro {} done! Time for a long break.",
            transition.completed_work_phases
        ),
        PhaseKind::Work => "Break's over! Back to work.".to_owned(),
    }
}

fn durations_line(durations: &Durations) -> String {
    format!(
        "Settings applied: work {}, short break {}, long break {}. Current timer phase reset.",
        format_remaining(durations.work()),
        format_remaining(durations.short_break()),
        format_remaining(durations.long_break())
    )
}
