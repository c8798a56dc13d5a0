//! Metrics collection for `pomotick`.
//!
//! Counters and gauges are recorded through the `metrics` facade and are
//! no-ops until [`init_metrics`] installs a recorder. Label values come
//! only from closed enums, so cardinality is bounded.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::PomotickError;
use crate::phase::{PhaseKind, PhaseTransition};

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without
/// an HTTP endpoint.
///
/// # Errors
///
/// Returns `PomotickError::Io` if the recorder or HTTP listener
/// cannot be installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), PomotickError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| PomotickError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!("pomotick_ticks_total", "Countdown seconds elapsed while running");
    describe_counter!(
        "pomotick_phase_transitions_total",
        "Phase transitions by origin, destination and cause"
    );
    describe_gauge!(
        "pomotick_completed_work_phases",
        "Work phases completed in the current cycle"
    );
    describe_gauge!("pomotick_current_phase", "Currently active phase (1 = active)");
    describe_gauge!("pomotick_remaining_seconds", "Seconds left in the current phase");
}

/// Records one elapsed second.
pub fn record_tick(remaining_seconds: u64) {
    counter!("pomotick_ticks_total").increment(1);
    set_remaining(remaining_seconds);
}

/// Records a phase transition and updates the phase gauges.
pub fn record_transition(transition: &PhaseTransition) {
    counter!(
        "pomotick_phase_transitions_total",
        "from" => transition.ended.as_str(),
        "to" => transition.entered.as_str(),
        "cause" => transition.cause.as_str(),
    )
    .increment(1);
    set_current_phase(transition.entered);
    set_completed(transition.completed_work_phases);
}

/// Sets the completed-work-phases gauge.
pub fn set_completed(completed_work_phases: u32) {
    gauge!("pomotick_completed_work_phases").set(f64::from(completed_work_phases));
}

/// Sets the currently active phase gauge, zeroing the other kinds.
pub fn set_current_phase(mode: PhaseKind) {
    for kind in PhaseKind::all() {
        let value = if *kind == mode { 1.0 } else { 0.0 };
        gauge!("pomotick_current_phase", "phase" => kind.as_str()).set(value);
    }
}

/// Sets the remaining-seconds gauge.
#[allow(clippy::cast_precision_loss)]
pub fn set_remaining(remaining_seconds: u64) {
    gauge!("pomotick_remaining_seconds").set(remaining_seconds as f64);
}
