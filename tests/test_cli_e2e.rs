//! End-to-end tests against the compiled binary.

mod common;

use std::time::Duration;

use common::Pomotick;
use serde_json::Value;

// ============================================================================
// One-shot subcommands
// ============================================================================

#[test]
fn version_human() {
    let output = Pomotick::spawn_command(&["version"]);
    assert!(output.status.success());
    let stdout = Pomotick::stdout(&output);
    assert!(stdout.starts_with("pomotick "), "{stdout}");
}

#[test]
fn version_json() {
    let output = Pomotick::spawn_command(&["version", "--format", "json"]);
    assert!(output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["name"], "pomotick");
    assert_eq!(parsed["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn format_renders_clocks() {
    let output = Pomotick::spawn_command(&["format", "1500", "59", "3600", "0"]);
    assert!(output.status.success());
    assert_eq!(Pomotick::stdout(&output), "25:00\n00:59\n1:00:00\n00:00\n");
}

#[test]
fn completions_bash() {
    let output = Pomotick::spawn_command(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(Pomotick::stdout(&output).contains("pomotick"));
}

#[test]
fn config_json_from_fixture() {
    let path = Pomotick::fixture_path("valid_settings.yaml");
    let output = Pomotick::spawn_command(&[
        "config",
        "--config",
        path.to_str().unwrap(),
        "--format",
        "json",
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        Pomotick::stderr(&output)
    );
    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["durations"]["work"], 3000);
    assert_eq!(parsed["durations"]["short_break"], 600);
    assert_eq!(parsed["durations"]["long_break"], 1800);
    assert_eq!(parsed["auto_continue"], true);
}

#[test]
fn config_human_defaults() {
    let output = Pomotick::spawn_command(&["config"]);
    assert!(output.status.success());
    let stdout = Pomotick::stdout(&output);
    assert!(stdout.contains("25:00"), "{stdout}");
    assert!(stdout.contains("built-in defaults"), "{stdout}");
}

#[test]
fn config_invalid_exits_with_config_code() {
    for fixture in ["zero_duration.yaml", "unknown_key.yaml", "malformed.yaml"] {
        let path = Pomotick::fixture_path(fixture);
        let output = Pomotick::spawn_command(&["config", "--config", path.to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(2), "fixture {fixture}");
        assert!(Pomotick::stderr(&output).starts_with("error: "));
    }
}

#[test]
fn config_missing_file_exits_with_config_code() {
    let output = Pomotick::spawn_command(&[
        "config",
        "--config",
        "/tmp/nonexistent_pomotick_settings.yaml",
    ]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn zero_work_flag_rejected() {
    let output = Pomotick::spawn_command(&["config", "--work", "0"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(Pomotick::stderr(&output).contains("work"));
}

#[test]
fn unknown_subcommand_exits_with_usage_code() {
    let output = Pomotick::spawn_command(&["no-such-subcommand"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(!Pomotick::stderr(&output).is_empty());
}

#[test]
fn bad_flag_value_exits_with_usage_code() {
    let output = Pomotick::spawn_command(&["run", "--tick-ms", "0"]);
    assert_eq!(output.status.code(), Some(64));

    let output = Pomotick::spawn_command(&["config", "--no-such-flag"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn help_and_version_flags_exit_zero() {
    let output = Pomotick::spawn_command(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(Pomotick::stdout(&output).contains("Usage"));

    let output = Pomotick::spawn_command(&["--version"]);
    assert_eq!(output.status.code(), Some(0));
}

// ============================================================================
// Interactive sessions
// ============================================================================

#[test]
fn skipping_through_to_long_break() {
    let output = Pomotick::run_session(&[], &"skip\n".repeat(7));
    assert!(output.status.success());
    let stdout = Pomotick::stdout(&output);
    for n in 1..=3 {
        assert!(
            stdout.contains(&format!("Pomodoro {n} done! Time for a short break.")),
            "{stdout}"
        );
    }
    assert!(stdout.contains("Break's over! Back to work."));
    assert!(stdout.contains("Pomodoro 4 done! Time for a long break."));
    assert!(stdout.contains("Session ended: 4 pomodoros completed."));
}

#[test]
fn quit_ends_session_with_summary() {
    let output = Pomotick::run_session(&[], "skip\nquit\nskip\n");
    assert!(output.status.success());
    let stdout = Pomotick::stdout(&output);
    assert!(stdout.contains("Pomodoro 1 done! Time for a short break."));
    assert!(stdout.trim_end().ends_with("Session ended: 1 pomodoros completed."));
}

#[test]
fn reset_cycle_message() {
    let output = Pomotick::run_session(&[], "skip\nR\nstatus\n");
    let stdout = Pomotick::stdout(&output);
    assert!(stdout.contains("Pomodoro cycle reset."));
    assert!(stdout.contains("Session ended: 0 pomodoros completed."));
}

#[test]
fn reconfigure_from_shell() {
    let output = Pomotick::run_session(&[], "config 10 2 2\nstatus\n");
    let stdout = Pomotick::stdout(&output);
    assert!(
        stdout.contains("Settings applied: work 10:00, short break 02:00, long break 02:00."),
        "{stdout}"
    );
    assert!(
        stdout.lines().any(|line| line.starts_with("Work")
            && line.contains("10:00")
            && line.contains("paused")),
        "{stdout}"
    );
}

#[test]
fn unknown_command_gets_suggestion() {
    let output = Pomotick::run_session(&[], "strat\n");
    assert!(output.status.success());
    assert!(Pomotick::stderr(&output).contains("did you mean 'start'?"));
}

#[test]
fn session_flags_override_defaults() {
    let output = Pomotick::run_session(&["--work", "50m"], "status\n");
    assert!(Pomotick::stdout(&output).contains("50:00"));
}

#[test]
fn auto_continue_runs_through_cycle() {
    let long_break = "Pomodoro 4 done! Time for a long break.";
    let (status, stdout) = Pomotick::run_session_until(
        &[
            "--work",
            "1s",
            "--short-break",
            "1s",
            "--long-break",
            "1s",
            "--tick-ms",
            "5",
            "--auto-continue",
            "--start",
        ],
        long_break,
        Duration::from_secs(30),
    );
    assert!(status.success());
    assert!(stdout.contains(long_break), "{stdout}");
    assert!(stdout.contains("Session ended:"), "{stdout}");
}

#[test]
fn events_file_records_session() {
    let dir = tempfile::tempdir().unwrap();
    let events = dir.path().join("events.jsonl");
    let output = Pomotick::run_session(
        &["--events", events.to_str().unwrap()],
        "start\nskip\nconfig 5m 1m 2m\nquit\n",
    );
    assert!(output.status.success());

    let raw = std::fs::read_to_string(&events).unwrap();
    let lines: Vec<Value> = raw
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    let types: Vec<&str> = lines.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(types.first(), Some(&"SessionStarted"));
    assert_eq!(types.last(), Some(&"SessionEnded"));
    assert!(types.contains(&"PhaseChanged"));
    assert!(types.contains(&"Reconfigured"));
    assert!(types.contains(&"CommandApplied"));

    for (i, event) in lines.iter().enumerate() {
        assert_eq!(event["sequence"], i as u64);
        assert_eq!(event["session_id"], lines[0]["session_id"]);
    }
    assert_eq!(lines.last().unwrap()["completed_work_phases"], 1);
    assert_eq!(lines.last().unwrap()["reason"], "quit");
}
