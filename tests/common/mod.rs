//! Shared integration-test harness for running the `pomotick` binary.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Output, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Helpers for invoking the compiled `pomotick` binary.
pub struct Pomotick;

impl Pomotick {
    /// Path to the compiled binary.
    pub fn bin() -> &'static str {
        env!("CARGO_BIN_EXE_pomotick")
    }

    /// Returns the path to a fixture file in `tests/fixtures/`.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    /// Runs a one-shot command with stdin closed and captures its output.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        Command::new(Self::bin())
            .args(args)
            .env_remove("POMOTICK_CONFIG")
            .env_remove("POMOTICK_WORK")
            .env_remove("POMOTICK_SHORT_BREAK")
            .env_remove("POMOTICK_LONG_BREAK")
            .env_remove("POMOTICK_AUTO_CONTINUE")
            .stdin(Stdio::null())
            .output()
            .expect("failed to run pomotick")
    }

    /// Runs `pomotick run` with `script` piped to stdin, then EOF.
    #[allow(clippy::missing_panics_doc)]
    pub fn run_session(args: &[&str], script: &str) -> Output {
        Self::run_session_with_delay(args, script, Duration::ZERO)
    }

    /// Like [`run_session`](Self::run_session) but keeps stdin open for
    /// `delay` before writing `script`.
    #[allow(clippy::missing_panics_doc)]
    pub fn run_session_with_delay(args: &[&str], script: &str, delay: Duration) -> Output {
        let mut child = Self::session_command(args)
            .spawn()
            .expect("failed to spawn pomotick");

        let mut stdin = child.stdin.take().expect("stdin not captured");
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        stdin
            .write_all(script.as_bytes())
            .expect("failed to write script");
        drop(stdin);

        child.wait_with_output().expect("failed to wait on pomotick")
    }

    /// Runs `pomotick run` with stdin held open until a stdout line
    /// contains `marker` or `timeout` passes, then sends EOF.
    ///
    /// Returns the exit status and everything written to stdout.
    #[allow(clippy::missing_panics_doc)]
    pub fn run_session_until(args: &[&str], marker: &str, timeout: Duration) -> (ExitStatus, String) {
        let mut child = Self::session_command(args)
            .stderr(Stdio::null())
            .spawn()
            .expect("failed to spawn pomotick");
        let stdin = child.stdin.take().expect("stdin not captured");
        let stdout = child.stdout.take().expect("stdout not captured");

        let (tx, rx) = mpsc::channel();
        let reader = std::thread::spawn(move || {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        let deadline = Instant::now() + timeout;
        let mut seen = String::new();
        while let Ok(line) = rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            seen.push_str(&line);
            seen.push('\n');
            if line.contains(marker) {
                break;
            }
        }

        drop(stdin);
        let status = child.wait().expect("failed to wait on pomotick");
        for line in rx.iter() {
            seen.push_str(&line);
            seen.push('\n');
        }
        reader.join().expect("stdout reader panicked");
        (status, seen)
    }

    fn session_command(args: &[&str]) -> Command {
        let mut command = Command::new(Self::bin());
        command
            .arg("run")
            .args(args)
            .arg("--quiet")
            .env_remove("POMOTICK_CONFIG")
            .env_remove("POMOTICK_WORK")
            .env_remove("POMOTICK_SHORT_BREAK")
            .env_remove("POMOTICK_LONG_BREAK")
            .env_remove("POMOTICK_AUTO_CONTINUE")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    /// Lossy stdout as a string.
    pub fn stdout(output: &Output) -> String {
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Lossy stderr as a string.
    pub fn stderr(output: &Output) -> String {
        String::from_utf8_lossy(&output.stderr).into_owned()
    }
}
