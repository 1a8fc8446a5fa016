// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running a job command, using
//! `tokio::process::Command`, and streaming its output back to the caller.
//!
//! - [`launcher`] starts the shell process with piped stdout/stderr.
//! - [`pump`] drains one output pipe line by line.
//! - [`history`] keeps the bounded tail of a stream for display.
//! - [`supervisor`] owns one run end to end and produces a [`RunResult`].
//! - [`sink`] contains the [`OutputSink`] trait and its stock impls.

use std::fmt;

use chrono::{DateTime, Local};

use crate::errors::LaunchError;

pub mod history;
pub mod launcher;
pub mod pump;
pub mod sink;
pub mod supervisor;

pub use history::{DEFAULT_HISTORY_LINES, OutputHistory};
pub use launcher::{LaunchedProcess, RunRequest, launch};
pub use pump::{pump, pump_until};
pub use sink::{FnSink, NullSink, OutputSink};
pub use supervisor::{DEFAULT_DRAIN_GRACE, Supervisor};

/// Which pipe of the child a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => f.write_str("stdout"),
            StreamKind::Stderr => f.write_str("stderr"),
        }
    }
}

/// One completed line of child output.
///
/// `sequence` starts at 0 and increases by one per line within a stream.
/// There is no ordering relation between stdout and stderr sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    stream: StreamKind,
    text: String,
    sequence: u64,
}

impl OutputLine {
    pub fn new(stream: StreamKind, text: impl Into<String>, sequence: u64) -> Self {
        Self {
            stream,
            text: text.into(),
            sequence,
        }
    }

    pub fn stream(&self) -> StreamKind {
        self.stream
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Lifecycle of a supervisor's current run.
///
/// `Idle -> Launching -> Running -> Finished`, or `Launching -> Finished`
/// when the process could not be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Launching,
    Running,
    Finished,
}

impl RunState {
    /// True while a run occupies the supervisor.
    pub fn is_active(self) -> bool {
        matches!(self, RunState::Launching | RunState::Running)
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The child ran and terminated with this code. Signal deaths on Unix
    /// are reported as `128 + signal`.
    Exited(i32),
    /// The child was never started.
    LaunchFailed(LaunchError),
}

/// Terminal result of one run.
#[derive(Debug)]
pub struct RunResult {
    pub outcome: RunOutcome,
    pub completed_at: DateTime<Local>,
    pub stdout: OutputHistory,
    pub stderr: OutputHistory,
}

impl RunResult {
    pub(crate) fn launch_failed(err: LaunchError, history_cap: usize) -> Self {
        Self {
            outcome: RunOutcome::LaunchFailed(err),
            completed_at: Local::now(),
            stdout: OutputHistory::new(history_cap),
            stderr: OutputHistory::new(history_cap),
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self.outcome {
            RunOutcome::Exited(code) => Some(code),
            RunOutcome::LaunchFailed(_) => None,
        }
    }

    pub fn launch_error(&self) -> Option<&LaunchError> {
        match &self.outcome {
            RunOutcome::Exited(_) => None,
            RunOutcome::LaunchFailed(err) => Some(err),
        }
    }

    /// Exit code 0 by convention.
    pub fn success(&self) -> bool {
        self.exit_code() == Some(0)
    }
}
