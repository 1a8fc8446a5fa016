// src/exec/supervisor.rs

//! Owning one job run from launch to final result.

use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::errors::{LaunchdeckError, Result};

use super::history::DEFAULT_HISTORY_LINES;
use super::launcher::{LaunchedProcess, RunRequest, launch};
use super::pump::pump_until;
use super::{OutputHistory, OutputSink, RunOutcome, RunResult, RunState, StreamKind};

/// Conventional shell exit code base for signal deaths: `128 + signal`.
#[cfg(unix)]
const EXIT_CODE_SIGNAL_BASE: i32 = 128;

/// How long the pumps may keep draining after the child has exited.
///
/// Normally both pipes close with the child. A background process that
/// inherited them can keep them open indefinitely, so past this point the
/// pumps are detached and the run finishes with what was collected.
pub const DEFAULT_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Runs one job at a time and reports its result.
///
/// The supervisor is the only owner of the run state; pass it (or an
/// `Arc` of it) to whatever issues launches. Concurrent supervisors are
/// independent of each other.
///
/// There is no cancellation: once launched, a run proceeds until the child
/// exits and both pipes are drained or the drain grace period runs out.
#[derive(Debug)]
pub struct Supervisor {
    state: watch::Sender<RunState>,
    history_cap: usize,
    drain_grace: Duration,
}

impl Supervisor {
    pub fn new() -> Self {
        let (state, _) = watch::channel(RunState::Idle);
        Self {
            state,
            history_cap: DEFAULT_HISTORY_LINES,
            drain_grace: DEFAULT_DRAIN_GRACE,
        }
    }

    /// Number of recent lines kept per stream in the [`RunResult`].
    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap.max(1);
        self
    }

    /// How long to keep reading output after the child exits.
    pub fn with_drain_grace(mut self, grace: Duration) -> Self {
        self.drain_grace = grace;
        self
    }

    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Observe state transitions of this supervisor's runs.
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    /// Execute `request` to completion.
    ///
    /// Output lines are delivered to `sink` while the job runs. The returned
    /// result is assembled only after the child has exited **and** both
    /// streams reached end-of-stream, so no trailing output is lost. A stream
    /// still open [`DEFAULT_DRAIN_GRACE`] (or the configured grace) after the
    /// exit is detached instead of waited on.
    ///
    /// Launch failures and non-zero exits are reported inside the
    /// [`RunResult`]; the only `Err` is [`LaunchdeckError::SupervisorBusy`]
    /// when another run is still active on this supervisor.
    pub async fn execute<S: OutputSink>(&self, request: RunRequest, sink: S) -> Result<RunResult> {
        let guard = self.begin()?;

        info!(
            cmd = %request.command(),
            working_dir = %request.working_dir().display(),
            "launching job"
        );

        let process = match launch(&request) {
            Ok(process) => process,
            Err(err) => {
                error!(error = %err, "job launch failed");
                guard.finish();
                return Ok(RunResult::launch_failed(err, self.history_cap));
            }
        };

        guard.transition(RunState::Running);
        let result = self.supervise(process, Arc::new(sink)).await;
        guard.finish();
        Ok(result)
    }

    async fn supervise<S: OutputSink>(
        &self,
        process: LaunchedProcess,
        sink: Arc<S>,
    ) -> RunResult {
        let LaunchedProcess {
            mut child,
            stdout,
            stderr,
        } = process;

        let (detach, detached) = watch::channel(false);
        let stdout_pump = tokio::spawn(pump_until(
            stdout,
            StreamKind::Stdout,
            Arc::clone(&sink),
            self.history_cap,
            detach_signal(detached.clone()),
        ));
        let stderr_pump = tokio::spawn(pump_until(
            stderr,
            StreamKind::Stderr,
            sink,
            self.history_cap,
            detach_signal(detached),
        ));

        let exit_code = match child.wait().await {
            Ok(status) => exit_code_of(status),
            Err(e) => {
                warn!(error = %e, "failed to wait for job process");
                -1
            }
        };

        // The exit code is only final once both pipes are drained.
        let deadline = Instant::now() + self.drain_grace;
        let stdout = self
            .join_pump(stdout_pump, StreamKind::Stdout, deadline, &detach)
            .await;
        let stderr = self
            .join_pump(stderr_pump, StreamKind::Stderr, deadline, &detach)
            .await;

        info!(
            exit_code,
            success = exit_code == 0,
            stdout_lines = stdout.total_lines(),
            stderr_lines = stderr.total_lines(),
            "job process exited"
        );

        RunResult {
            outcome: RunOutcome::Exited(exit_code),
            completed_at: Local::now(),
            stdout,
            stderr,
        }
    }

    async fn join_pump(
        &self,
        mut handle: JoinHandle<OutputHistory>,
        stream: StreamKind,
        deadline: Instant,
        detach: &watch::Sender<bool>,
    ) -> OutputHistory {
        let joined = match tokio::time::timeout_at(deadline, &mut handle).await {
            Ok(joined) => joined,
            Err(_elapsed) => {
                warn!(
                    %stream,
                    grace_ms = self.drain_grace.as_millis() as u64,
                    "output still open after job exit; a background process may hold the pipe"
                );
                detach.send_replace(true);
                handle.await
            }
        };

        match joined {
            Ok(history) => history,
            Err(e) => {
                error!(%stream, error = %e, "output pump task failed");
                OutputHistory::new(self.history_cap)
            }
        }
    }

    /// Claim the supervisor for a new run, moving `Idle`/`Finished` to
    /// `Launching`.
    fn begin(&self) -> Result<RunGuard<'_>> {
        let mut claimed = false;
        self.state.send_if_modified(|state| {
            if state.is_active() {
                return false;
            }
            *state = RunState::Launching;
            claimed = true;
            true
        });

        if claimed {
            Ok(RunGuard {
                state: &self.state,
                done: false,
            })
        } else {
            Err(LaunchdeckError::SupervisorBusy)
        }
    }
}

async fn detach_signal(mut detached: watch::Receiver<bool>) {
    // A dropped sender also ends the wait.
    let _ = detached.wait_for(|detach| *detach).await;
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps the run state honest on every exit path.
///
/// If the `execute` future is dropped mid-run, the state is reset to `Idle`
/// so the supervisor can be reused; the child itself is killed and reaped
/// through `kill_on_drop`.
struct RunGuard<'a> {
    state: &'a watch::Sender<RunState>,
    done: bool,
}

impl RunGuard<'_> {
    fn transition(&self, next: RunState) {
        self.state.send_replace(next);
    }

    fn finish(mut self) {
        self.state.send_replace(RunState::Finished);
        self.done = true;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.done {
            warn!("job run abandoned before completion; resetting supervisor");
            self.state.send_replace(RunState::Idle);
        }
    }
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|sig| EXIT_CODE_SIGNAL_BASE + sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
