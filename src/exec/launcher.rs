// src/exec/launcher.rs

//! Spawning the job's shell process.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::{debug, info};

use crate::env::ResolvedEnvironment;
use crate::errors::{LaunchError, LaunchdeckError, Result};

/// Everything needed to start one run. Built fresh for every launch.
#[derive(Debug, Clone)]
pub struct RunRequest {
    command: String,
    working_dir: PathBuf,
    environment: ResolvedEnvironment,
}

impl RunRequest {
    /// Fails with [`LaunchdeckError::InvalidRequest`] if `command` is blank.
    ///
    /// The working directory is only checked when the run is launched.
    pub fn new(
        command: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        environment: ResolvedEnvironment,
    ) -> Result<Self> {
        let command = command.into();
        if command.trim().is_empty() {
            return Err(LaunchdeckError::InvalidRequest(
                "command must not be empty".to_string(),
            ));
        }
        Ok(Self {
            command,
            working_dir: working_dir.into(),
            environment,
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn environment(&self) -> &ResolvedEnvironment {
        &self.environment
    }
}

/// A freshly spawned child with its two output pipes taken out.
///
/// The child is spawned with `kill_on_drop(true)`: dropping this value
/// without waiting kills the process and leaves reaping to tokio.
#[derive(Debug)]
pub struct LaunchedProcess {
    pub child: Child,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Start `request.command` through the host shell.
///
/// stdin is not connected; stdout and stderr are separate pipes. The child
/// sees exactly the resolved environment, nothing inherited on top of it.
pub fn launch(request: &RunRequest) -> std::result::Result<LaunchedProcess, LaunchError> {
    let working_dir = request.working_dir();
    if !working_dir.is_dir() {
        return Err(LaunchError::InvalidWorkingDirectory {
            path: working_dir.to_path_buf(),
        });
    }

    let mut cmd = shell_command(request.command());
    cmd.current_dir(working_dir)
        .env_clear()
        .envs(request.environment())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(
        vars = request.environment().len(),
        "applying resolved environment to child"
    );

    let mut child = cmd
        .spawn()
        .map_err(|source| LaunchError::SpawnFailed { source })?;

    let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(out), Some(err)) => (out, err),
        _ => {
            // Both pipes were requested above; this only happens if tokio
            // failed to set them up. The child is killed when dropped.
            return Err(LaunchError::SpawnFailed {
                source: std::io::Error::other("child output pipes were not captured"),
            });
        }
    };

    info!(
        pid = child.id(),
        cmd = %request.command(),
        working_dir = %working_dir.display(),
        "job process started"
    );

    Ok(LaunchedProcess {
        child,
        stdout,
        stderr,
    })
}

/// Build a shell command appropriate for the platform.
fn shell_command(line: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(line);
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_command_is_rejected() {
        let err = RunRequest::new("   ", ".", ResolvedEnvironment::default()).unwrap_err();
        assert!(matches!(err, LaunchdeckError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn missing_working_dir_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let request =
            RunRequest::new("echo hi", &missing, ResolvedEnvironment::default()).unwrap();

        match launch(&request) {
            Err(LaunchError::InvalidWorkingDirectory { path }) => assert_eq!(path, missing),
            other => panic!("expected InvalidWorkingDirectory, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn file_as_working_dir_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let request =
            RunRequest::new("echo hi", file.path(), ResolvedEnvironment::default()).unwrap();

        assert!(matches!(
            launch(&request),
            Err(LaunchError::InvalidWorkingDirectory { .. })
        ));
    }
}
