// src/errors.rs

//! Crate-wide error types.
//!
//! - [`LaunchdeckError`] is returned as `Err` from fallible operations
//!   (config loading, request construction, supervisor misuse).
//! - [`LaunchError`] describes why a child process could not be started. It
//!   is never returned as `Err` from the supervisor; it is carried inside
//!   [`RunResult`](crate::exec::RunResult) so every run ends with a result.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchdeckError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid run request: {0}")]
    InvalidRequest(String),

    #[error("a run is already in progress on this supervisor")]
    SupervisorBusy,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a child process could not be started.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("working directory {path:?} does not exist or is not a directory")]
    InvalidWorkingDirectory { path: PathBuf },

    #[error("failed to spawn command interpreter: {source}")]
    SpawnFailed {
        #[source]
        source: std::io::Error,
    },
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LaunchdeckError>;
