// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::model::{JobProfile, RawJobProfile};
use crate::errors::Result;

/// Default profile location, relative to the current working directory.
pub const DEFAULT_CONFIG_FILE: &str = "Launchdeck.toml";

/// Load a job profile from a given path and return the raw `RawJobProfile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawJobProfile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let profile: RawJobProfile = toml::from_str(&contents)?;

    Ok(profile)
}

/// Load a job profile from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<JobProfile> {
    let raw = load_from_path(&path)?;
    JobProfile::try_from(raw)
}

/// Load the raw profile the CLI should start from.
///
/// - An explicitly requested path must exist.
/// - The implicit default path may be missing, in which case the built-in
///   defaults are used.
pub fn load_or_default(path: impl AsRef<Path>, explicit: bool) -> Result<RawJobProfile> {
    let path = path.as_ref();
    if !explicit && !path.exists() {
        info!(
            path = %path.display(),
            "no job profile found; using built-in defaults"
        );
        return Ok(RawJobProfile::default());
    }
    load_from_path(path)
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
