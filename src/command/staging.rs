// src/command/staging.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, error};

use crate::config::PromptSource;

/// Write an inline prompt to its staging file.
///
/// Does nothing for file prompts or when there is no prompt. Parent
/// directories are created as needed.
///
/// Returns `Ok(true)` when a file was written.
pub fn stage_prompt(prompt: &PromptSource) -> Result<bool> {
    let PromptSource::Inline { text, staging_path } = prompt else {
        return Ok(false);
    };

    write_prompt(staging_path, text)?;
    debug!(path = %staging_path.display(), bytes = text.len(), "prompt staged");
    Ok(true)
}

/// Like [`stage_prompt`], but a failure is only logged.
///
/// The launch goes ahead regardless; if the script needs the file it will
/// report the problem on its own stderr.
pub fn stage_prompt_or_log(prompt: &PromptSource) {
    if let Err(err) = stage_prompt(prompt) {
        let err = format!("{err:#}");
        error!(error = %err, "failed to stage prompt file; launching anyway");
    }
}

fn write_prompt(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
    }
    fs::write(path, text).with_context(|| format!("writing prompt file {:?}", path))?;
    Ok(())
}
