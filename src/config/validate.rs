// src/config/validate.rs

use crate::config::model::{DEFAULT_PROMPT_TEXT, JobProfile, PromptSource, RawJobProfile};
use crate::errors::{LaunchdeckError, Result};

pub const MAX_BASE_SEED: u32 = 999_999;
pub const MIN_FRAME_NUM: u32 = 1;
pub const MAX_FRAME_NUM: u32 = 200;

impl TryFrom<RawJobProfile> for JobProfile {
    type Error = crate::errors::LaunchdeckError;

    fn try_from(raw: RawJobProfile) -> std::result::Result<Self, Self::Error> {
        validate_job(&raw)?;
        validate_params(&raw)?;
        let prompt = resolve_prompt(&raw)?;
        Ok(JobProfile::new_unchecked(raw.job, raw.params, prompt, raw.env))
    }
}

fn config_error(msg: impl Into<String>) -> LaunchdeckError {
    LaunchdeckError::ConfigError(msg.into())
}

fn validate_job(cfg: &RawJobProfile) -> Result<()> {
    if cfg.job.interpreter.trim().is_empty() {
        return Err(config_error("[job].interpreter must not be empty"));
    }
    if cfg.job.script.trim().is_empty() {
        return Err(config_error("[job].script must not be empty"));
    }
    if cfg.job.working_dir.as_os_str().is_empty() {
        return Err(config_error("[job].working_dir must not be empty"));
    }
    if cfg.job.history_lines == 0 {
        return Err(config_error("[job].history_lines must be >= 1 (got 0)"));
    }
    Ok(())
}

fn validate_params(cfg: &RawJobProfile) -> Result<()> {
    let params = &cfg.params;

    if params.base_seed > MAX_BASE_SEED {
        return Err(config_error(format!(
            "[params].base_seed must be in 0..={MAX_BASE_SEED} (got {})",
            params.base_seed
        )));
    }

    if !(MIN_FRAME_NUM..=MAX_FRAME_NUM).contains(&params.frame_num) {
        return Err(config_error(format!(
            "[params].frame_num must be in {MIN_FRAME_NUM}..={MAX_FRAME_NUM} (got {})",
            params.frame_num
        )));
    }

    for (field, value) in [("ckpt_dir", &params.ckpt_dir), ("image", &params.image)] {
        if value.trim().is_empty() {
            return Err(config_error(format!("[params].{field} must not be empty")));
        }
    }

    Ok(())
}

fn resolve_prompt(cfg: &RawJobProfile) -> Result<PromptSource> {
    let prompt = &cfg.prompt;
    let file = prompt.file.as_ref().filter(|f| !f.as_os_str().is_empty());
    let text = match prompt.text.as_deref() {
        None if file.is_none() => Some(DEFAULT_PROMPT_TEXT),
        text => text.filter(|t| !t.trim().is_empty()),
    };

    match (text, file) {
        (Some(_), Some(_)) => Err(config_error(
            "[prompt] may set either `text` or `file`, not both",
        )),
        (Some(text), None) => {
            if prompt.staging_path.as_os_str().is_empty() {
                return Err(config_error(
                    "[prompt].staging_path must not be empty when `text` is set",
                ));
            }
            Ok(PromptSource::Inline {
                text: text.to_string(),
                staging_path: prompt.staging_path.clone(),
            })
        }
        (None, Some(file)) => Ok(PromptSource::File(file.clone())),
        (None, None) => Ok(PromptSource::None),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let profile = JobProfile::try_from(RawJobProfile::default()).unwrap();
        assert!(matches!(profile.prompt, PromptSource::Inline { .. }));
        assert_eq!(profile.params.frame_num, 49);
    }

    #[test]
    fn seed_out_of_range_is_rejected() {
        let mut raw = RawJobProfile::default();
        raw.params.base_seed = 1_000_000;
        let err = JobProfile::try_from(raw).unwrap_err();
        assert!(matches!(err, LaunchdeckError::ConfigError(msg) if msg.contains("base_seed")));
    }

    #[test]
    fn frame_num_bounds() {
        for bad in [0, 201] {
            let mut raw = RawJobProfile::default();
            raw.params.frame_num = bad;
            assert!(JobProfile::try_from(raw).is_err(), "frame_num {bad} accepted");
        }
        for good in [1, 200] {
            let mut raw = RawJobProfile::default();
            raw.params.frame_num = good;
            assert!(JobProfile::try_from(raw).is_ok(), "frame_num {good} rejected");
        }
    }

    #[test]
    fn text_and_file_prompt_conflict() {
        let mut raw = RawJobProfile::default();
        raw.prompt.text = Some("a cat".to_string());
        raw.prompt.file = Some(PathBuf::from("data/inference.txt"));
        assert!(JobProfile::try_from(raw).is_err());
    }

    #[test]
    fn blank_prompt_means_no_prompt() {
        let mut raw = RawJobProfile::default();
        raw.prompt.text = Some("   ".to_string());
        let profile = JobProfile::try_from(raw).unwrap();
        assert_eq!(profile.prompt, PromptSource::None);
    }

    #[test]
    fn file_alone_does_not_pick_up_default_text() {
        let mut raw = RawJobProfile::default();
        raw.prompt.file = Some(PathBuf::from("data/inference.txt"));
        let profile = JobProfile::try_from(raw).unwrap();
        assert_eq!(profile.prompt, PromptSource::File(PathBuf::from("data/inference.txt")));
    }

    #[test]
    fn staging_path_alone_keeps_default_text() {
        let raw: RawJobProfile =
            toml::from_str("[prompt]\nstaging_path = \"/tmp/elsewhere.txt\"\n").unwrap();
        let profile = JobProfile::try_from(raw).unwrap();
        assert_eq!(
            profile.prompt,
            PromptSource::Inline {
                text: DEFAULT_PROMPT_TEXT.to_string(),
                staging_path: PathBuf::from("/tmp/elsewhere.txt"),
            }
        );
    }

    #[test]
    fn zero_history_lines_is_rejected() {
        let mut raw = RawJobProfile::default();
        raw.job.history_lines = 0;
        assert!(JobProfile::try_from(raw).is_err());
    }
}
