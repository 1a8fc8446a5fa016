// src/command/builder.rs

use std::path::Path;

use crate::config::{JobProfile, PromptSource};

/// Assemble the job's shell line from a profile.
///
/// Parts are joined with single spaces, in this order:
///
/// ```text
/// <interpreter> <script> --task T --size S --ckpt_dir C --image I
///     --base_seed N --frame_num F [--prompt P] [extra_args]
/// ```
///
/// Values are inserted as written; the result is meant to be shown to the
/// operator and run through `sh -c`, so shell syntax in `extra_args` is
/// honoured.
pub fn build_command(profile: &JobProfile) -> String {
    let job = &profile.job;
    let params = &profile.params;

    let mut parts = vec![
        job.interpreter.trim().to_string(),
        job.script.trim().to_string(),
        format!("--task {}", params.task),
        format!("--size {}", params.size),
        format!("--ckpt_dir {}", params.ckpt_dir.trim()),
        format!("--image {}", params.image.trim()),
        format!("--base_seed {}", params.base_seed),
        format!("--frame_num {}", params.frame_num),
    ];

    if let Some(prompt) = prompt_arg(&profile.prompt) {
        parts.push(format!("--prompt {}", prompt.display()));
    }

    let extra = params.extra_args.trim();
    if !extra.is_empty() {
        parts.push(extra.to_string());
    }

    parts.join(" ")
}

fn prompt_arg(prompt: &PromptSource) -> Option<&Path> {
    match prompt {
        PromptSource::Inline { staging_path, .. } => Some(staging_path),
        PromptSource::File(path) => Some(path),
        PromptSource::None => None,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::RawJobProfile;

    fn profile(raw: RawJobProfile) -> JobProfile {
        JobProfile::try_from(raw).unwrap()
    }

    #[test]
    fn default_profile_matches_form_defaults() {
        let cmd = build_command(&profile(RawJobProfile::default()));
        assert_eq!(
            cmd,
            "python generate-pi-i2v.py --task i2v-14B --size 960*544 \
             --ckpt_dir Wan2.1-I2V-14B-480P --image output_videos \
             --base_seed 4096 --frame_num 49 --prompt /tmp/temp_prompt.txt"
        );
    }

    #[test]
    fn file_prompt_and_extra_args() {
        let mut raw = RawJobProfile::default();
        raw.prompt.text = None;
        raw.prompt.file = Some(PathBuf::from("data/inference.txt"));
        raw.params.extra_args = "  --cfg_scale 7.5 --steps 50 ".to_string();

        let cmd = build_command(&profile(raw));
        assert!(cmd.ends_with("--prompt data/inference.txt --cfg_scale 7.5 --steps 50"));
    }

    #[test]
    fn no_prompt_omits_flag() {
        let mut raw = RawJobProfile::default();
        raw.prompt.text = Some(String::new());
        let cmd = build_command(&profile(raw));
        assert!(!cmd.contains("--prompt"));
        assert!(cmd.ends_with("--frame_num 49"));
    }
}
