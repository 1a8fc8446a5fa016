#![allow(dead_code)]

use std::path::Path;

use launchdeck::config::{JobProfile, RawJobProfile};
use launchdeck::env::ResolvedEnvironment;
use launchdeck::exec::RunRequest;

/// Builder for `JobProfile` to simplify test setup.
pub struct JobProfileBuilder {
    profile: RawJobProfile,
}

impl JobProfileBuilder {
    pub fn new() -> Self {
        Self {
            profile: RawJobProfile::default(),
        }
    }

    pub fn interpreter(mut self, interpreter: &str) -> Self {
        self.profile.job.interpreter = interpreter.to_string();
        self
    }

    pub fn script(mut self, script: &str) -> Self {
        self.profile.job.script = script.to_string();
        self
    }

    pub fn working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.profile.job.working_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn history_lines(mut self, n: usize) -> Self {
        self.profile.job.history_lines = n;
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.profile.params.base_seed = seed;
        self
    }

    pub fn frame_num(mut self, frames: u32) -> Self {
        self.profile.params.frame_num = frames;
        self
    }

    pub fn extra_args(mut self, args: &str) -> Self {
        self.profile.params.extra_args = args.to_string();
        self
    }

    pub fn prompt_text(mut self, text: &str, staging_path: impl AsRef<Path>) -> Self {
        self.profile.prompt.text = Some(text.to_string());
        self.profile.prompt.file = None;
        self.profile.prompt.staging_path = staging_path.as_ref().to_path_buf();
        self
    }

    pub fn prompt_file(mut self, file: impl AsRef<Path>) -> Self {
        self.profile.prompt.text = None;
        self.profile.prompt.file = Some(file.as_ref().to_path_buf());
        self
    }

    pub fn no_prompt(mut self) -> Self {
        self.profile.prompt.text = Some(String::new());
        self.profile.prompt.file = None;
        self
    }

    pub fn env_var(mut self, key: &str, value: &str) -> Self {
        self.profile.env.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn clear_env_vars(mut self) -> Self {
        self.profile.env.vars.clear();
        self
    }

    pub fn env_extra(mut self, text: &str) -> Self {
        self.profile.env.extra = text.to_string();
        self
    }

    pub fn raw(self) -> RawJobProfile {
        self.profile
    }

    pub fn build(self) -> JobProfile {
        JobProfile::try_from(self.profile).expect("Failed to build valid profile from builder")
    }
}

impl Default for JobProfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shell-line request running in `dir` with the current process
/// environment plus `overrides`.
pub fn shell_request(command: &str, dir: impl AsRef<Path>, overrides: &str) -> RunRequest {
    let env = ResolvedEnvironment::from_process(&[], overrides);
    RunRequest::new(command, dir.as_ref(), env).expect("valid run request")
}
