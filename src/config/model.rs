// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::exec::DEFAULT_HISTORY_LINES;
use crate::types::{FrameSize, InferenceTask};

/// Job profile as read from a TOML file, before validation.
///
/// ```toml
/// [job]
/// working_dir = "/workspace/anisoraV2_gpu"
///
/// [params]
/// task = "i2v-14B"
/// size = "960*544"
/// base_seed = 4096
///
/// [prompt]
/// text = "A beautiful sunset over the ocean with gentle waves"
///
/// [env]
/// vars = { CUDA_VISIBLE_DEVICES = "0" }
/// extra = """
/// CUSTOM_VAR=value1
/// """
/// ```
///
/// All sections are optional; missing values fall back to the same defaults
/// the interactive form starts with.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawJobProfile {
    #[serde(default)]
    pub job: JobSection,

    #[serde(default)]
    pub params: ParamsSection,

    #[serde(default)]
    pub prompt: PromptSection,

    #[serde(default)]
    pub env: EnvSection,
}

/// Validated job profile.
///
/// Only obtainable through `TryFrom<RawJobProfile>` (see `validate.rs`), so
/// holders can rely on parameter ranges and the prompt source being sound.
#[derive(Debug, Clone)]
pub struct JobProfile {
    pub job: JobSection,
    pub params: ParamsSection,
    pub prompt: PromptSource,
    pub env: EnvSection,
}

impl JobProfile {
    pub(crate) fn new_unchecked(
        job: JobSection,
        params: ParamsSection,
        prompt: PromptSource,
        env: EnvSection,
    ) -> Self {
        Self {
            job,
            params,
            prompt,
            env,
        }
    }

    /// Base variables as ordered pairs, ready for the environment resolver.
    pub fn base_vars(&self) -> Vec<(String, String)> {
        self.env
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// `[job]` section: how and where the script is started.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSection {
    /// Program that runs the script (e.g. `python`, `python3`, a venv path).
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Inference script, relative to `working_dir`.
    #[serde(default = "default_script")]
    pub script: String,

    /// Directory the command runs in. Must exist at launch time.
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Recent lines kept per output stream.
    #[serde(default = "default_history_lines")]
    pub history_lines: usize,
}

fn default_interpreter() -> String {
    "python".to_string()
}

fn default_script() -> String {
    "generate-pi-i2v.py".to_string()
}

fn default_working_dir() -> PathBuf {
    PathBuf::from("/workspace/anisoraV2_gpu")
}

fn default_history_lines() -> usize {
    DEFAULT_HISTORY_LINES
}

impl Default for JobSection {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            script: default_script(),
            working_dir: default_working_dir(),
            history_lines: default_history_lines(),
        }
    }
}

/// `[params]` section: arguments forwarded to the script.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamsSection {
    #[serde(default)]
    pub task: InferenceTask,

    #[serde(default)]
    pub size: FrameSize,

    #[serde(default = "default_ckpt_dir")]
    pub ckpt_dir: String,

    /// Input image path, or output directory for text-to-video runs.
    #[serde(default = "default_image")]
    pub image: String,

    #[serde(default = "default_base_seed")]
    pub base_seed: u32,

    #[serde(default = "default_frame_num")]
    pub frame_num: u32,

    /// Appended verbatim to the command line (e.g. `--cfg_scale 7.5`).
    #[serde(default)]
    pub extra_args: String,
}

fn default_ckpt_dir() -> String {
    "Wan2.1-I2V-14B-480P".to_string()
}

fn default_image() -> String {
    "output_videos".to_string()
}

fn default_base_seed() -> u32 {
    4096
}

fn default_frame_num() -> u32 {
    49
}

impl Default for ParamsSection {
    fn default() -> Self {
        Self {
            task: InferenceTask::default(),
            size: FrameSize::default(),
            ckpt_dir: default_ckpt_dir(),
            image: default_image(),
            base_seed: default_base_seed(),
            frame_num: default_frame_num(),
            extra_args: String::new(),
        }
    }
}

/// `[prompt]` section as written. At most one of `text` / `file`.
///
/// When neither is given the default prompt text is used, so a section
/// that only moves `staging_path` still stages a prompt. `text = ""` means
/// no prompt at all.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptSection {
    /// Inline prompt; staged to `staging_path` before launch.
    #[serde(default)]
    pub text: Option<String>,

    /// Existing prompt file passed through as-is.
    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default = "default_staging_path")]
    pub staging_path: PathBuf,
}

pub const DEFAULT_PROMPT_TEXT: &str = "A beautiful sunset over the ocean with gentle waves";

fn default_staging_path() -> PathBuf {
    PathBuf::from("/tmp/temp_prompt.txt")
}

impl Default for PromptSection {
    fn default() -> Self {
        Self {
            text: None,
            file: None,
            staging_path: default_staging_path(),
        }
    }
}

/// Where the script reads its prompt from, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    /// Text written to `staging_path` right before launch.
    Inline { text: String, staging_path: PathBuf },
    /// A prompt file that already exists (or is the script's problem).
    File(PathBuf),
    /// No `--prompt` argument.
    None,
}

/// `[env]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvSection {
    /// Base variables; blank values leave the inherited value alone.
    #[serde(default = "default_env_vars")]
    pub vars: BTreeMap<String, String>,

    /// Free-form `KEY=VALUE` lines applied on top of `vars`.
    #[serde(default)]
    pub extra: String,
}

fn default_env_vars() -> BTreeMap<String, String> {
    [
        ("CUDA_VISIBLE_DEVICES", "0"),
        ("PYTHONPATH", "/workspace"),
        ("MODEL_PATH", "/workspace/anisoraV2_gpu/Wan2.1-I2V-14B-480P"),
        ("OUTPUT_DIR", "/workspace/anisoraV2_gpu/output_videos"),
        ("TORCH_HOME", "/workspace/.cache/torch"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for EnvSection {
    fn default() -> Self {
        Self {
            vars: default_env_vars(),
            extra: String::new(),
        }
    }
}
