// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::{FrameSize, InferenceTask};

/// Command-line arguments for `launchdeck`.
///
/// Flags override the corresponding job profile values.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "launchdeck",
    version,
    about = "Configure and launch a video generation job, streaming its output.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the job profile (TOML).
    ///
    /// Default: `Launchdeck.toml` in the current working directory. When the
    /// default file is missing, built-in defaults are used.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to run the command in.
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Generation task (i2v-14B, t2v-14B, i2v-7B).
    #[arg(long, value_name = "TASK")]
    pub task: Option<InferenceTask>,

    /// Output size, e.g. `960*544`.
    #[arg(long, value_name = "SIZE")]
    pub size: Option<FrameSize>,

    /// Random seed (0..=999999).
    #[arg(long, value_name = "N")]
    pub seed: Option<u32>,

    /// Number of frames to generate (1..=200).
    #[arg(long, value_name = "N")]
    pub frame_num: Option<u32>,

    /// Inline prompt text; replaces any prompt from the profile.
    #[arg(long, value_name = "TEXT", conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Prompt file path; replaces any prompt from the profile.
    #[arg(long, value_name = "PATH")]
    pub prompt_file: Option<PathBuf>,

    /// Extra arguments appended to the command line.
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub extra_args: Option<String>,

    /// Extra environment variable for the job (`KEY=VALUE`, repeatable).
    ///
    /// Applied after the profile's `[env]` values, so these win.
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Recent output lines kept per stream.
    #[arg(long, value_name = "N")]
    pub history_lines: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LAUNCHDECK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the command, working directory and environment overrides,
    /// but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = CliArgs::try_parse_from([
            "launchdeck",
            "--seed",
            "7",
            "--size",
            "1280x720",
            "--env",
            "A=1",
            "--env",
            "B=2",
            "--extra-args",
            "--steps 50",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(args.seed, Some(7));
        assert_eq!(args.size, Some(FrameSize::W1280H720));
        assert_eq!(args.env, vec!["A=1", "B=2"]);
        assert_eq!(args.extra_args.as_deref(), Some("--steps 50"));
        assert!(args.dry_run);
        assert!(args.config.is_none());
    }

    #[test]
    fn prompt_and_prompt_file_conflict() {
        let res = CliArgs::try_parse_from([
            "launchdeck",
            "--prompt",
            "hi",
            "--prompt-file",
            "p.txt",
        ]);
        assert!(res.is_err());
    }
}
