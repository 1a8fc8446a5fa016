// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod env;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod report;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::command::{build_command, stage_prompt_or_log};
use crate::config::{JobProfile, RawJobProfile, default_config_path, load_or_default};
use crate::env::ResolvedEnvironment;
use crate::exec::{RunRequest, Supervisor};
use crate::report::{ConsoleSink, process_exit_code, render_dry_run, render_summary};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - profile loading + CLI overrides
/// - command assembly and prompt staging
/// - environment resolution
/// - the run supervisor with a console sink
///
/// Returns the exit status `launchdeck` should terminate with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let explicit = args.config.is_some();
    let config_path = args.config.clone().unwrap_or_else(default_config_path);

    let mut raw = load_or_default(&config_path, explicit)?;
    apply_cli_overrides(&mut raw, &args);
    let profile = JobProfile::try_from(raw)?;

    let command = build_command(&profile);
    let override_text = override_text(&profile, &args.env);

    if args.dry_run {
        print!("{}", render_dry_run(&profile, &command, &override_text));
        debug!("dry-run complete (no execution)");
        return Ok(0);
    }

    stage_prompt_or_log(&profile.prompt);

    let environment = ResolvedEnvironment::from_process(&profile.base_vars(), &override_text);
    let request = RunRequest::new(command, profile.job.working_dir.clone(), environment)?;

    let supervisor = Supervisor::new().with_history_cap(profile.job.history_lines);
    let result = supervisor.execute(request, ConsoleSink).await?;

    let summary = render_summary(&result);
    if result.success() {
        info!("{summary}");
    } else {
        tracing::error!("{summary}");
    }

    Ok(process_exit_code(&result))
}

/// Fold CLI flags into the raw profile so they go through validation too.
pub fn apply_cli_overrides(raw: &mut RawJobProfile, args: &CliArgs) {
    if let Some(dir) = &args.workdir {
        raw.job.working_dir = dir.clone();
    }
    if let Some(n) = args.history_lines {
        raw.job.history_lines = n;
    }
    if let Some(task) = args.task {
        raw.params.task = task;
    }
    if let Some(size) = args.size {
        raw.params.size = size;
    }
    if let Some(seed) = args.seed {
        raw.params.base_seed = seed;
    }
    if let Some(frames) = args.frame_num {
        raw.params.frame_num = frames;
    }
    if let Some(extra) = &args.extra_args {
        raw.params.extra_args = extra.clone();
    }
    if let Some(text) = &args.prompt {
        raw.prompt.text = Some(text.clone());
        raw.prompt.file = None;
    }
    if let Some(file) = &args.prompt_file {
        raw.prompt.file = Some(file.clone());
        raw.prompt.text = None;
    }
}

/// Profile `[env].extra` followed by `--env` entries, one per line.
fn override_text(profile: &JobProfile, cli_env: &[String]) -> String {
    let mut text = profile.env.extra.clone();
    for entry in cli_env {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(entry);
    }
    text
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn cli_flags_override_profile() {
        let args = CliArgs::parse_from([
            "launchdeck",
            "--workdir",
            "/tmp",
            "--seed",
            "11",
            "--prompt-file",
            "p.txt",
        ]);
        let mut raw = RawJobProfile::default();
        apply_cli_overrides(&mut raw, &args);

        assert_eq!(raw.job.working_dir, std::path::PathBuf::from("/tmp"));
        assert_eq!(raw.params.base_seed, 11);
        assert!(raw.prompt.text.is_none());
        assert!(JobProfile::try_from(raw).is_ok());
    }

    #[test]
    fn cli_env_entries_come_last() {
        let mut raw = RawJobProfile::default();
        raw.env.extra = "A=profile".to_string();
        let profile = JobProfile::try_from(raw).unwrap();

        let text = override_text(&profile, &["A=cli".to_string()]);
        assert_eq!(text, "A=profile\nA=cli");

        let env = crate::env::resolve(Vec::new(), &[], &text);
        assert_eq!(env.get("A"), Some("cli"));
    }
}
