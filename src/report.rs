// src/report.rs

//! Terminal presentation: live output, dry-run preview and run summary.

use std::io::Write;

use crate::config::{JobProfile, PromptSource};
use crate::exec::{OutputLine, OutputSink, RunResult, StreamKind};

/// Completion time format shown in the summary.
pub const COMPLETED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes stdout lines to our stdout and stderr lines to our stderr.
///
/// Write errors (e.g. a closed pipe on our side) are ignored; the job keeps
/// running and its history is still collected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn emit(&self, line: OutputLine) {
        match line.stream() {
            StreamKind::Stdout => {
                let _ = writeln!(std::io::stdout().lock(), "{}", line.text());
            }
            StreamKind::Stderr => {
                let _ = writeln!(std::io::stderr().lock(), "{}", line.text());
            }
        }
    }
}

/// Human-readable dry-run preview.
pub fn render_dry_run(profile: &JobProfile, command: &str, override_text: &str) -> String {
    let mut out = String::new();
    out.push_str("launchdeck dry-run\n");
    out.push_str(&format!("  command: {command}\n"));
    out.push_str(&format!(
        "  working_dir: {}\n",
        profile.job.working_dir.display()
    ));

    match &profile.prompt {
        PromptSource::Inline { text, staging_path } => {
            out.push_str(&format!(
                "  prompt (staged to {}): {text}\n",
                staging_path.display()
            ));
        }
        PromptSource::File(path) => {
            out.push_str(&format!("  prompt file: {}\n", path.display()));
        }
        PromptSource::None => out.push_str("  prompt: (none)\n"),
    }

    out.push_str("  env:\n");
    for (key, value) in &profile.env.vars {
        if value.trim().is_empty() {
            out.push_str(&format!("    {key} (blank; inherited)\n"));
        } else {
            out.push_str(&format!("    {key}={}\n", value.trim()));
        }
    }

    let overrides = crate::env::parse_overrides(override_text);
    if !overrides.is_empty() {
        out.push_str("  env overrides:\n");
        for (key, value) in overrides {
            out.push_str(&format!("    {key}={value}\n"));
        }
    }

    out
}

/// One-line outcome message shown after the run.
pub fn render_summary(result: &RunResult) -> String {
    let when = result.completed_at.format(COMPLETED_AT_FORMAT);
    match (result.exit_code(), result.launch_error()) {
        (Some(0), _) => format!("job finished successfully (exit code 0) at {when}"),
        (Some(code), _) => format!("job failed with exit code {code} at {when}"),
        (None, Some(err)) => format!("job could not be started: {err} ({when})"),
        (None, None) => format!("job ended without a result at {when}"),
    }
}

/// Exit status for `launchdeck` itself: mirrors the job's exit code when it
/// fits in a process exit status, 1 otherwise.
pub fn process_exit_code(result: &RunResult) -> i32 {
    match result.exit_code() {
        Some(code) if (0..=255).contains(&code) => code,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;
    use crate::config::RawJobProfile;
    use crate::errors::LaunchError;
    use crate::exec::{OutputHistory, RunOutcome};

    fn result(outcome: RunOutcome) -> RunResult {
        RunResult {
            outcome,
            completed_at: Local::now(),
            stdout: OutputHistory::default(),
            stderr: OutputHistory::default(),
        }
    }

    #[test]
    fn exit_code_passthrough() {
        assert_eq!(process_exit_code(&result(RunOutcome::Exited(0))), 0);
        assert_eq!(process_exit_code(&result(RunOutcome::Exited(137))), 137);
        assert_eq!(process_exit_code(&result(RunOutcome::Exited(-1))), 1);
        let failed = result(RunOutcome::LaunchFailed(LaunchError::InvalidWorkingDirectory {
            path: "/nope".into(),
        }));
        assert_eq!(process_exit_code(&failed), 1);
        assert!(render_summary(&failed).contains("could not be started"));
    }

    #[test]
    fn summary_mentions_exit_code() {
        let summary = render_summary(&result(RunOutcome::Exited(2)));
        assert!(summary.contains("exit code 2"));
    }

    #[test]
    fn dry_run_lists_overrides() {
        let profile = JobProfile::try_from(RawJobProfile::default()).unwrap();
        let text = render_dry_run(&profile, "python x.py", "FOO\nBAR=baz");
        assert!(text.contains("command: python x.py"));
        assert!(text.contains("CUDA_VISIBLE_DEVICES=0"));
        assert!(text.contains("BAR=baz"));
        assert!(!text.contains("FOO"));
    }
}
