//! Core utilities and shared types
//!
//! Helpers for running short-lived helper programs (`git`, `dvc`) and capturing
//! what they print.

use anyhow::Context;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;

/// Run `program` in `dir` and return its trimmed stdout
///
/// A non-zero exit is an error carrying the program's stderr.
pub async fn run_in(dir: &Path, program: &str, args: &[&str]) -> anyhow::Result<String> {
    let output = capture(dir, program, args).await?;

    if !output.status.success() {
        anyhow::bail!("{program} {} failed: {}", args.join(" "), error_text(&output));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run `program` in `dir` and return its raw stdout, or `None` if it exits non-zero
///
/// Failing to start the program at all is still an error.
pub async fn run_in_optional(
    dir: &Path,
    program: &str,
    args: &[&str],
) -> anyhow::Result<Option<Vec<u8>>> {
    let output = capture(dir, program, args).await?;

    if !output.status.success() {
        tracing::debug!(program, ?args, stderr = %error_text(&output), "command reported nothing");
        return Ok(None);
    }

    Ok(Some(output.stdout))
}

/// Prefers stderr, falls back to stdout
pub fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

async fn capture(dir: &Path, program: &str, args: &[&str]) -> anyhow::Result<Output> {
    tracing::debug!(program, ?args, dir = %dir.display(), "running");

    Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .await
        .with_context(|| format!("failed to run {program}"))
}
