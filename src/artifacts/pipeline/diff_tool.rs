use crate::artifacts::pipeline::error::{PipelineError, Result};
use crate::artifacts::pipeline::outcome::{DiffOutcome, exit_code};
use derive_new::new;
use std::ffi::OsString;
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};

const DEFAULT_PROGRAM: &str = "diff";

/// Flags passed through to the comparison tool
#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct DiffOptions {
    pub ignore_whitespace: bool,
    pub unified: Option<u32>,
    /// `Some(true)` forces color, `Some(false)` disables it, `None` leaves the tool's default
    pub color: Option<bool>,
}

impl DiffOptions {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.ignore_whitespace {
            args.push("-w".to_string());
        }
        if let Some(lines) = self.unified {
            args.push("-U".to_string());
            args.push(lines.to_string());
        }
        match self.color {
            Some(true) => args.push("--color=always".to_string()),
            Some(false) => args.push("--color=never".to_string()),
            None => {}
        }
        args
    }
}

/// The external `diff`-compatible program
#[derive(Debug, Clone)]
pub struct DiffTool {
    program: OsString,
    options: DiffOptions,
}

impl DiffTool {
    pub fn new(options: DiffOptions) -> Self {
        Self::with_program(DEFAULT_PROGRAM, options)
    }

    pub fn with_program(program: impl Into<OsString>, options: DiffOptions) -> Self {
        Self {
            program: program.into(),
            options,
        }
    }

    fn command(&self, first: &Path, second: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(self.options.to_args())
            .arg(first)
            .arg(second)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        command
    }

    /// Start the tool on two inputs; output goes straight to our stdout
    pub fn spawn(&self, first: &Path, second: &Path) -> Result<Child> {
        let mut argv = vec![self.program.to_string_lossy().into_owned()];
        argv.extend(self.options.to_args());
        argv.push(first.to_string_lossy().into_owned());
        argv.push(second.to_string_lossy().into_owned());
        tracing::debug!("Running: {}", shell_words::join(&argv));

        self.command(first, second)
            .spawn()
            .map_err(|source| PipelineError::ToolSpawn {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })
    }

    /// Compare two files directly, without pipelines
    pub async fn compare_files(
        &self,
        first: &Path,
        second: &Path,
        cancel: impl Future<Output = ()>,
    ) -> Result<DiffOutcome> {
        let mut child = self.spawn(first, second)?;

        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|e| PipelineError::io("waiting for the comparison tool", e))?;
                Ok(DiffOutcome::from_comparison(exit_code(status)))
            }
            _ = cancel => {
                let _ = child.start_kill();
                let _ = child.wait().await;
                Err(PipelineError::Cancelled)
            }
        }
    }
}
