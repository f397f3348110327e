use crate::artifacts::pipeline::{
    CommandSpec, DiffOptions, DiffOutcome, DiffTool, EMPTY_INPUT, ExecMode, Orchestrator,
    PipelineExecutor, PipelineSide, Side,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How each side is piped before comparison, shared by `diff` and `diff-x`
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub commands: Vec<String>,
    pub exec_mode: ExecMode,
    pub shell: Option<PathBuf>,
    pub diff: DiffOptions,
    pub timeout: Option<Duration>,
}

impl PipelineOptions {
    fn executor(&self) -> PipelineExecutor {
        match &self.shell {
            Some(shell) => PipelineExecutor::new(shell),
            None => PipelineExecutor::default(),
        }
    }

    fn side(&self, side: Side, input: Option<&Path>) -> anyhow::Result<PipelineSide> {
        let path = input.unwrap_or(Path::new(EMPTY_INPUT));
        let spec = CommandSpec::from_commands(&self.commands, path, self.exec_mode)?;

        Ok(PipelineSide::new(side, spec).with_placeholder(input.is_none()))
    }
}

/// Compare two inputs, each optionally piped through `options.commands`
///
/// A missing input (`None`) compares as empty.
pub async fn compare_inputs(
    options: &PipelineOptions,
    before: Option<&Path>,
    after: Option<&Path>,
) -> anyhow::Result<DiffOutcome> {
    let tool = DiffTool::new(options.diff.clone());
    let cancel = cancellation(options.timeout);

    if options.commands.is_empty() {
        let first = before.unwrap_or(Path::new(EMPTY_INPUT));
        let second = after.unwrap_or(Path::new(EMPTY_INPUT));
        return Ok(tool.compare_files(first, second, cancel).await?);
    }

    let first = options.side(Side::First, before)?;
    let second = options.side(Side::Second, after)?;
    let orchestrator = Orchestrator::new(options.executor(), tool);

    let outcome = orchestrator.compare_until(&first, &second, cancel).await?;
    for failure in &outcome.pipeline_failures {
        tracing::warn!(
            side = %failure.side,
            stage = failure.stage,
            exit_code = failure.exit_code,
            "pipeline stage failed"
        );
    }

    Ok(outcome)
}

/// Completes on Ctrl-C or once `timeout` elapses
async fn cancellation(timeout: Option<Duration>) {
    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    match timeout {
        Some(timeout) => {
            tokio::select! {
                _ = interrupted => {}
                _ = tokio::time::sleep(timeout) => {
                    tracing::warn!(?timeout, "comparison timed out");
                }
            }
        }
        None => interrupted.await,
    }
}

/// Diff two plain files; a path that does not exist compares as empty
pub async fn diff_x(
    options: &PipelineOptions,
    first: &Path,
    second: &Path,
) -> anyhow::Result<DiffOutcome> {
    let existing = |path: &Path| {
        if path.exists() {
            Some(path.to_path_buf())
        } else {
            tracing::debug!(path = %path.display(), "missing, comparing as empty");
            None
        }
    };
    let before = existing(first);
    let after = existing(second);

    compare_inputs(options, before.as_deref(), after.as_deref()).await
}
