//! Dual-pipeline orchestrator
//!
//! Runs two pipelines side by side and diffs their outputs through a pair of
//! named channels:
//!
//! ```text
//! first:  s0 | s1 | ... > chan0 ─┐
//!                                ├─> diff chan0 chan1
//! second: t0 | t1 | ... > chan1 ─┘
//! ```
//!
//! The comparison tool is spawned before either pipeline, so a pipeline's last
//! stage always finds a reader on its channel. Channel opens run on the blocking
//! pool, one per side, so the order in which the tool opens its inputs never
//! matters.

use crate::artifacts::pipeline::channels::EphemeralChannels;
use crate::artifacts::pipeline::diff_tool::DiffTool;
use crate::artifacts::pipeline::error::{PipelineError, Result};
use crate::artifacts::pipeline::executor::{PipelineExecutor, SpawnedStage};
use crate::artifacts::pipeline::outcome::{DiffOutcome, StageReport, exit_code};
use crate::artifacts::pipeline::side::{PipelineSide, Side};
use std::fs::File;
use std::future::Future;
use std::path::PathBuf;
use std::pin::pin;
use std::process::ExitStatus;
use tokio::process::Child;

#[derive(Debug, Clone)]
pub struct Orchestrator {
    executor: PipelineExecutor,
    tool: DiffTool,
    temp_root: PathBuf,
}

impl Orchestrator {
    pub fn new(executor: PipelineExecutor, tool: DiffTool) -> Self {
        Self {
            executor,
            tool,
            temp_root: std::env::temp_dir(),
        }
    }

    /// Create the channel directories under `root` instead of the system temp dir
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }

    pub async fn compare(&self, first: &PipelineSide, second: &PipelineSide) -> Result<DiffOutcome> {
        self.compare_until(first, second, std::future::pending()).await
    }

    /// Compare the outputs of two pipelines, giving up when `cancel` completes
    ///
    /// On cancellation every process still running is killed and reaped before
    /// `PipelineError::Cancelled` is returned. The channels are removed on every
    /// path out of this function.
    pub async fn compare_until(
        &self,
        first: &PipelineSide,
        second: &PipelineSide,
        cancel: impl Future<Output = ()>,
    ) -> Result<DiffOutcome> {
        if first.side != Side::First || second.side != Side::Second {
            return Err(PipelineError::InvalidSpec(format!(
                "sides given as {} and {}",
                first.side, second.side
            )));
        }

        let channels = EphemeralChannels::acquire_in(&self.temp_root, Side::BOTH.len())?;
        let mut cancel = pin!(cancel);

        let mut comparison = self
            .tool
            .spawn(channels.side(Side::First), channels.side(Side::Second))?;

        let mut cancelled = false;
        let (first_pipeline, second_pipeline) = {
            let mut spawning = pin!(async {
                tokio::join!(
                    self.executor
                        .run(Side::First, &first.spec, channels.side(Side::First)),
                    self.executor
                        .run(Side::Second, &second.spec, channels.side(Side::Second)),
                )
            });

            // If the tool is gone before both sides opened their channels, the pending
            // opens would wait forever; stand in as the reader until spawning is done.
            tokio::select! {
                pipelines = spawning.as_mut() => pipelines,
                _ = comparison.wait() => {
                    tracing::debug!("comparison tool exited before both pipelines started");
                    let _readers = release_writers(&channels);
                    spawning.await
                }
                _ = &mut cancel => {
                    cancelled = true;
                    let _readers = release_writers(&channels);
                    spawning.await
                }
            }
        };

        let spawn_error = first_pipeline.error.or(second_pipeline.error);
        let mut stages = first_pipeline.stages;
        stages.extend(second_pipeline.stages);

        if !cancelled {
            tokio::select! {
                finished = wait_all(&mut stages, &mut comparison) => {
                    let (reports, comparison_status) = finished?;
                    if let Some(error) = spawn_error {
                        return Err(error);
                    }

                    let outcome = DiffOutcome::classify(
                        exit_code(comparison_status),
                        &stage_reports(first, second, reports),
                    );
                    tracing::debug!(
                        exit_code = outcome.exit_code,
                        comparison_code = outcome.comparison_code,
                        failures = outcome.pipeline_failures.len(),
                        "comparison finished"
                    );

                    channels.close()?;
                    return Ok(outcome);
                }
                _ = &mut cancel => {}
            }
        }

        tracing::debug!("comparison cancelled, terminating {} processes", stages.len() + 1);
        terminate(&mut stages, &mut comparison).await;
        Err(PipelineError::Cancelled)
    }
}

fn stage_reports(
    first: &PipelineSide,
    second: &PipelineSide,
    statuses: Vec<(Side, usize, ExitStatus)>,
) -> Vec<StageReport> {
    statuses
        .into_iter()
        .map(|(side, stage, status)| {
            let placeholder = match side {
                Side::First => first.placeholder,
                Side::Second => second.placeholder,
            };
            StageReport::from_status(side, stage, status, placeholder)
        })
        .collect()
}

fn release_writers(channels: &EphemeralChannels) -> Vec<File> {
    channels.release_writers().unwrap_or_else(|e| {
        tracing::warn!("could not release channel writers: {e}");
        Vec::new()
    })
}

/// Wait for every process; each wait only blocks on its own process, so the
/// order is irrelevant
async fn wait_all(
    stages: &mut [SpawnedStage],
    comparison: &mut Child,
) -> Result<(Vec<(Side, usize, ExitStatus)>, ExitStatus)> {
    let mut statuses = Vec::with_capacity(stages.len());
    for stage in stages.iter_mut() {
        let status = stage.child.wait().await.map_err(|e| {
            PipelineError::io(
                format!("waiting for stage {} of the {} pipeline", stage.index, stage.side),
                e,
            )
        })?;
        statuses.push((stage.side, stage.index, status));
    }

    let comparison_status = comparison
        .wait()
        .await
        .map_err(|e| PipelineError::io("waiting for the comparison tool", e))?;

    Ok((statuses, comparison_status))
}

async fn terminate(stages: &mut [SpawnedStage], comparison: &mut Child) {
    for child in stages
        .iter_mut()
        .map(|stage| &mut stage.child)
        .chain(std::iter::once(comparison))
    {
        // already exited processes refuse the kill; their wait below returns at once
        let _ = child.start_kill();
        if let Err(e) = child.wait().await {
            tracing::warn!("could not reap process {:?}: {e}", child.id());
        }
    }
}
