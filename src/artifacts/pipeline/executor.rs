//! Pipeline executor
//!
//! Spawns the stages of one side, wiring each stage's stdout into the next
//! stage's stdin. Every intermediate pipe end is moved into the process that
//! consumes it, so once a stage is spawned the executor holds no copy that could
//! keep a reader waiting for EOF.

use crate::artifacts::pipeline::channels::open_writer;
use crate::artifacts::pipeline::error::PipelineError;
use crate::artifacts::pipeline::side::Side;
use crate::artifacts::pipeline::stage::{CommandSpec, Stage};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::{Child, ChildStdout, Command};

const DEFAULT_SHELL: &str = "/bin/sh";

/// A spawned pipeline stage, waited on by whoever owns it
#[derive(Debug)]
pub struct SpawnedStage {
    pub side: Side,
    pub index: usize,
    pub child: Child,
}

/// Stages spawned for one side, plus the error that stopped spawning, if any
#[derive(Debug)]
pub struct SpawnedPipeline {
    pub side: Side,
    pub stages: Vec<SpawnedStage>,
    pub error: Option<PipelineError>,
}

#[derive(Debug, Clone)]
pub struct PipelineExecutor {
    shell: PathBuf,
}

impl Default for PipelineExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl PipelineExecutor {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    fn command(&self, stage: &Stage) -> Command {
        match stage {
            Stage::Shell(line) => {
                let mut command = Command::new(&self.shell);
                command.arg("-c").arg(line);
                command
            }
            Stage::Argv(args) => {
                let mut command = Command::new(&args[0]);
                command.args(&args[1..]);
                command
            }
        }
    }

    /// Spawn every stage of `spec`, the last one writing into `sink`
    ///
    /// `sink` is opened right before the last stage is spawned; for a named
    /// channel that open waits for the reader, which the caller must already have
    /// started. If a stage cannot be spawned, spawning stops there and `sink` is
    /// still opened and closed once so its reader sees EOF.
    pub async fn run(&self, side: Side, spec: &CommandSpec, sink: &Path) -> SpawnedPipeline {
        tracing::debug!(%side, "Running: {spec}");

        let mut stages = Vec::with_capacity(spec.len());
        let mut upstream: Option<ChildStdout> = None;
        let mut sink_opened = false;
        let mut error = None;
        let last = spec.len().saturating_sub(1);

        for (index, stage) in spec.stages().iter().enumerate() {
            let stdin = match upstream.take() {
                Some(stdout) => match TryInto::<Stdio>::try_into(stdout) {
                    Ok(stdin) => stdin,
                    Err(source) => {
                        error = Some(PipelineError::io(
                            format!("connecting stage {index} of the {side} pipeline"),
                            source,
                        ));
                        break;
                    }
                },
                None => Stdio::null(),
            };

            let stdout = if index == last {
                match open_sink(sink).await {
                    Ok(file) => {
                        sink_opened = true;
                        Stdio::from(file)
                    }
                    Err(source) => {
                        sink_opened = true;
                        error = Some(PipelineError::io(
                            format!("opening {} for the {side} pipeline", sink.display()),
                            source,
                        ));
                        break;
                    }
                }
            } else {
                Stdio::piped()
            };

            let mut command = self.command(stage);
            command.stdin(stdin).stdout(stdout).kill_on_drop(true);

            let spawned = command.spawn();
            // our copies of this stage's stdin and stdout go away with the command
            drop(command);

            match spawned {
                Ok(mut child) => {
                    upstream = child.stdout.take();
                    stages.push(SpawnedStage { side, index, child });
                }
                Err(source) => {
                    tracing::debug!(%side, index, "failed to spawn `{stage}`: {source}");
                    error = Some(PipelineError::Spawn {
                        side,
                        stage: index,
                        command: stage.to_string(),
                        source,
                    });
                    break;
                }
            }
        }

        drop(upstream);

        if !sink_opened {
            if let Err(e) = open_sink(sink).await {
                tracing::warn!(%side, "could not close {}: {e}", sink.display());
            }
        }

        SpawnedPipeline {
            side,
            stages,
            error,
        }
    }
}

async fn open_sink(sink: &Path) -> io::Result<File> {
    let sink = sink.to_path_buf();
    tokio::task::spawn_blocking(move || open_writer(&sink))
        .await
        .map_err(io::Error::other)?
}
