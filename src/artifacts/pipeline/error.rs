use crate::artifacts::pipeline::side::Side;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the comparison engine itself
///
/// Non-zero exits of pipeline stages or of the comparison tool are not errors;
/// they are reported through `DiffOutcome`.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to create ephemeral channels under {path}")]
    Resource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn stage {stage} of the {side} pipeline `{command}`")]
    Spawn {
        side: Side,
        stage: usize,
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn comparison tool `{program}`")]
    ToolSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid pipeline: {0}")]
    InvalidSpec(String),

    #[error("I/O error while {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Comparison was cancelled")]
    Cancelled,
}

impl PipelineError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        PipelineError::Io {
            context: context.into(),
            source,
        }
    }

    /// Exit status a CLI should report for this error, following shell conventions
    /// for commands that could not be executed.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Spawn { source, .. } | PipelineError::ToolSpawn { source, .. } => {
                match source.kind() {
                    io::ErrorKind::NotFound => 127,
                    io::ErrorKind::PermissionDenied => 126,
                    _ => 2,
                }
            }
            PipelineError::Cancelled => 130,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
