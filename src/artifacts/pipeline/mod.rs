//! Dual-pipeline comparison engine
//!
//! - `stage`: stages and command specs (shell lines or argument vectors)
//! - `side`: the two comparands
//! - `channels`: temporary named FIFOs connecting pipelines to the diff tool
//! - `executor`: spawns one side's pipeline
//! - `diff_tool`: the external `diff`-compatible program and its flags
//! - `orchestrator`: runs both sides plus the diff tool and reaps everything
//! - `outcome`: folds exit statuses into one `DiffOutcome`
//! - `error`: engine failures

pub mod channels;
pub mod diff_tool;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod outcome;
pub mod side;
pub mod stage;

pub use diff_tool::{DiffOptions, DiffTool};
pub use error::PipelineError;
pub use executor::PipelineExecutor;
pub use orchestrator::Orchestrator;
pub use outcome::{DiffOutcome, StageFailure};
pub use side::{PipelineSide, Side};
pub use stage::{CommandSpec, EMPTY_INPUT, ExecMode, Stage};
