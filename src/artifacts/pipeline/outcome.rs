use crate::artifacts::pipeline::side::Side;
use derive_new::new;
use std::collections::BTreeSet;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

const SIGNAL_EXIT_BASE: i32 = 128;
const BROKEN_PIPE_EXIT: i32 = SIGNAL_EXIT_BASE + libc::SIGPIPE;

/// Shell-style exit code: the process's own code, or 128 + signal number
pub fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .unwrap_or_else(|| SIGNAL_EXIT_BASE + status.signal().unwrap_or(0))
}

/// A pipeline stage that exited unsuccessfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct StageFailure {
    pub side: Side,
    pub stage: usize,
    pub exit_code: i32,
}

/// How one pipeline stage terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct StageReport {
    pub side: Side,
    pub stage: usize,
    pub exit_code: i32,
    pub signal: Option<i32>,
    /// The stage belongs to a side standing in for a missing path
    pub placeholder: bool,
}

impl StageReport {
    pub fn from_status(side: Side, stage: usize, status: ExitStatus, placeholder: bool) -> Self {
        Self::new(side, stage, exit_code(status), status.signal(), placeholder)
    }

    /// Whether this termination should be reported as a failure
    ///
    /// A broken pipe only means the consumer stopped reading; the consumer's own
    /// status is what gets reported. This holds for every stage, the last one
    /// included, since the comparison tool may stop reading early too.
    fn is_failure(&self) -> bool {
        self.exit_code != 0 && !self.placeholder && !self.is_broken_pipe()
    }

    /// Killed by SIGPIPE, either directly or as seen through a shell that
    /// reports its child's death as `128 + SIGPIPE`
    fn is_broken_pipe(&self) -> bool {
        self.signal == Some(libc::SIGPIPE) || self.exit_code == BROKEN_PIPE_EXIT
    }
}

/// Result of comparing two sides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOutcome {
    pub exit_code: i32,
    pub diff_found: bool,
    /// Exit code of the comparison tool itself
    pub comparison_code: i32,
    pub pipeline_failures: BTreeSet<StageFailure>,
}

impl DiffOutcome {
    pub fn from_comparison(comparison_code: i32) -> Self {
        Self::classify(comparison_code, &[])
    }

    /// Fold the comparison tool's exit code and every stage's termination into one outcome
    ///
    /// The overall code is the first code outside {0, 1} among first-side stages,
    /// second-side stages and the comparison tool, in that order. Failing that,
    /// the first recorded stage failure wins, so a stage exiting 1 is never masked
    /// by an identical comparison. Otherwise the comparison's code stands.
    pub fn classify(comparison_code: i32, stages: &[StageReport]) -> Self {
        let pipeline_failures = stages
            .iter()
            .filter(|report| report.is_failure())
            .map(|report| StageFailure::new(report.side, report.stage, report.exit_code))
            .collect::<BTreeSet<_>>();

        let escalated = pipeline_failures
            .iter()
            .map(|failure| failure.exit_code)
            .chain(std::iter::once(comparison_code))
            .find(|code| !matches!(code, 0 | 1));

        let exit_code = escalated
            .or_else(|| pipeline_failures.first().map(|failure| failure.exit_code))
            .unwrap_or(comparison_code);

        Self {
            exit_code,
            diff_found: comparison_code == 1,
            comparison_code,
            pipeline_failures,
        }
    }
}
