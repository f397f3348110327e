use crate::artifacts::pipeline::error::{PipelineError, Result};
use std::fmt;
use std::path::Path;

/// Input used for a side whose path does not exist
pub const EMPTY_INPUT: &str = "/dev/null";

/// How user supplied command strings become stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecMode {
    /// Hand each command line to a shell (`<shell> -c <line>`)
    #[default]
    Shell,
    /// Split each command line into words and execute it directly
    Exec,
}

/// A single command in a pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Shell(String),
    Argv(Vec<String>),
}

impl Stage {
    pub fn shell(line: impl Into<String>) -> Self {
        Stage::Shell(line.into())
    }

    pub fn argv<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Stage::Argv(args.into_iter().map(Into::into).collect())
    }

    fn parse(command: &str, mode: ExecMode) -> Result<Self> {
        match mode {
            ExecMode::Shell => Ok(Stage::Shell(command.to_string())),
            ExecMode::Exec => shell_words::split(command)
                .map(Stage::Argv)
                .map_err(|e| PipelineError::InvalidSpec(format!("cannot split `{command}`: {e}"))),
        }
    }

    fn with_input(self, input: &Path) -> Self {
        let input = input.to_string_lossy();
        match self {
            Stage::Shell(line) => Stage::Shell(format!("{} {}", line, shell_words::quote(&input))),
            Stage::Argv(mut args) => {
                args.push(input.into_owned());
                Stage::Argv(args)
            }
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Shell(line) => write!(f, "{line}"),
            Stage::Argv(args) => write!(f, "{}", shell_words::join(args)),
        }
    }
}

/// Non-empty, immutable sequence of stages run as one pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec(Vec<Stage>);

impl CommandSpec {
    pub fn try_new(stages: Vec<Stage>) -> Result<Self> {
        if stages.is_empty() {
            return Err(PipelineError::InvalidSpec(
                "a pipeline needs at least one stage".to_string(),
            ));
        }
        if let Some(index) = stages.iter().position(|stage| match stage {
            Stage::Shell(line) => line.trim().is_empty(),
            Stage::Argv(args) => args.is_empty(),
        }) {
            return Err(PipelineError::InvalidSpec(format!("stage {index} is empty")));
        }

        Ok(Self(stages))
    }

    /// Build a side's pipeline from user commands
    ///
    /// The first command receives `input` as its last argument; the remaining
    /// commands become the downstream stages.
    pub fn from_commands(commands: &[String], input: &Path, mode: ExecMode) -> Result<Self> {
        let (first, rest) = commands.split_first().ok_or_else(|| {
            PipelineError::InvalidSpec("a pipeline needs at least one command".to_string())
        })?;

        let mut stages = Vec::with_capacity(commands.len());
        stages.push(Stage::parse(first, mode)?.with_input(input));
        for command in rest {
            stages.push(Stage::parse(command, mode)?);
        }

        Self::try_new(stages)
    }

    /// Pipeline that produces no output
    pub fn empty_input() -> Self {
        Self(vec![Stage::argv(["cat", EMPTY_INPUT])])
    }

    pub fn stages(&self) -> &[Stage] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, stage) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{stage}")?;
        }
        Ok(())
    }
}
