use crate::artifacts::pipeline::stage::CommandSpec;
use derive_new::new;
use std::fmt;

/// Which of the two comparands a pipeline feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::First => write!(f, "first"),
            Side::Second => write!(f, "second"),
        }
    }
}

/// One comparand: its pipeline and whether its input is the empty placeholder
///
/// A placeholder side stands in for a path that does not exist at the requested
/// revision. Failures of its stages are expected and not reported.
#[derive(Debug, Clone, new)]
pub struct PipelineSide {
    pub side: Side,
    pub spec: CommandSpec,
    #[new(default)]
    pub placeholder: bool,
}

impl PipelineSide {
    pub fn placeholder(side: Side, spec: CommandSpec) -> Self {
        Self {
            side,
            spec,
            placeholder: true,
        }
    }

    pub fn with_placeholder(mut self, placeholder: bool) -> Self {
        self.placeholder = placeholder;
        self
    }
}
