use std::fmt;

const RANGE_SEPARATOR: &str = "..";

/// Which two versions to compare
///
/// `A..B` compares commit `A` with commit `B`; a lone `A` compares commit `A`
/// with the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refspec {
    before: String,
    after: Option<String>,
}

impl Refspec {
    pub fn try_parse(spec: &str) -> anyhow::Result<Self> {
        let (before, after) = match spec.split_once(RANGE_SEPARATOR) {
            Some((before, after)) => (before, Some(after)),
            None => (spec, None),
        };

        if before.is_empty() {
            anyhow::bail!("invalid refspec {spec:?}: missing first revision");
        }
        if after.is_some_and(str::is_empty) {
            anyhow::bail!("invalid refspec {spec:?}: missing second revision");
        }

        Ok(Self {
            before: before.to_string(),
            after: after.map(str::to_string),
        })
    }

    pub fn before(&self) -> &str {
        &self.before
    }

    /// `None` means the working tree
    pub fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }
}

impl Default for Refspec {
    fn default() -> Self {
        Self {
            before: "HEAD".to_string(),
            after: None,
        }
    }
}

impl fmt::Display for Refspec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.after {
            Some(after) => write!(f, "{}{RANGE_SEPARATOR}{after}", self.before),
            None => write!(f, "{}", self.before),
        }
    }
}
