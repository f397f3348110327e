use crate::artifacts::core::run_in_optional;
use crate::artifacts::manifest::tracked_path::to_slash;
use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};

/// Read-only view of committed file contents
#[derive(Debug, Clone, new)]
pub struct History {
    root: PathBuf,
}

impl History {
    /// Fail unless `revision` names a commit
    pub async fn verify(&self, revision: &str) -> anyhow::Result<()> {
        let commit = format!("{revision}^{{commit}}");

        match run_in_optional(&self.root, "git", &["rev-parse", "--verify", "--quiet", &commit]).await? {
            Some(_) => Ok(()),
            None => anyhow::bail!("unknown revision {revision}"),
        }
    }

    /// Contents of root-relative `path` at `revision`, or `None` if it does not exist there
    pub async fn show(&self, revision: &str, path: &Path) -> anyhow::Result<Option<String>> {
        let object = format!("{revision}:{}", to_slash(path));

        run_in_optional(&self.root, "git", &["show", &object])
            .await?
            .map(String::from_utf8)
            .transpose()
            .with_context(|| format!("{object} is not valid UTF-8"))
    }
}
