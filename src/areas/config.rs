use crate::artifacts::core::run_in;
use crate::artifacts::manifest::tracked_path::normalize;
use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};

/// Cache directory override, relative to the git root
pub const CACHE_DIR_ENV: &str = "DVC_UTILS_CACHE_DIR";

/// Where the repository lives and where DVC keeps its cache
///
/// Resolved once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Config {
    root: PathBuf,
    prefix: PathBuf,
    cache_dir: PathBuf,
}

impl Config {
    /// Discover the enclosing git repository of `cwd` and its DVC cache
    pub async fn discover(cwd: &Path) -> anyhow::Result<Self> {
        let root = run_in(cwd, "git", &["rev-parse", "--show-toplevel"])
            .await
            .context("not inside a git repository")?;
        let root = PathBuf::from(root)
            .canonicalize()
            .context("failed to resolve the git root")?;

        let cwd = cwd.canonicalize()?;
        let prefix = cwd
            .strip_prefix(&root)
            .with_context(|| {
                format!("{} is outside the repository at {}", cwd.display(), root.display())
            })?
            .to_path_buf();

        let cache_dir = match std::env::var_os(CACHE_DIR_ENV).filter(|dir| !dir.is_empty()) {
            Some(dir) => root.join(dir),
            None => PathBuf::from(
                run_in(&root, "dvc", &["cache", "dir"])
                    .await
                    .context("failed to locate the DVC cache")?,
            ),
        };

        tracing::debug!(root = %root.display(), prefix = %prefix.display(), cache = %cache_dir.display(), "resolved config");

        Ok(Self {
            root,
            prefix,
            cache_dir,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current directory relative to the root
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Root-relative form of a path given relative to the current directory
    pub fn repo_path(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.root) {
            Ok(relative) => normalize(relative),
            Err(_) => normalize(&self.prefix.join(path)),
        }
    }

    /// Working-tree location of a root-relative path
    pub fn worktree_path(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}
