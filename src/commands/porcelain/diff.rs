use crate::areas::repository::Repository;
use crate::artifacts::manifest::tracked_path::TrackedPath;
use crate::artifacts::pipeline::DiffOutcome;
use crate::artifacts::revision::refspec::Refspec;
use crate::commands::porcelain::diff_x::{PipelineOptions, compare_inputs};
use std::path::PathBuf;

impl Repository {
    /// Diff a DVC-tracked path between two commits, or a commit and the working tree
    pub async fn diff(
        &self,
        options: &PipelineOptions,
        refspec: &Refspec,
        path: &TrackedPath,
    ) -> anyhow::Result<DiffOutcome> {
        let resolver = self.resolver();

        let before = resolver.resolve(refspec.before(), path).await?;
        let after = match refspec.after() {
            Some(revision) => resolver.resolve(revision, path).await?,
            None => self.worktree_side(path),
        };

        for resolved in before.iter().chain(after.iter()) {
            if !resolved.exists() {
                tracing::warn!(path = %resolved.display(), "not present in the local cache; try `dvc pull`");
            }
        }
        if before.is_none() && after.is_none() {
            tracing::warn!(%refspec, path = %path.data().display(), "not tracked on either side");
        }

        compare_inputs(options, before.as_deref(), after.as_deref()).await
    }

    fn worktree_side(&self, path: &TrackedPath) -> Option<PathBuf> {
        let data = self.config().worktree_path(&self.config().repo_path(path.data()));

        if data.exists() {
            Some(data)
        } else {
            tracing::debug!(path = %data.display(), "missing from the working tree");
            None
        }
    }
}
