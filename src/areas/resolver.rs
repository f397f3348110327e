//! Resolve DVC-tracked paths to cache blobs at a git revision
//!
//! A file is either tracked by its own `.dvc` manifest, or it lives inside a
//! tracked directory, in which case the nearest ancestor's manifest points at a
//! directory listing that names the file's hash.

use crate::areas::cache::Cache;
use crate::areas::config::Config;
use crate::areas::history::History;
use crate::artifacts::manifest::content_hash::ContentHash;
use crate::artifacts::manifest::dvc_file::DvcFile;
use crate::artifacts::manifest::tracked_path::{TrackedPath, manifest_path, to_slash};
use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};

#[derive(Debug, new)]
pub struct Resolver<'r> {
    config: &'r Config,
    history: &'r History,
    cache: &'r Cache,
}

impl Resolver<'_> {
    /// Content hash of root-relative `tracked` as of `revision`, if it was tracked there
    pub async fn md5_at(
        &self,
        revision: &str,
        tracked: &TrackedPath,
    ) -> anyhow::Result<Option<ContentHash>> {
        self.history.verify(revision).await?;

        if let Some(hash) = self.manifest_hash(revision, tracked.manifest()).await? {
            return Ok(Some(hash));
        }

        let data = tracked.data();
        let Some(name) = data.file_name() else {
            return Ok(None);
        };
        let mut relpath = PathBuf::from(name);
        let mut dir = data.parent();

        while let Some(ancestor) = dir.filter(|dir| !dir.as_os_str().is_empty()) {
            if let Some(hash) = self.manifest_hash(revision, &manifest_path(ancestor)).await? {
                let listing = self.cache.load_listing(&hash)?;
                let relpath = to_slash(&relpath);
                let found = listing
                    .find(&relpath)
                    .with_context(|| format!("in DVC-tracked directory {}", ancestor.display()))?;

                tracing::debug!(%revision, dir = %ancestor.display(), %relpath, md5 = %found, "found in tracked directory");
                return Ok(Some(found.clone()));
            }

            if let Some(name) = ancestor.file_name() {
                relpath = Path::new(name).join(relpath);
            }
            dir = ancestor.parent();
        }

        Ok(None)
    }

    /// Cache blob of `tracked` (relative to the current directory) at `revision`
    pub async fn resolve(&self, revision: &str, tracked: &TrackedPath) -> anyhow::Result<Option<PathBuf>> {
        let tracked = tracked.rebase(|path| self.config.repo_path(path));
        let path = self
            .md5_at(revision, &tracked)
            .await?
            .map(|hash| self.cache.blob_path(&hash));

        tracing::debug!(%revision, data = %tracked.data().display(), resolved = ?path, "resolved");

        Ok(path)
    }

    /// Cache blob a reference points at
    ///
    /// With `path`, `reference` is a revision. Without it, `reference` is either
    /// `<revision>:<path>` or a bare content hash.
    pub async fn cache_path(&self, reference: &str, path: Option<&TrackedPath>) -> anyhow::Result<Option<PathBuf>> {
        if let Some(tracked) = path {
            return self.resolve(reference, tracked).await;
        }

        match reference.split_once(':') {
            Some((revision, path)) => self.resolve(revision, &TrackedPath::parse(path)).await,
            None => {
                let hash = ContentHash::try_parse(reference)?;
                Ok(Some(self.cache.blob_path(&hash)))
            }
        }
    }

    async fn manifest_hash(&self, revision: &str, manifest: &Path) -> anyhow::Result<Option<ContentHash>> {
        let Some(content) = self.history.show(revision, manifest).await? else {
            return Ok(None);
        };

        let manifest_file = DvcFile::parse(&content)
            .with_context(|| format!("malformed manifest {revision}:{}", manifest.display()))?;
        let hash = manifest_file
            .content_hash()
            .with_context(|| format!("in manifest {revision}:{}", manifest.display()))?;

        Ok(Some(hash.clone()))
    }
}
