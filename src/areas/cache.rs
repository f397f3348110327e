use crate::artifacts::manifest::content_hash::ContentHash;
use crate::artifacts::manifest::dir_listing::DirListing;
use anyhow::Context;
use derive_new::new;
use std::path::PathBuf;

/// DVC's content-addressed cache (`files/md5/<xx>/<rest>`)
#[derive(Debug, Clone, new)]
pub struct Cache {
    dir: PathBuf,
}

impl Cache {
    pub fn blob_path(&self, hash: &ContentHash) -> PathBuf {
        self.dir.join("files").join("md5").join(hash.to_path())
    }

    pub fn load_listing(&self, hash: &ContentHash) -> anyhow::Result<DirListing> {
        if !hash.is_dir() {
            anyhow::bail!("{hash} does not name a directory listing");
        }

        let path = self.blob_path(hash);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read directory listing {}", path.display()))?;

        DirListing::parse(&content)
            .with_context(|| format!("malformed directory listing {}", path.display()))
    }
}
