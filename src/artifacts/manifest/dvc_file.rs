use crate::artifacts::manifest::content_hash::ContentHash;
use serde::Deserialize;

/// A `.dvc` manifest as committed to git
#[derive(Debug, Clone, Deserialize)]
pub struct DvcFile {
    pub outs: Vec<Output>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Output {
    pub md5: ContentHash,
    pub path: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub nfiles: Option<u64>,
}

impl DvcFile {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// The single tracked output
    pub fn output(&self) -> anyhow::Result<&Output> {
        match self.outs.as_slice() {
            [output] => Ok(output),
            outs => anyhow::bail!("expected exactly one output in manifest, found {}", outs.len()),
        }
    }

    pub fn content_hash(&self) -> anyhow::Result<&ContentHash> {
        Ok(&self.output()?.md5)
    }
}
