use crate::artifacts::manifest::content_hash::ContentHash;
use serde::Deserialize;

/// One file of a DVC-tracked directory
#[derive(Debug, Clone, Deserialize)]
pub struct DirEntry {
    pub md5: ContentHash,
    pub relpath: String,
}

/// Cached listing of a DVC-tracked directory (the blob behind a `.dir` hash)
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct DirListing {
    entries: Vec<DirEntry>,
}

impl DirListing {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    /// Hash of the file at `relpath`, which must be listed exactly once
    pub fn find(&self, relpath: &str) -> anyhow::Result<&ContentHash> {
        let mut matches = self.entries.iter().filter(|entry| entry.relpath == relpath);

        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(&entry.md5),
            (None, _) => anyhow::bail!("{relpath} is not listed in the tracked directory"),
            (Some(_), Some(_)) => anyhow::bail!("{relpath} is listed more than once in the tracked directory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"[
        {"md5": "d3b07384d113edec49eaa6238ad5ff00", "relpath": "a.txt"},
        {"md5": "c157a79031e1c40f85931829bc5fc552", "relpath": "sub/b.txt"}
    ]"#;

    #[test]
    fn find_nested_entry() {
        let listing = DirListing::parse(LISTING).unwrap();

        assert_eq!(listing.entries().len(), 2);
        assert_eq!(
            listing.find("sub/b.txt").unwrap().as_ref(),
            "c157a79031e1c40f85931829bc5fc552"
        );
    }

    #[test]
    fn missing_entry_is_an_error() {
        let listing = DirListing::parse(LISTING).unwrap();

        assert!(listing.find("b.txt").is_err());
    }

    #[test]
    fn duplicate_entries_are_an_error() {
        let listing = DirListing::parse(
            r#"[{"md5": "d3b07384d113edec49eaa6238ad5ff00", "relpath": "a"},
                {"md5": "c157a79031e1c40f85931829bc5fc552", "relpath": "a"}]"#,
        )
        .unwrap();

        assert!(listing.find("a").is_err());
    }
}
