use crate::areas::repository::Repository;
use crate::artifacts::manifest::tracked_path::TrackedPath;
use std::io::Write;

impl Repository {
    /// Print the cache blob a reference resolves to
    ///
    /// Returns `false` when the reference does not resolve to anything.
    pub async fn cache_path(&self, reference: &str, path: Option<&str>) -> anyhow::Result<bool> {
        let tracked = path.map(TrackedPath::parse);

        match self.resolver().cache_path(reference, tracked.as_ref()).await? {
            Some(blob) => {
                writeln!(self.writer(), "{}", blob.display())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
