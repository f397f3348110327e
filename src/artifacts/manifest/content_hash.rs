//! DVC content hash
//!
//! DVC addresses cached content by md5. Directories are stored as a JSON listing
//! whose hash carries a `.dir` suffix.
//!
//! ## Storage
//!
//! Blobs live at `<cache>/files/md5/<first-2-chars>/<remaining-chars>`

use anyhow::Context;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;

const CONTENT_HASH_REGEX: &str = r"^[0-9a-f]{32}(\.dir)?$";
const DIR_SUFFIX: &str = ".dir";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn try_parse(hash: &str) -> anyhow::Result<Self> {
        let re = regex::Regex::new(CONTENT_HASH_REGEX)
            .with_context(|| format!("invalid content hash regex: {CONTENT_HASH_REGEX}"))?;

        if re.is_match(hash) {
            Ok(Self(hash.to_string()))
        } else {
            anyhow::bail!("invalid content hash: {hash}")
        }
    }

    pub fn is_dir(&self) -> bool {
        self.0.ends_with(DIR_SUFFIX)
    }

    /// Cache-relative location, e.g. `ab/cdef0123...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ContentHash::try_parse(&raw).map_err(serde::de::Error::custom)
    }
}
