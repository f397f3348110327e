use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

pub const MANIFEST_EXTENSION: &str = ".dvc";

/// A DVC-tracked path: the data file and the `.dvc` manifest describing it
///
/// Either may be given on the command line; `foo`, `foo/` and `foo.dvc` all
/// name the same tracked path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedPath {
    data: PathBuf,
    manifest: PathBuf,
}

impl TrackedPath {
    pub fn parse(path: &str) -> Self {
        let path = path.strip_suffix('/').unwrap_or(path);

        match path.strip_suffix(MANIFEST_EXTENSION) {
            Some(data) => Self {
                data: PathBuf::from(data),
                manifest: PathBuf::from(path),
            },
            None => Self {
                data: PathBuf::from(path),
                manifest: manifest_path(Path::new(path)),
            },
        }
    }

    pub fn data(&self) -> &Path {
        &self.data
    }

    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    /// Re-anchor both paths, e.g. from the current directory to the repository root
    pub fn rebase(&self, rebase: impl Fn(&Path) -> PathBuf) -> Self {
        Self {
            data: rebase(&self.data),
            manifest: rebase(&self.manifest),
        }
    }
}

/// `<path>.dvc`
pub fn manifest_path(path: &Path) -> PathBuf {
    let mut manifest = OsString::from(path.as_os_str());
    manifest.push(MANIFEST_EXTENSION);
    PathBuf::from(manifest)
}

/// Lexically normalize a relative path, resolving `.` and `..` components
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Forward-slash rendering used for git revision paths and DVC relpaths
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
