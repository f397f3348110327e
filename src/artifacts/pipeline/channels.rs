//! Ephemeral named channels
//!
//! Each comparison gets its own temporary directory holding one FIFO per side.
//! The directory, and with it every FIFO, is removed when the `EphemeralChannels`
//! value is dropped, whatever the outcome of the comparison.

use crate::artifacts::pipeline::error::{PipelineError, Result};
use crate::artifacts::pipeline::side::Side;
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DIR_PREFIX: &str = "dvc-utils-";
const CHANNEL_PREFIX: &str = "named_pipe";
const CHANNEL_MODE: libc::mode_t = 0o600;

#[derive(Debug)]
pub struct EphemeralChannels {
    dir: TempDir,
    paths: Vec<PathBuf>,
}

impl EphemeralChannels {
    /// Create `count` FIFOs in a fresh directory under `root`
    ///
    /// On failure nothing is left behind: the partially populated directory is
    /// dropped, and removed, before the error is returned.
    pub fn acquire_in(root: &Path, count: usize) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(DIR_PREFIX)
            .tempdir_in(root)
            .map_err(|source| PipelineError::Resource {
                path: root.to_path_buf(),
                source,
            })?;

        let paths = (0..count)
            .map(|i| dir.path().join(format!("{CHANNEL_PREFIX}{i}")))
            .collect::<Vec<_>>();

        for path in &paths {
            make_fifo(path).map_err(|source| PipelineError::Resource {
                path: path.clone(),
                source,
            })?;
        }

        tracing::debug!(dir = %dir.path().display(), count, "created ephemeral channels");

        Ok(Self { dir, paths })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Channel feeding the given side of a two-channel comparison
    pub fn side(&self, side: Side) -> &Path {
        &self.paths()[side.index()]
    }

    /// Open a read end on every channel without blocking
    ///
    /// Writers blocked in `open_writer` return once a reader exists, so holding the
    /// returned handles lets pending writers proceed after the real reader is gone.
    pub fn release_writers(&self) -> io::Result<Vec<File>> {
        self.paths()
            .iter()
            .map(|path| {
                OpenOptions::new()
                    .read(true)
                    .custom_flags(libc::O_NONBLOCK)
                    .open(path)
            })
            .collect()
    }

    /// Remove the channels now, surfacing any cleanup error
    pub fn close(self) -> Result<()> {
        let path = self.dir().to_path_buf();
        self.dir
            .close()
            .map_err(|source| PipelineError::Resource { path, source })
    }
}

/// Open a channel for writing
///
/// Blocks until the channel has a reader; run it off the async executor.
pub fn open_writer(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).open(path)
}

fn make_fifo(path: &Path) -> io::Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
    let ret = unsafe { libc::mkfifo(c_path.as_ptr(), CHANNEL_MODE) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}
