//! Diff DVC-tracked files across git history
//!
//! A DVC-tracked file is described by a small `.dvc` manifest committed to git,
//! which points into a content-addressed cache. This crate resolves such a file
//! at two points in history (or one commit versus the working tree) and diffs the
//! two versions, optionally piping each side through a chain of shell commands
//! first.
//!
//! ## Layout
//!
//! - `areas`: repository-level collaborators (git history, DVC cache, config, resolver)
//! - `artifacts`: data types and engines (manifests, refspecs, the pipeline engine)
//! - `commands`: user-facing operations (`diff`, `diff-x`, `cache-path`)

pub mod areas;
pub mod artifacts;
pub mod commands;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the binary
///
/// Logs go to stderr so they never interleave with the diff itself. `RUST_LOG`
/// takes precedence over the `verbose` default.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "dvc_utils=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
