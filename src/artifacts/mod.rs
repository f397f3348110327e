//! Data types and engines
//!
//! - `core`: helper-process capture shared by the repository areas
//! - `manifest`: `.dvc` manifests, content hashes and directory listings
//! - `pipeline`: the dual-pipeline comparison engine
//! - `revision`: which two versions to compare

pub mod core;
pub mod manifest;
pub mod pipeline;
pub mod revision;
