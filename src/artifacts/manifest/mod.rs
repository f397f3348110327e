//! DVC manifests and cache addressing
//!
//! - `tracked_path`: data path / `.dvc` path pairs
//! - `content_hash`: md5 content hashes and their cache layout
//! - `dvc_file`: the YAML `.dvc` manifest
//! - `dir_listing`: JSON listings of tracked directories

pub mod content_hash;
pub mod dir_listing;
pub mod dvc_file;
pub mod tracked_path;
