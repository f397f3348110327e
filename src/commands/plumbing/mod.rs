//! Plumbing commands
//!
//! - `cache-path`: print where a tracked file lives in the DVC cache

pub mod cache_path;
