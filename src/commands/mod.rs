//! Command implementations
//!
//! - `plumbing`: lookups meant for scripting (`cache-path`)
//! - `porcelain`: the diff commands

pub mod plumbing;
pub mod porcelain;
