//! Porcelain commands
//!
//! - `diff`: diff a DVC-tracked path across git history
//! - `diff-x`: diff two plain files through the same pipeline engine

pub mod diff;
pub mod diff_x;
