#![allow(dead_code)]

pub mod command;
pub mod dvc;

use std::path::Path;

/// Entries left behind in a directory used as the channel temp root
pub fn leftover_entries(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("Failed to read temp root")
        .map(|entry| {
            entry
                .expect("Failed to read temp root entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}
