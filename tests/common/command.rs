use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use rstest::fixture;
use std::path::Path;

pub const CACHE_DIR: &str = ".dvc/cache";

#[fixture]
pub fn work_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Where the channels of a single invocation are created, so tests can check cleanup
#[fixture]
pub fn channel_root() -> TempDir {
    TempDir::new().expect("Failed to create channel root")
}

#[fixture]
pub fn differing_files(work_dir: TempDir) -> TempDir {
    work_dir.child("file1.txt").write_str("foo\n").unwrap();
    work_dir.child("file2.txt").write_str("bar\n").unwrap();
    work_dir
}

#[fixture]
pub fn identical_files(work_dir: TempDir) -> TempDir {
    work_dir.child("file1.txt").write_str("foo\nbar\n").unwrap();
    work_dir.child("file2.txt").write_str("foo\nbar\n").unwrap();
    work_dir
}

pub fn run_dvc_utils(dir: &Path, channel_root: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("dvc-utils").expect("Failed to find dvc-utils binary");
    cmd.env("TMPDIR", channel_root)
        .env("DVC_UTILS_CACHE_DIR", CACHE_DIR)
        .env_remove("RUST_LOG")
        .current_dir(dir)
        .timeout(std::time::Duration::from_secs(30));
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn run_git_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", "fake_user"),
        ("GIT_AUTHOR_EMAIL", "fake_email@email.com"),
        ("GIT_AUTHOR_DATE", "2023-01-01 12:00:00 +0000"),
        ("GIT_COMMITTER_NAME", "fake_user"),
        ("GIT_COMMITTER_EMAIL", "fake_email@email.com"),
        ("GIT_COMMITTER_DATE", "2023-01-01 12:00:00 +0000"),
    ]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}
