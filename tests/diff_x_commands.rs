use assert_fs::TempDir;
use assert_fs::prelude::*;
use common::command::{channel_root, differing_files, identical_files, run_dvc_utils, work_dir};
use common::leftover_entries;
use fake::Fake;
use fake::faker::lorem::en::Words;
use predicates::prelude::predicate;
use rstest::rstest;
use std::time::{Duration, Instant};

mod common;

#[rstest]
fn identical_files_through_cat_exit_zero(identical_files: TempDir, channel_root: TempDir) {
    run_dvc_utils(
        identical_files.path(),
        channel_root.path(),
        &["diff-x", "cat", "file1.txt", "file2.txt"],
    )
    .assert()
    .code(0)
    .stdout(predicate::str::is_empty());

    assert!(leftover_entries(channel_root.path()).is_empty());
}

#[rstest]
fn differing_files_through_cat_exit_one(differing_files: TempDir, channel_root: TempDir) {
    let output = run_dvc_utils(
        differing_files.path(),
        channel_root.path(),
        &["diff-x", "cat", "file1.txt", "file2.txt"],
    )
    .assert()
    .code(1)
    .get_output()
    .stdout
    .clone();

    pretty_assertions::assert_eq!(String::from_utf8(output).unwrap(), "1c1\n< foo\n---\n> bar\n");
    assert!(leftover_entries(channel_root.path()).is_empty());
}

#[rstest]
fn no_commands_diffs_files_directly(differing_files: TempDir, channel_root: TempDir) {
    run_dvc_utils(
        differing_files.path(),
        channel_root.path(),
        &["diff-x", "file1.txt", "file2.txt"],
    )
    .assert()
    .code(1)
    .stdout(predicate::str::contains("< foo"))
    .stdout(predicate::str::contains("> bar"));
}

#[rstest]
fn failing_stage_is_not_masked_by_an_empty_diff(
    differing_files: TempDir,
    channel_root: TempDir,
) {
    run_dvc_utils(
        differing_files.path(),
        channel_root.path(),
        &["diff-x", "cat", "false", "file1.txt", "file2.txt"],
    )
    .assert()
    .code(1)
    .stdout(predicate::str::is_empty());

    assert!(leftover_entries(channel_root.path()).is_empty());
}

#[rstest]
fn failing_stage_in_chained_exec_commands(work_dir: TempDir, channel_root: TempDir) {
    work_dir.child("file1.txt").write_str("foo\nbar\n").unwrap();
    work_dir.child("file2.txt").write_str("bar\nfoo\n").unwrap();

    run_dvc_utils(
        work_dir.path(),
        channel_root.path(),
        &["diff-x", "-x", "sort", "-x", "false", "file1.txt", "file2.txt"],
    )
    .assert()
    .failure();
}

#[rstest]
fn sorting_both_sides_hides_reordering(work_dir: TempDir, channel_root: TempDir) {
    work_dir.child("file1.txt").write_str("foo\nbar\n").unwrap();
    work_dir.child("file2.txt").write_str("bar\nfoo\n").unwrap();

    run_dvc_utils(
        work_dir.path(),
        channel_root.path(),
        &["diff-x", "-x", "cat", "-x", "sort", "file1.txt", "file2.txt"],
    )
    .assert()
    .code(0);
}

#[rstest]
fn broken_shell_line_propagates_failure(differing_files: TempDir, channel_root: TempDir) {
    run_dvc_utils(
        differing_files.path(),
        channel_root.path(),
        &["diff-x", "cat /nonexistent/file/that/does/not/exist ||", "file1.txt", "file2.txt"],
    )
    .assert()
    .failure();
}

#[rstest]
#[case::strict(&["diff-x", "cat", "file1.txt", "file2.txt"], 1)]
#[case::ignoring_whitespace(&["diff-x", "-w", "cat", "file1.txt", "file2.txt"], 0)]
fn whitespace_flag_is_passed_to_diff(
    work_dir: TempDir,
    channel_root: TempDir,
    #[case] args: &[&str],
    #[case] expected: i32,
) {
    work_dir.child("file1.txt").write_str("a b\n").unwrap();
    work_dir.child("file2.txt").write_str("a   b\n").unwrap();

    run_dvc_utils(work_dir.path(), channel_root.path(), args)
        .assert()
        .code(expected);
}

#[rstest]
fn unified_context_flag_is_passed_to_diff(differing_files: TempDir, channel_root: TempDir) {
    run_dvc_utils(
        differing_files.path(),
        channel_root.path(),
        &["diff-x", "-U", "0", "cat", "file1.txt", "file2.txt"],
    )
    .assert()
    .code(1)
    .stdout(predicate::str::contains("@@ -1 +1 @@"))
    .stdout(predicate::str::contains("-foo"))
    .stdout(predicate::str::contains("+bar"));
}

#[rstest]
fn exec_mode_splits_commands_into_arguments(work_dir: TempDir, channel_root: TempDir) {
    work_dir.child("file1.txt").write_str("same\nfoo\n").unwrap();
    work_dir.child("file2.txt").write_str("same\nbar\n").unwrap();

    run_dvc_utils(
        work_dir.path(),
        channel_root.path(),
        &["diff-x", "-S", "head -n 1", "file1.txt", "file2.txt"],
    )
    .assert()
    .code(0);
}

#[rstest]
fn missing_file_compares_as_empty(identical_files: TempDir, channel_root: TempDir) {
    let output = run_dvc_utils(
        identical_files.path(),
        channel_root.path(),
        &["diff-x", "cat", "file1.txt", "missing.txt"],
    )
    .assert()
    .code(1)
    .get_output()
    .stdout
    .clone();

    pretty_assertions::assert_eq!(String::from_utf8(output).unwrap(), "1,2d0\n< foo\n< bar\n");
}

#[rstest]
fn unknown_shell_exits_with_not_found(differing_files: TempDir, channel_root: TempDir) {
    run_dvc_utils(
        differing_files.path(),
        channel_root.path(),
        &["diff-x", "-s", "/nonexistent/shell", "cat", "file1.txt", "file2.txt"],
    )
    .assert()
    .code(127)
    .stderr(predicate::str::contains("error:"));

    assert!(leftover_entries(channel_root.path()).is_empty());
}

#[rstest]
fn timeout_kills_pipelines_and_cleans_up(differing_files: TempDir, channel_root: TempDir) {
    let started = Instant::now();

    run_dvc_utils(
        differing_files.path(),
        channel_root.path(),
        &["diff-x", "--timeout", "1", "exec sleep 30 <", "file1.txt", "file2.txt"],
    )
    .assert()
    .code(130);

    assert!(started.elapsed() < Duration::from_secs(20));
    assert!(leftover_entries(channel_root.path()).is_empty());
}

#[rstest]
fn single_path_is_rejected(differing_files: TempDir, channel_root: TempDir) {
    run_dvc_utils(
        differing_files.path(),
        channel_root.path(),
        &["diff-x", "file1.txt"],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("PATH1 PATH2"));
}

#[rstest]
fn shuffled_lines_compare_equal_after_sort(work_dir: TempDir, channel_root: TempDir) {
    let words = Words(20..40).fake::<Vec<String>>();
    let mut reversed = words.clone();
    reversed.reverse();
    work_dir.child("file1.txt").write_str(&(words.join("\n") + "\n")).unwrap();
    work_dir.child("file2.txt").write_str(&(reversed.join("\n") + "\n")).unwrap();

    run_dvc_utils(
        work_dir.path(),
        channel_root.path(),
        &["diff-x", "sort", "file1.txt", "file2.txt"],
    )
    .assert()
    .code(0);

    assert!(leftover_entries(channel_root.path()).is_empty());
}

#[rstest]
fn producers_cut_off_by_head_are_not_failures(differing_files: TempDir, channel_root: TempDir) {
    let assert = run_dvc_utils(
        differing_files.path(),
        channel_root.path(),
        &["diff-x", "-x", "yes", "-x", "head -n 3", "file1.txt", "file2.txt"],
    )
    .assert()
    .code(1);

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("< file1.txt"));
    assert!(stdout.contains("> file2.txt"));
    assert!(leftover_entries(channel_root.path()).is_empty());
}

#[rstest]
fn binary_inputs_report_a_difference(work_dir: TempDir, channel_root: TempDir) {
    let first = (0..4_000_000u32).map(|i| (i * 7 % 256) as u8).collect::<Vec<_>>();
    let second = (0..4_000_000u32).map(|i| (i * 13 % 256) as u8).collect::<Vec<_>>();
    std::fs::write(work_dir.path().join("a.bin"), first).unwrap();
    std::fs::write(work_dir.path().join("b.bin"), second).unwrap();

    run_dvc_utils(
        work_dir.path(),
        channel_root.path(),
        &["diff-x", "cat", "a.bin", "b.bin"],
    )
    .assert()
    .code(1)
    .stdout(predicate::str::contains("differ"));

    assert!(leftover_entries(channel_root.path()).is_empty());
}

#[rstest]
fn verbose_logs_each_command_once(differing_files: TempDir, channel_root: TempDir) {
    let assert = run_dvc_utils(
        differing_files.path(),
        channel_root.path(),
        &["diff-x", "-v", "cat", "file1.txt", "file2.txt"],
    )
    .assert()
    .code(1);

    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert_eq!(stderr.matches("Running: cat").count(), 2);
    assert_eq!(stderr.matches("Running: diff").count(), 1);
    assert!(!stderr.contains("Running: diff  "));
}
