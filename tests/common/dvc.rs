use crate::common::command::{CACHE_DIR, run_git_command, work_dir};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use rstest::fixture;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Git repository with a DVC-style cache, built without the `dvc` CLI
///
/// Content hashes only need to be unique per content, so they come from a std
/// hasher rather than md5.
pub struct DvcRepository {
    dir: TempDir,
}

impl DvcRepository {
    pub fn init(dir: TempDir) -> Self {
        run_git_command(dir.path(), &["init", "-q"]).assert().success();
        run_git_command(dir.path(), &["config", "commit.gpgsign", "false"])
            .assert()
            .success();
        dir.child(".gitignore").write_str("/.dvc/cache\n").unwrap();
        run_git_command(dir.path(), &["add", ".gitignore"])
            .assert()
            .success();

        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Track `path` through its own manifest; returns the content hash
    pub fn track_file(&self, path: &str, content: &str) -> String {
        let md5 = self.store_blob(content);
        self.dir.child(path).write_str(content).unwrap();
        self.write_manifest(path, &md5, content.len());
        md5
    }

    /// Track directory `path` as a whole; returns the `.dir` hash
    pub fn track_dir(&self, path: &str, files: &[(&str, &str)]) -> String {
        let entries = files
            .iter()
            .map(|(relpath, content)| {
                self.dir.child(path).child(relpath).write_str(content).unwrap();
                serde_json::json!({ "md5": self.store_blob(content), "relpath": relpath })
            })
            .collect::<Vec<_>>();

        let listing = serde_json::to_string(&entries).unwrap();
        let md5 = format!("{}.dir", fake_md5(&listing));
        self.write_cache_entry(&md5, &listing);
        self.write_manifest(path, &md5, listing.len());
        md5
    }

    pub fn commit(&self, message: &str) {
        run_git_command(self.path(), &["commit", "-q", "-m", message])
            .assert()
            .success();
    }

    pub fn blob_path(&self, md5: &str) -> PathBuf {
        self.path()
            .join(CACHE_DIR)
            .join("files")
            .join("md5")
            .join(&md5[..2])
            .join(&md5[2..])
    }

    fn store_blob(&self, content: &str) -> String {
        let md5 = fake_md5(content);
        self.write_cache_entry(&md5, content);
        md5
    }

    fn write_cache_entry(&self, md5: &str, content: &str) {
        let path = self.blob_path(md5);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn write_manifest(&self, path: &str, md5: &str, size: usize) {
        let manifest = format!("{path}.dvc");
        let name = Path::new(path).file_name().unwrap().to_string_lossy();
        self.dir
            .child(&manifest)
            .write_str(&format!(
                "outs:\n- md5: {md5}\n  size: {size}\n  hash: md5\n  path: {name}\n"
            ))
            .unwrap();
        run_git_command(self.path(), &["add", &manifest])
            .assert()
            .success();
    }
}

pub fn fake_md5(content: &str) -> String {
    let mut first = DefaultHasher::new();
    content.hash(&mut first);
    let mut second = DefaultHasher::new();
    (content, "salt").hash(&mut second);
    format!("{:016x}{:016x}", first.finish(), second.finish())
}

/// `data.txt` committed twice with a changed last line
#[fixture]
pub fn repository_with_history(work_dir: TempDir) -> DvcRepository {
    let repository = DvcRepository::init(work_dir);
    repository.track_file("data.txt", "a\nb\none\n");
    repository.commit("First commit");
    repository.track_file("data.txt", "a\nb\ntwo\n");
    repository.commit("Second commit");
    repository
}
