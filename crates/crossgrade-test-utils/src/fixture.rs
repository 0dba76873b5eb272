//! On-disk fixtures.
//!
//! [`StagedTree`] is a bare namespace tree for exercising the repackaging
//! engine directly. [`GraderRoot`] is a full grader root (scaffold,
//! submissions, working tree) for end-to-end runs. Both own a temp directory
//! that is deleted when the fixture is dropped, even on panic.

use std::path::{Path, PathBuf};

use crossgrade_core::namespace_dir;
use tempfile::TempDir;

/// A temporary source root with namespace directories under it.
pub struct StagedTree {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl StagedTree {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// The source root namespaces are laid out under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory of `namespace`.
    pub fn mkdir(&self, namespace: &str) -> &Self {
        std::fs::create_dir_all(namespace_dir(&self.root, namespace))
            .expect("failed to create namespace dir");
        self
    }

    /// Write `file` into `namespace`, creating the directory if needed.
    pub fn stage(&self, namespace: &str, file: &str, content: &str) -> &Self {
        self.mkdir(namespace);
        std::fs::write(self.path(namespace, file), content).expect("failed to stage file");
        self
    }

    /// Path of `file` inside `namespace`.
    pub fn path(&self, namespace: &str, file: &str) -> PathBuf {
        namespace_dir(&self.root, namespace).join(file)
    }

    /// Read `file` from `namespace` as UTF-8.
    pub fn read(&self, namespace: &str, file: &str) -> String {
        std::fs::read_to_string(self.path(namespace, file)).expect("failed to read staged file")
    }

    /// Whether `file` exists in `namespace`.
    pub fn exists(&self, namespace: &str, file: &str) -> bool {
        self.path(namespace, file).exists()
    }

    /// Every regular file under the root, relative to it, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        collect_files(&self.root, &self.root, &mut out);
        out.sort();
        out
    }

    /// Remove every namespace directory except `keep`'s, restoring the tree
    /// to its staged state between runs.
    pub fn reset_except(&self, keep: &str) {
        let keep_dir = namespace_dir(&self.root, keep);
        for file in self.files() {
            let path = self.root.join(&file);
            if !path.starts_with(&keep_dir) {
                std::fs::remove_file(&path).expect("failed to remove file");
            }
        }
    }
}

impl Default for StagedTree {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(root, &path, out);
        } else if let Ok(rel) = path.strip_prefix(root) {
            out.push(rel.to_path_buf());
        }
    }
}

/// A temporary grader root directory.
pub struct GraderRoot {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl GraderRoot {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> &Self {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&path, content).expect("failed to write fixture file");
        self
    }

    /// Read a file relative to the root as UTF-8.
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root.join(rel)).expect("failed to read fixture file")
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.root.join(rel).exists()
    }
}

impl Default for GraderRoot {
    fn default() -> Self {
        Self::new()
    }
}
