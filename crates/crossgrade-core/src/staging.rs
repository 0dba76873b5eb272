//! Working tree staging.
//!
//! Builds the disposable tree the external build tool runs in:
//!
//! ```text
//! <root>/<working_dir>/
//!   build.gradle, gradlew, lib/, ...        ← scaffold copied from <root>
//!   <source_dir>/<origin ns path>/           ← submission files
//!   <source_dir>/<target ns path>/           ← pre-created for repackaging
//! ```
//!
//! Every path is derived from the grader root passed in; nothing here depends
//! on the process working directory.

use std::io;
use std::path::{Path, PathBuf};

use crossgrade_config::GraderConfig;
use tracing::{debug, info};

use crate::dialect::Dialect;
use crate::namespace::namespace_dir;

/// Errors from locating the submission and building the working tree.
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("unable to find submission directory {0}")]
    SubmissionNotFound(String),

    #[error("specified submission location '{}' is a file, not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("file {0} not found")]
    MissingFile(String),

    #[error("required scaffold file {} not found", .0.display())]
    MissingScaffold(PathBuf),

    #[error(
        "file {} does not contain the expected {keyword} declaration: {expected}",
        path.display()
    )]
    MissingDeclaration {
        path: PathBuf,
        keyword: &'static str,
        expected: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_err(path: &Path) -> impl Fn(io::Error) -> StagingError + '_ {
    move |source| StagingError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Lays out the working tree for one grading run.
#[derive(Debug, Clone)]
pub struct Stager {
    root: PathBuf,
    working_dir: PathBuf,
    source_root: PathBuf,
    origin: String,
    dialect: Dialect,
}

impl Stager {
    /// Create a stager rooted at `root`, with the layout from `config`.
    pub fn from_config(root: &Path, config: &GraderConfig) -> Self {
        let working_dir = root.join(&config.project.working_dir);
        let source_root = working_dir.join(&config.project.source_dir);
        Self {
            root: root.to_path_buf(),
            working_dir,
            source_root,
            origin: config.origin_namespace().to_string(),
            dialect: Dialect::from(config.submission.language),
        }
    }

    /// The working tree.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Root of the namespace directories inside the working tree.
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Directory the submission's files are staged into.
    pub fn origin_dir(&self) -> PathBuf {
        namespace_dir(&self.source_root, &self.origin)
    }

    /// Replace any previous working tree with an empty one.
    pub fn create_working_dir(&self) -> Result<(), StagingError> {
        if self.working_dir.is_dir() {
            debug!(path = %self.working_dir.display(), "Removing previous working tree");
            std::fs::remove_dir_all(&self.working_dir).map_err(io_err(&self.working_dir))?;
        }
        std::fs::create_dir_all(&self.working_dir).map_err(io_err(&self.working_dir))?;
        Ok(())
    }

    /// Copy scaffold entries from the grader root into the working tree.
    ///
    /// Entries ending in `/` name directories and are skipped when absent;
    /// any other entry is a required file. Returns the number of entries
    /// copied.
    pub fn copy_scaffold(&self, entries: &[String]) -> Result<usize, StagingError> {
        let mut copied = 0;
        for entry in entries {
            if let Some(dir) = entry.strip_suffix(['/', '\\']) {
                let from = self.root.join(dir);
                if from.is_dir() {
                    copy_dir_recursive(&from, &self.working_dir.join(dir))?;
                    copied += 1;
                } else {
                    debug!(dir = %entry, "Scaffold directory absent, skipping");
                }
            } else {
                let from = self.root.join(entry);
                if !from.is_file() {
                    return Err(StagingError::MissingScaffold(from));
                }
                let to = self.working_dir.join(entry);
                if let Some(parent) = to.parent() {
                    std::fs::create_dir_all(parent).map_err(io_err(parent))?;
                }
                std::fs::copy(&from, &to).map_err(io_err(&to))?;
                copied += 1;
            }
        }
        info!(copied, "Copied project scaffold");
        Ok(copied)
    }

    /// Copy the submission's files into the origin namespace directory.
    ///
    /// Source files of the configured language must declare the origin
    /// namespace. Returns the origin directory.
    pub fn stage_submission(
        &self,
        submission_dir: &Path,
        files: &[String],
    ) -> Result<PathBuf, StagingError> {
        let dest = self.origin_dir();
        std::fs::create_dir_all(&dest).map_err(io_err(&dest))?;

        for file in files {
            let from = submission_dir.join(file);
            if !from.is_file() {
                return Err(StagingError::MissingFile(file.clone()));
            }
            if from.extension().and_then(|e| e.to_str()) == Some(self.dialect.source_extension()) {
                self.ensure_declares_origin(&from)?;
            }
            let name = from
                .file_name()
                .ok_or_else(|| StagingError::MissingFile(file.clone()))?;
            let to = dest.join(name);
            std::fs::copy(&from, &to).map_err(io_err(&to))?;
            debug!(file = %file, dest = %to.display(), "Staged submission file");
        }

        info!(
            package = %self.origin,
            files = files.len(),
            dest = %dest.display(),
            "Staged submission"
        );
        Ok(dest)
    }

    /// Create the directory of every target namespace.
    pub fn prepare_targets(&self, targets: &[String]) -> Result<(), StagingError> {
        for target in targets {
            let dir = namespace_dir(&self.source_root, target);
            std::fs::create_dir_all(&dir).map_err(io_err(&dir))?;
        }
        Ok(())
    }

    fn ensure_declares_origin(&self, path: &Path) -> Result<(), StagingError> {
        let content = std::fs::read_to_string(path).map_err(io_err(path))?;
        if self.dialect.declares(&content, &self.origin) {
            Ok(())
        } else {
            Err(StagingError::MissingDeclaration {
                path: path.to_path_buf(),
                keyword: self.dialect.keyword(),
                expected: self.dialect.declaration(&self.origin),
            })
        }
    }
}

/// Copy a directory tree, creating `to` and any missing parents.
fn copy_dir_recursive(from: &Path, to: &Path) -> Result<(), StagingError> {
    std::fs::create_dir_all(to).map_err(io_err(to))?;
    for entry in std::fs::read_dir(from).map_err(io_err(from))? {
        let entry = entry.map_err(io_err(from))?;
        let path = entry.path();
        let dest = to.join(entry.file_name());
        if path.is_dir() {
            copy_dir_recursive(&path, &dest)?;
        } else {
            std::fs::copy(&path, &dest).map_err(io_err(&dest))?;
        }
    }
    Ok(())
}
