//! Locating the submission directory.

use std::path::{Path, PathBuf};

use crate::staging::StagingError;

/// Directory used when no submission is named.
pub const DEFAULT_SUBMISSION_DIR: &str = "submission";

/// Directory searched for named submissions that are not found directly.
pub const SUBMISSIONS_DIR: &str = "submissions";

/// Resolve the directory holding the submission to grade.
///
/// With no name (or a blank one), `root/submission` is used. A name is tried
/// first relative to `root`, then under `root/submissions`. Trailing path
/// separators on the name are ignored; other characters, including leading
/// whitespace, are kept.
pub fn locate_submission(root: &Path, name: Option<&str>) -> Result<PathBuf, StagingError> {
    let name = name.filter(|n| !n.trim().is_empty());

    let Some(name) = name else {
        let dir = root.join(DEFAULT_SUBMISSION_DIR);
        return if dir.is_dir() {
            Ok(dir)
        } else {
            Err(StagingError::SubmissionNotFound(dir.display().to_string()))
        };
    };

    let name = name.trim_end_matches(['/', '\\']);
    let direct = root.join(name);
    if direct.exists() {
        return require_dir(direct);
    }

    let nested = root.join(SUBMISSIONS_DIR).join(name);
    if nested.exists() {
        return require_dir(nested);
    }

    Err(StagingError::SubmissionNotFound(format!(
        "{} or {}",
        direct.display(),
        nested.display()
    )))
}

fn require_dir(path: PathBuf) -> Result<PathBuf, StagingError> {
    if path.is_dir() {
        Ok(path)
    } else {
        Err(StagingError::NotADirectory(path))
    }
}
