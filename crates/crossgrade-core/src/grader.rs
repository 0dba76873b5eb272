//! End-to-end grading run: stage, repackage, build.

use std::path::{Path, PathBuf};

use crossgrade_config::{ConfigError, GraderConfig};
use tracing::info;

use crate::dialect::Dialect;
use crate::repackage::{RepackageError, Repackaged, Repackager};
use crate::runner::{BuildOutput, BuildRunner, RunnerError};
use crate::staging::{Stager, StagingError};
use crate::submission::locate_submission;

/// Any failure of a grading run.
#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error(transparent)]
    Repackage(#[from] RepackageError),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("staging task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// What staging produced.
#[derive(Debug, Clone)]
pub struct StageReport {
    /// Where the submission was read from.
    pub submission_dir: PathBuf,
    /// The working tree the build runs in.
    pub working_dir: PathBuf,
    /// Where the submission's files were staged.
    pub origin_dir: PathBuf,
    /// Scaffold entries copied into the working tree.
    pub scaffold_entries: usize,
    /// Cross-test copies written, empty when cross-testing is off.
    pub repackaged: Vec<Repackaged>,
}

/// Drives one grading run against a grader root directory.
///
/// The root holds the scaffold, the `submission/` or `submissions/`
/// directories, and receives the working tree.
#[derive(Debug, Clone)]
pub struct Grader {
    config: GraderConfig,
    root: PathBuf,
}

impl Grader {
    /// Create a grader for `root`.
    ///
    /// A relative root is made absolute against the current directory, so
    /// paths handed to the build tool stay valid inside the working tree.
    pub fn new(config: GraderConfig, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self { config, root }
    }

    /// The grader root, always absolute.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the working tree: scaffold, submission, and (when configured)
    /// the cross-test copies.
    pub fn stage(&self, submission: Option<&str>) -> Result<StageReport, GradeError> {
        self.config.validate()?;
        let submission_dir = locate_submission(&self.root, submission)?;
        info!(submission = %submission_dir.display(), "Grading submission");

        let stager = Stager::from_config(&self.root, &self.config);
        stager.create_working_dir()?;
        let scaffold_entries = stager.copy_scaffold(&self.config.project.scaffold)?;
        let origin_dir = stager.stage_submission(&submission_dir, &self.config.submission.files)?;

        let repackaged = match self.config.cross_tests() {
            Some(cross) => {
                stager.prepare_targets(&cross.packages)?;
                Repackager::new(
                    stager.source_root(),
                    self.config.origin_namespace(),
                    Dialect::from(self.config.submission.language),
                )
                .repackage_all(&cross.tests, &cross.packages)?
            }
            None => Vec::new(),
        };

        Ok(StageReport {
            submission_dir,
            working_dir: stager.working_dir().to_path_buf(),
            origin_dir,
            scaffold_entries,
            repackaged,
        })
    }

    /// Stage the submission and run the build tool.
    ///
    /// Staging is blocking file I/O and runs on the blocking thread pool.
    pub async fn run(&self, submission: Option<&str>) -> Result<BuildOutput, GradeError> {
        let grader = self.clone();
        let submission = submission.map(str::to_string);
        let report =
            tokio::task::spawn_blocking(move || grader.stage(submission.as_deref())).await??;
        let output = BuildRunner::from_config(&self.config.runner, &report.working_dir)
            .run()
            .await?;
        Ok(output)
    }
}
