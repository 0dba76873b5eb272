//! External build/run tool invocation.
//!
//! The tool runs inside the staged working tree with its output captured.
//! No isolation or resource limits are applied.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossgrade_config::RunnerConfig;
use tracing::{info, warn};

/// Command name that resolves to the Gradle wrapper script in the working tree.
pub const GRADLE_WRAPPER: &str = "gradlew";

/// Errors from running the build tool.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("failed to start build tool {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Runtime error: {stderr}")]
    Failed { exit_code: i32, stderr: String },
}

/// Captured output of a successful run.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

/// Runs the configured build tool in a working tree.
#[derive(Debug, Clone)]
pub struct BuildRunner {
    program: PathBuf,
    args: Vec<String>,
    workdir: PathBuf,
}

impl BuildRunner {
    /// Create a runner for an explicit program and arguments.
    pub fn new(
        program: impl Into<PathBuf>,
        args: Vec<String>,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            workdir: workdir.into(),
        }
    }

    /// Create a runner from configuration. The command `gradlew` becomes the
    /// platform's wrapper script inside `workdir`.
    pub fn from_config(config: &RunnerConfig, workdir: &Path) -> Self {
        Self::new(
            resolve_program(&config.command, workdir),
            config.args.clone(),
            workdir,
        )
    }

    /// The program that will be executed.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run to completion. A non-zero exit status is an error carrying stderr.
    pub async fn run(&self) -> Result<BuildOutput, RunnerError> {
        info!(
            program = %self.program.display(),
            args = ?self.args,
            workdir = %self.workdir.display(),
            "Running build tool"
        );
        let start = Instant::now();

        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.workdir)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|source| RunnerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let elapsed = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(exit_code, elapsed_ms = elapsed.as_millis() as u64, "Build tool failed");
            return Err(RunnerError::Failed { exit_code, stderr });
        }

        info!(elapsed_ms = elapsed.as_millis() as u64, "Build tool finished");
        Ok(BuildOutput {
            stdout,
            stderr,
            elapsed,
        })
    }
}

/// Map a configured command to the program to execute.
///
/// The wrapper path is made absolute: the child starts in `workdir`, so a
/// relative program path would be looked up from there.
fn resolve_program(command: &str, workdir: &Path) -> PathBuf {
    if command != GRADLE_WRAPPER {
        return PathBuf::from(command);
    }
    let script = if cfg!(windows) {
        "gradlew.bat"
    } else {
        "gradlew"
    };
    let path = workdir.join(script);
    std::path::absolute(&path).unwrap_or(path)
}
