//! Result reporting.
//!
//! A successful run reports the build tool's stdout as-is; the test harness
//! inside the project is responsible for its format. A failed run reports a
//! JSON [`ResultPayload`] with a score of zero.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Substrings that show the Maven repository was unreachable.
pub const MAVEN_OUTAGE_MARKERS: [&str; 3] = [
    "Unable to load Maven meta-data",
    "Gateway Time-out",
    "Could not download",
];

/// Shown instead of the raw error when a Maven outage is detected.
pub const MAVEN_OUTAGE_MESSAGE: &str = "
Unfortunately, the autograder could not run because the Maven repository is down.
This should resolve itself soon. You can view the status at: https://status.maven.org/
If this interferes with your completing the assignment on time, contact your instructor.";

/// Errors from writing results.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write results to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write results to stdout: {0}")]
    Stdout(#[source] io::Error),

    #[error("failed to encode result payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Score and message for a run that did not complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    pub score: f64,
    pub output: String,
}

impl ResultPayload {
    /// A zero-score payload for `error`.
    pub fn failure(error: &dyn fmt::Display) -> Self {
        let message = error.to_string();
        let output = if is_maven_outage(&message) {
            MAVEN_OUTAGE_MESSAGE.to_string()
        } else {
            message
        };
        Self { score: 0.0, output }
    }

    /// Compact JSON encoding.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Whether an error message is caused by the Maven repository being down.
pub fn is_maven_outage(message: &str) -> bool {
    MAVEN_OUTAGE_MARKERS.iter().any(|m| message.contains(m))
}

/// Writes result text to stdout and, optionally, to a results file.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    results_file: Option<PathBuf>,
}

impl Reporter {
    /// Create a reporter. With a results file, the same text is also written
    /// there, creating parent directories as needed.
    pub fn new(results_file: Option<PathBuf>) -> Self {
        Self { results_file }
    }

    /// The configured results file, if any.
    pub fn results_file(&self) -> Option<&Path> {
        self.results_file.as_deref()
    }

    /// Report the output of a successful run.
    pub fn success(&self, out: &mut impl Write, text: &str) -> Result<(), ReportError> {
        self.emit(out, text)
    }

    /// Report a failed run as a JSON payload.
    pub fn failure(
        &self,
        out: &mut impl Write,
        error: &dyn fmt::Display,
    ) -> Result<(), ReportError> {
        let payload = ResultPayload::failure(error);
        self.emit(out, &payload.to_json()?)
    }

    fn emit(&self, out: &mut impl Write, text: &str) -> Result<(), ReportError> {
        writeln!(out, "{text}").map_err(ReportError::Stdout)?;

        if let Some(path) = &self.results_file {
            let io_err = |source| ReportError::Io {
                path: path.clone(),
                source,
            };
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
            std::fs::write(path, text).map_err(io_err)?;
            debug!(path = %path.display(), "Wrote results file");
        }
        Ok(())
    }
}
