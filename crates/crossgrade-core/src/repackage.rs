//! Cross-test repackaging.
//!
//! A test file written against the submission's namespace is duplicated into
//! every other configured namespace so that it can run against the code found
//! there. Each copy:
//!
//! 1. opens with a declaration of the target namespace and a blank line,
//! 2. imports the origin namespace with a wildcard, so references the target
//!    does not define fall back to the original submission's classes,
//! 3. carries every line of the original except its namespace declaration.
//!
//! ```text
//!   src/student/AdderTest.java          src/other/AdderTest.java
//!   ┌────────────────────────┐          ┌────────────────────────┐
//!   │ package student;       │ ──────►  │ package other;         │
//!   │                        │          │                        │
//!   │ public class AdderTest │          │ import student.*;      │
//!   │ ...                    │          │                        │
//!   └────────────────────────┘          │ public class AdderTest │
//!                                       │ ...                    │
//!                                       └────────────────────────┘
//! ```
//!
//! The engine only reads origin files and writes new files. It never creates
//! directories: every target namespace directory must exist beforehand
//! (see [`Stager::prepare_targets`](crate::staging::Stager::prepare_targets)).

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::dialect::Dialect;
use crate::namespace::namespace_dir;

/// Errors from repackaging. The first error aborts the whole pass; files
/// already written are left in place.
#[derive(Debug, thiserror::Error)]
pub enum RepackageError {
    #[error("failed to read test file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write repackaged file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One file written by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repackaged {
    /// Test file name, relative to its namespace directory.
    pub test_file: String,
    /// Namespace the copy now declares.
    pub target: String,
    /// Where the copy was written.
    pub path: PathBuf,
    /// How many origin declaration lines were dropped.
    pub stripped: usize,
}

/// Rewrites staged test files from one origin namespace into others.
#[derive(Debug, Clone)]
pub struct Repackager {
    source_root: PathBuf,
    origin: String,
    dialect: Dialect,
}

impl Repackager {
    /// Create a repackager for files staged under
    /// `source_root/<origin namespace path>`.
    pub fn new(
        source_root: impl Into<PathBuf>,
        origin: impl Into<String>,
        dialect: Dialect,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            origin: origin.into(),
            dialect,
        }
    }

    /// Duplicate every test file into every target namespace other than the
    /// origin.
    ///
    /// Files are processed in order, targets in order within each file. With
    /// no targets, or only the origin as a target, nothing is written.
    pub fn repackage_all(
        &self,
        test_files: &[String],
        targets: &[String],
    ) -> Result<Vec<Repackaged>, RepackageError> {
        let mut written = Vec::new();
        for file in test_files {
            for target in targets {
                if *target == self.origin {
                    debug!(file = %file, target = %target, "Skipping origin namespace");
                    continue;
                }
                written.push(self.repackage_file(file, target)?);
            }
        }
        info!(
            origin = %self.origin,
            files = test_files.len(),
            written = written.len(),
            "Cross-test repackaging complete"
        );
        Ok(written)
    }

    /// Write the copy of `file` that declares `target`.
    ///
    /// The source is streamed line by line and copied byte for byte, except
    /// for lines recognised by [`Dialect::is_declaration_of`] for the origin.
    pub fn repackage_file(
        &self,
        file: &str,
        target: &str,
    ) -> Result<Repackaged, RepackageError> {
        let source_path = namespace_dir(&self.source_root, &self.origin).join(file);
        let dest_path = namespace_dir(&self.source_root, target).join(file);

        let read_err = |source: io::Error| RepackageError::Read {
            path: source_path.clone(),
            source,
        };
        let write_err = |source: io::Error| RepackageError::Write {
            path: dest_path.clone(),
            source,
        };

        let mut reader = BufReader::new(File::open(&source_path).map_err(read_err)?);
        let mut writer = BufWriter::new(File::create(&dest_path).map_err(write_err)?);

        writeln!(writer, "{}", self.dialect.declaration(target)).map_err(write_err)?;
        writeln!(writer).map_err(write_err)?;
        writeln!(writer, "{}", self.dialect.wildcard_import(&self.origin)).map_err(write_err)?;

        let mut stripped = 0;
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).map_err(read_err)? == 0 {
                break;
            }
            if self
                .dialect
                .is_declaration_of(&String::from_utf8_lossy(&line), &self.origin)
            {
                stripped += 1;
                continue;
            }
            writer.write_all(&line).map_err(write_err)?;
        }
        writer.flush().map_err(write_err)?;

        debug!(
            file = %file,
            target = %target,
            stripped,
            path = %dest_path.display(),
            "Repackaged test file"
        );

        Ok(Repackaged {
            test_file: file.to_string(),
            target: target.to_string(),
            path: dest_path,
            stripped,
        })
    }
}
