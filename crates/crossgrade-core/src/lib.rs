#![deny(unsafe_code)]

//! crossgrade core: staging, cross-test repackaging, and build orchestration.
//!
//! A grading run copies a student submission into a disposable project tree,
//! optionally duplicates test files into other namespaces so they exercise
//! other submissions' code, runs the project's build tool, and reports the
//! result.
//!
//! Repackaging is purely textual: a [`Dialect`] recognises the namespace
//! declaration line to drop and writes the replacement declaration and a
//! wildcard import. There is no parser and no symbol table.

/// Namespace declaration and import syntax per language.
pub mod dialect;
/// End-to-end grading runs.
pub mod grader;
/// Dotted namespace to directory mapping.
pub mod namespace;
/// Cross-test repackaging engine.
pub mod repackage;
/// Result payloads and output.
pub mod report;
/// External build tool invocation.
pub mod runner;
/// Working tree staging.
pub mod staging;
/// Submission directory lookup.
pub mod submission;

pub use dialect::Dialect;
pub use grader::{GradeError, Grader, StageReport};
pub use namespace::{namespace_dir, namespace_path};
pub use repackage::{RepackageError, Repackaged, Repackager};
pub use report::{Reporter, ResultPayload};
pub use runner::{BuildOutput, BuildRunner};
pub use staging::{Stager, StagingError};
