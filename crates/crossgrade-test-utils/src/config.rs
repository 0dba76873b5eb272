//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`GraderConfig`] values
//! without repeating boilerplate across crate boundaries.

use crossgrade_config::{CrossTestConfig, GraderConfig, Language};

/// Fluent builder for [`GraderConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new("student")
///     .files(&["Adder.java", "AdderTest.java"])
///     .cross_tests(&["AdderTest.java"], &["student", "other"])
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: GraderConfig,
}

impl TestConfigBuilder {
    /// Start from a submission in `package` with no files, no scaffold, and
    /// no cross-testing.
    pub fn new(package: &str) -> Self {
        let mut config = GraderConfig::new(package, Vec::new());
        config.project.scaffold = Vec::new();
        Self { config }
    }

    pub fn files(mut self, files: &[&str]) -> Self {
        self.config.submission.files = files.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.config.submission.language = language;
        self
    }

    pub fn cross_tests(mut self, tests: &[&str], packages: &[&str]) -> Self {
        self.config.crosstests = Some(CrossTestConfig {
            tests: tests.iter().map(|t| t.to_string()).collect(),
            packages: packages.iter().map(|p| p.to_string()).collect(),
        });
        self
    }

    pub fn scaffold(mut self, entries: &[&str]) -> Self {
        self.config.project.scaffold = entries.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn source_dir(mut self, dir: &str) -> Self {
        self.config.project.source_dir = dir.to_string();
        self
    }

    pub fn runner(mut self, command: &str, args: &[&str]) -> Self {
        self.config.runner.command = command.to_string();
        self.config.runner.args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn build(self) -> GraderConfig {
        self.config
    }
}
