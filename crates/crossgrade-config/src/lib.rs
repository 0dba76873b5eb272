#![deny(unsafe_code)]

//! Configuration loading and validation for crossgrade.
//!
//! Loads the TOML grading configuration that describes a submission, the
//! optional cross-test matrix, the project scaffolding, and how to run the
//! build. [`GraderConfig`] is the central structure; it is read once per run
//! and treated as immutable afterwards.
//!
//! ## TOML Example
//!
//! ```toml
//! [submission]
//! package = "student"
//! files = ["Adder.java", "AdderTest.java"]
//!
//! [crosstests]
//! tests = ["AdderTest.java"]
//! packages = ["student", "cities.model"]
//! ```

/// Dotted namespace validation.
pub mod namespace;

use std::collections::HashSet;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level grading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraderConfig {
    /// The submission under test. Required.
    pub submission: SubmissionConfig,

    /// Cross-testing matrix. When absent, no test file is repackaged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crosstests: Option<CrossTestConfig>,

    /// Working tree layout and scaffolding.
    #[serde(default)]
    pub project: ProjectConfig,

    /// External build/run tool.
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Where results are written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Host language of the staged sources.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// `package a.b;` / `import a.b.*;`
    #[default]
    Java,
    /// `namespace a.b;` / `using a.b;`
    CSharp,
}

/// The submission's own namespace and files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmissionConfig {
    /// Dotted namespace the submission declares (e.g. "cities.model").
    pub package: String,

    /// Files to copy from the submission directory, relative to it.
    pub files: Vec<String>,

    /// Source language, which decides the declaration and import syntax.
    #[serde(default)]
    pub language: Language,
}

/// Which test files are duplicated into which namespaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrossTestConfig {
    /// Test files (already staged under the submission namespace) to duplicate.
    pub tests: Vec<String>,

    /// Target namespaces. An entry equal to the submission namespace is skipped.
    pub packages: Vec<String>,
}

/// Working tree layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Disposable working tree, relative to the grader root.
    #[serde(default = "default_working_dir")]
    pub working_dir: String,

    /// Source root inside the working tree under which namespaces are laid out.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Files and directories (trailing `/`) copied from the grader root into
    /// the working tree before the submission is staged.
    #[serde(default = "default_scaffold")]
    pub scaffold: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            source_dir: default_source_dir(),
            scaffold: default_scaffold(),
        }
    }
}

fn default_working_dir() -> String {
    "working".to_string()
}

fn default_source_dir() -> String {
    "src/main/java".to_string()
}

fn default_scaffold() -> Vec<String> {
    [
        "build.gradle",
        "gradle/",
        "gradlew",
        "gradlew.bat",
        "src/",
        "lib/",
        "config/",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// External build/run tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Program to run inside the working tree. The name "gradlew" resolves to
    /// the platform wrapper script.
    #[serde(default = "default_runner_command")]
    pub command: String,

    /// Arguments passed to the program.
    #[serde(default = "default_runner_args")]
    pub args: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: default_runner_command(),
            args: default_runner_args(),
        }
    }
}

fn default_runner_command() -> String {
    "gradlew".to_string()
}

fn default_runner_args() -> Vec<String> {
    vec!["run".to_string(), "--quiet".to_string()]
}

/// Result output configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// File that receives the result text in addition to stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_file: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl GraderConfig {
    /// Minimal configuration for a submission with no cross-testing.
    pub fn new(package: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            submission: SubmissionConfig {
                package: package.into(),
                files,
                language: Language::default(),
            },
            crosstests: None,
            project: ProjectConfig::default(),
            runner: RunnerConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::parse(&content)?;
        tracing::debug!(
            path = %path.display(),
            package = %config.submission.package,
            crosstests = config.crosstests.is_some(),
            "Loaded grading configuration"
        );
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: GraderConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// The namespace the submission is written against.
    pub fn origin_namespace(&self) -> &str {
        &self.submission.package
    }

    /// The cross-test matrix, if cross-testing is enabled.
    pub fn cross_tests(&self) -> Option<&CrossTestConfig> {
        self.crosstests.as_ref()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        namespace::check_namespace(&self.submission.package)
            .map_err(|e| ConfigError::Validation(format!("submission.package: {e}")))?;

        if self.submission.files.is_empty() {
            return Err(ConfigError::Validation(
                "submission.files must list at least one file".to_string(),
            ));
        }
        for (i, file) in self.submission.files.iter().enumerate() {
            if file.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "submission.files[{i}] must not be empty"
                )));
            }
        }

        if let Some(cross) = &self.crosstests {
            if cross.tests.is_empty() {
                return Err(ConfigError::Validation(
                    "crosstests.tests must list at least one file".to_string(),
                ));
            }
            for (i, test) in cross.tests.iter().enumerate() {
                if test.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "crosstests.tests[{i}] must not be empty"
                    )));
                }
            }
            if cross.packages.is_empty() {
                return Err(ConfigError::Validation(
                    "crosstests.packages must list at least one namespace".to_string(),
                ));
            }
            let mut seen = HashSet::new();
            for (i, package) in cross.packages.iter().enumerate() {
                namespace::check_namespace(package).map_err(|e| {
                    ConfigError::Validation(format!("crosstests.packages[{i}]: {e}"))
                })?;
                if !seen.insert(package.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "crosstests.packages[{i}] duplicates {package:?}"
                    )));
                }
            }
        }

        check_subdir("project.working_dir", &self.project.working_dir)?;
        check_subdir("project.source_dir", &self.project.source_dir)?;
        if self.runner.command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "runner.command must not be empty".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }

        Ok(())
    }
}

/// A directory that is deleted and recreated on every run must stay strictly
/// below the directory it is joined onto.
fn check_subdir(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} must not be empty")));
    }
    let path = Path::new(value);
    if path.is_absolute() || path.has_root() {
        return Err(ConfigError::Validation(format!(
            "{field} must be a relative path, got {value:?}"
        )));
    }
    if !path.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(ConfigError::Validation(format!(
            "{field} must not contain '.' or '..' components, got {value:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"
        [submission]
        package = "student"
        files = ["Adder.java"]
    "#;

    #[test]
    fn test_parse_minimal_toml() {
        let config = GraderConfig::parse(MINIMAL).unwrap();
        assert_eq!(config.origin_namespace(), "student");
        assert_eq!(config.submission.files, vec!["Adder.java"]);
        assert_eq!(config.submission.language, Language::Java);
        assert!(config.cross_tests().is_none());
        assert_eq!(config.project.working_dir, "working");
        assert_eq!(config.project.source_dir, "src/main/java");
        assert_eq!(config.runner.command, "gradlew");
        assert_eq!(config.runner.args, vec!["run", "--quiet"]);
        assert!(config.output.results_file.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            [submission]
            package = "cities.model"
            files = ["Graph.java", "NodeTest.java"]
            language = "java"

            [crosstests]
            tests = ["NodeTest.java"]
            packages = ["cities.model", "student", "other.pkg"]

            [project]
            working_dir = "build-tree"
            source_dir = "src"
            scaffold = ["build.gradle", "lib/"]

            [runner]
            command = "make"
            args = ["test"]

            [output]
            results_file = "results/results.json"

            [logging]
            level = "debug"
        "#;
        let config = GraderConfig::parse(toml).unwrap();
        let cross = config.cross_tests().unwrap();
        assert_eq!(cross.tests, vec!["NodeTest.java"]);
        assert_eq!(cross.packages.len(), 3);
        assert_eq!(config.project.working_dir, "build-tree");
        assert_eq!(config.project.scaffold, vec!["build.gradle", "lib/"]);
        assert_eq!(config.runner.command, "make");
        assert_eq!(
            config.output.results_file.as_deref(),
            Some("results/results.json")
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_parse_csharp_language() {
        let toml = r#"
            [submission]
            package = "Grading.Student"
            files = ["Adder.cs"]
            language = "csharp"
        "#;
        let config = GraderConfig::parse(toml).unwrap();
        assert_eq!(config.submission.language, Language::CSharp);
    }

    #[test]
    fn test_missing_submission_section_is_parse_error() {
        let result = GraderConfig::parse("[crosstests]\ntests = []\npackages = []\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let toml = format!("{MINIMAL}\n[extras]\nkey = 1\n");
        assert!(matches!(
            GraderConfig::parse(&toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_submission_key_rejected() {
        let toml = r#"
            [submission]
            package = "student"
            files = ["Adder.java"]
            extra = "nope"
        "#;
        assert!(matches!(
            GraderConfig::parse(toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_rejects_malformed_package() {
        let toml = r#"
            [submission]
            package = "a..b"
            files = ["Adder.java"]
        "#;
        let err = GraderConfig::parse(toml).unwrap_err();
        assert!(err.to_string().contains("submission.package"));
    }

    #[test]
    fn test_validation_rejects_empty_files() {
        let toml = r#"
            [submission]
            package = "student"
            files = []
        "#;
        assert!(matches!(
            GraderConfig::parse(toml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validation_rejects_malformed_target() {
        let toml = format!(
            "{MINIMAL}\n[crosstests]\ntests = [\"AdderTest.java\"]\n\
             packages = [\"ok\", \"not ok\"]\n"
        );
        let err = GraderConfig::parse(&toml).unwrap_err();
        assert!(err.to_string().contains("crosstests.packages[1]"));
    }

    #[test]
    fn test_validation_rejects_duplicate_targets() {
        let toml = format!(
            "{MINIMAL}\n[crosstests]\ntests = [\"AdderTest.java\"]\npackages = [\"x.y\", \"x.y\"]\n"
        );
        let err = GraderConfig::parse(&toml).unwrap_err();
        assert!(err.to_string().contains("duplicates"));
    }

    #[test]
    fn test_validation_rejects_empty_cross_tests() {
        let toml = format!("{MINIMAL}\n[crosstests]\ntests = []\npackages = [\"x\"]\n");
        assert!(GraderConfig::parse(&toml).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_log_level() {
        let toml = format!("{MINIMAL}\n[logging]\nlevel = \"loud\"\n");
        assert!(GraderConfig::parse(&toml).is_err());
    }

    #[test]
    fn test_validation_rejects_working_dir_escaping_root() {
        for dir in [".", "..", "./", "work/../..", "/", "/tmp/working"] {
            let toml = format!("{MINIMAL}\n[project]\nworking_dir = {dir:?}\n");
            let err = GraderConfig::parse(&toml).unwrap_err();
            assert!(
                err.to_string().contains("project.working_dir"),
                "{dir:?} accepted: {err}"
            );
        }
    }

    #[test]
    fn test_validation_rejects_source_dir_escaping_working_dir() {
        for dir in [".", "..", "../src", "/src"] {
            let toml = format!("{MINIMAL}\n[project]\nsource_dir = {dir:?}\n");
            let err = GraderConfig::parse(&toml).unwrap_err();
            assert!(
                err.to_string().contains("project.source_dir"),
                "{dir:?} accepted: {err}"
            );
        }
    }

    #[test]
    fn test_validation_accepts_nested_relative_dirs() {
        let toml = format!(
            "{MINIMAL}\n[project]\nworking_dir = \"build/working/\"\n\
             source_dir = \"src/main/java\"\n"
        );
        let config = GraderConfig::parse(&toml).unwrap();
        assert_eq!(config.project.working_dir, "build/working/");
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = GraderConfig::new("student", vec!["Adder.java".to_string()]);
        let text = toml::to_string_pretty(&config).unwrap();
        let reparsed = GraderConfig::parse(&text).unwrap();
        assert_eq!(reparsed.origin_namespace(), "student");
        assert!(reparsed.crosstests.is_none());
    }

    // ── Async file-based loading ──────────────────────────────────────

    #[test_log::test(tokio::test)]
    async fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        tokio::fs::write(&path, MINIMAL).await.unwrap();

        let config = GraderConfig::load(&path).await.unwrap();
        assert_eq!(config.origin_namespace(), "student");
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = GraderConfig::load(Path::new("/nonexistent/config.toml")).await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("bad value".to_string());
        assert_eq!(err.to_string(), "validation error: bad value");
    }
}
