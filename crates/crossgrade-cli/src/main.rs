#![deny(unsafe_code)]

//! crossgrade CLI: stage a submission, cross-test it, run the build, report.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossgrade_config::{ConfigError, GraderConfig};
use crossgrade_core::{Grader, Reporter};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// crossgrade: an autograder that can run each submission's tests against
/// every other submission's code.
#[derive(Parser)]
#[command(name = "crossgrade", version, about, long_about = None)]
struct Cli {
    /// Path to the grading configuration, relative to the root.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Grader root holding the scaffold, submissions, and working tree.
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage, repackage, build, and report the result.
    Run {
        /// Submission directory, relative to the root or to `submissions/`.
        submission: Option<String>,

        /// Also write the result to this file.
        #[arg(long)]
        results_file: Option<PathBuf>,
    },

    /// Stage and repackage without running the build.
    Stage {
        /// Submission directory, relative to the root or to `submissions/`.
        submission: Option<String>,
    },

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.root.join(&cli.config);
    let config = GraderConfig::load(&config_path).await;

    // -v flags win over the configured level; RUST_LOG wins over both.
    let filter = match cli.verbose {
        0 => config
            .as_ref()
            .map(|c| c.logging.level.clone())
            .unwrap_or_else(|_| "info".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            submission,
            results_file,
        } => cmd_run(&cli.root, config, submission.as_deref(), results_file).await?,
        Commands::Stage { submission } => cmd_stage(&cli.root, config?, submission.as_deref())?,
        Commands::Config { show } => cmd_config(&config_path, config?, show)?,
    }

    Ok(())
}

/// Grade a submission. Failures are reported as a zero-score payload rather
/// than a non-zero exit, so the results file is always written.
async fn cmd_run(
    root: &Path,
    config: Result<GraderConfig, ConfigError>,
    submission: Option<&str>,
    results_file: Option<PathBuf>,
) -> Result<()> {
    let results_file = results_file.or_else(|| {
        config
            .as_ref()
            .ok()
            .and_then(|c| c.output.results_file.as_deref())
            .map(|p| root.join(p))
    });
    let reporter = Reporter::new(results_file);
    if let Some(path) = reporter.results_file() {
        debug!(path = %path.display(), "Results will also be written to file");
    }

    let outcome = match config {
        Ok(config) => Grader::new(config, root)
            .run(submission)
            .await
            .map_err(anyhow::Error::from),
        Err(e) => Err(anyhow::Error::from(e)),
    };

    let mut stdout = std::io::stdout().lock();
    match outcome {
        Ok(output) => {
            if !output.stderr.is_empty() {
                debug!(stderr = %output.stderr.trim_end(), "Build tool stderr");
            }
            info!(
                elapsed_ms = output.elapsed.as_millis() as u64,
                "Grading run completed"
            );
            reporter.success(&mut stdout, &output.stdout)?;
        }
        Err(e) => {
            error!(error = %e, "Grading run failed");
            reporter.failure(&mut stdout, &e)?;
        }
    }
    Ok(())
}

fn cmd_stage(root: &Path, config: GraderConfig, submission: Option<&str>) -> Result<()> {
    let report = Grader::new(config, root).stage(submission)?;
    println!("Staged {} into {}", report.submission_dir.display(), report.origin_dir.display());
    for copy in &report.repackaged {
        println!("  {} -> {} ({})", copy.test_file, copy.target, copy.path.display());
    }
    Ok(())
}

fn cmd_config(config_path: &Path, config: GraderConfig, show: bool) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(&config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}
