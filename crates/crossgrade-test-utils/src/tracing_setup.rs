//! Tracing initialisation helpers for tests.
//!
//! Call [`init_test_tracing`] at the top of any test that wants staging and
//! repackaging events captured by the test harness. The subscriber is
//! installed at most once per process.

use tracing_subscriber::EnvFilter;

/// Initialise a tracing subscriber that writes to the test-harness writer
/// and respects the `RUST_LOG` environment variable (default `debug` for the
/// crossgrade crates, `warn` elsewhere).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("warn,crossgrade_core=debug,crossgrade_config=debug")
        }))
        .with_test_writer()
        .try_init();
}
