#![deny(unsafe_code)]

//! Shared test utilities for the crossgrade workspace.
//!
//! Provides config builders, on-disk fixtures, and tracing helpers so that
//! individual crate tests stay concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! crossgrade-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod fixture;
pub mod tracing_setup;
