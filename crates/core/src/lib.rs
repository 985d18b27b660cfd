//! Testbed Core Library
//!
//! Core library for the Testbed extension-testing orchestrator. It
//! provides the task composition and execution primitives plus the
//! concrete tasks that prepare a CMS site, control a Selenium server,
//! build and run Codeception suites, check code style and report
//! results.
//!
//! ## Architecture
//!
//! - [`orchestrator`] - High-level orchestration interface for the CLI
//! - [`execution`] - Command executor, ordered task runner, readiness polling
//! - [`tasks`] - Step providers for the concrete testing tasks
//! - [`config`] - Flat key/value configuration with typed coercion
//! - [`fsx`] - Filesystem helpers used by the task steps
//! - [`platform`] - OS detection utilities
//! - [`output`] - Colored terminal output for task progress
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! The primary entry point is the [`Orchestrator`]:
//!
//! ```rust,no_run
//! use testbed_core::orchestrator::{Orchestrator, OrchestratorConfig};
//! use std::path::PathBuf;
//!
//! # fn example() -> testbed_core::types::TestbedResult<()> {
//! let orchestrator = Orchestrator::new(OrchestratorConfig {
//!     base_path: PathBuf::from("."),
//!     config_file: None,
//! })?;
//!
//! orchestrator.run_selenium(false)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod execution;
pub mod fsx;
pub mod orchestrator;
pub mod output;
pub mod platform;
pub mod tasks;
pub mod types;

// Re-export the main types for easier usage
pub use orchestrator::{Orchestrator, OrchestratorConfig, RunOptions};
pub use types::{TestbedError, TestbedResult};
