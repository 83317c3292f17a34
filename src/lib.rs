//! assetpipe - a static asset build pipeline
//!
//! Copies stylesheets, fonts and images into a build directory, bundles
//! scripts into a single file and renders templates against a set of
//! partials loaded from glob patterns.
//!
//! # Architecture Overview
//!
//! - `assetpipe.toml` describes source globs and build directories
//! - Tasks form an explicit graph: `default` requires `clean` and every
//!   asset task, and each asset task is ordered after its clean task
//! - A scheduler runs the tasks of each plan level concurrently and stops at
//!   the first failing level
//!
//! # Core Modules
//!
//! - [`config`] - `assetpipe.toml` loading, discovery and validation
//! - [`pattern`] - glob matching and literal prefix extraction
//! - [`partials`] - partial naming and glob aggregation into a [`partials::PartialSet`]
//! - [`templating`] - Tera rendering with `{{> name }}` partial tags
//! - [`tasks`] - asset tasks, the task graph and the scheduler
//! - [`cli`] - command-line interface
//!
//! ## Supporting Modules
//! - [`core`] - error types and user-facing error formatting
//! - [`utils`] - file system helpers and progress indicators
//! - [`constants`] - defaults and environment variable names
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Clean, then build everything
//! assetpipe build
//!
//! # Show what would run for the templates task
//! assetpipe build templates --dry-run
//!
//! # List partials as JSON
//! assetpipe partials --format json
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod partials;
pub mod pattern;
pub mod tasks;
pub mod templating;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
