//! Command-line interface for assetpipe.
//!
//! # Available Commands
//!
//! - `build [TASK...]` - run tasks and everything they require (default: `default`)
//! - `clean [KIND]` - remove build output, for one asset kind or all of them
//! - `tasks` - list every task with its dependencies
//! - `partials` - show the partial names templates can include
//!
//! # Global Options
//!
//! - `--verbose` - enable debug output
//! - `--quiet` - only warnings and errors
//! - `--no-progress` - disable progress bars and spinners
//! - `--config` - path to `assetpipe.toml` (also `ASSETPIPE_CONFIG`)
//!
//! # Example
//!
//! ```bash
//! # Full build: clean, then every asset task
//! assetpipe build
//!
//! # Only rebuild stylesheets and pages
//! assetpipe build styles templates
//!
//! # Remove rendered pages
//! assetpipe clean templates
//! ```

mod build;
mod clean;
pub mod common;
mod partials;
mod tasks;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::CONFIG_ENV;

/// Runtime configuration for CLI execution.
///
/// Carries the global flags into every command so they can be injected in
/// tests instead of being read from process state.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: Option<String>,

    /// Whether to disable progress indicators.
    pub no_progress: bool,

    /// Explicit configuration file, relative to the working directory.
    pub config_path: Option<PathBuf>,

    /// Directory configuration discovery starts from. `None` means the
    /// process working directory.
    pub working_dir: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether progress output should be shown.
    pub const fn show_progress(&self) -> bool {
        !self.no_progress
    }
}

/// Static asset build pipeline.
#[derive(Parser, Debug)]
#[command(
    name = "assetpipe",
    about = "Build static site assets: styles, scripts, images, fonts and templates",
    version,
    long_about = "assetpipe copies styles, fonts and images, bundles scripts and renders templates \
                  with partials into a build directory, as described by assetpipe.toml."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to assetpipe.toml instead of searching parent directories
    #[arg(short, long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Disable progress bars and spinners
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run build tasks and their dependencies.
    Build(build::BuildCommand),

    /// Remove build output.
    Clean(clean::CleanCommand),

    /// List tasks and what they depend on.
    Tasks(tasks::TasksCommand),

    /// List the partials available to templates.
    Partials(partials::PartialsCommand),
}

impl Cli {
    /// Execute the CLI with configuration built from the parsed flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translates global flags into a [`CliConfig`].
    ///
    /// - `--verbose` → `debug`
    /// - `--quiet` → `warn`
    /// - otherwise `info`
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            no_progress: self.no_progress || self.quiet,
            config_path: self.config.clone(),
            working_dir: None,
        }
    }

    /// Execute the CLI with an injected configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Build(cmd) => cmd.execute(&config).await,
            Commands::Clean(cmd) => cmd.execute(&config).await,
            Commands::Tasks(cmd) => cmd.execute(&config),
            Commands::Partials(cmd) => cmd.execute(&config).await,
        }
    }
}
