//! Test utilities for assetpipe
//!
//! Helpers shared by unit tests and the integration suite: one-time logging
//! setup and [`SiteFixture`], a throwaway project directory.
//!
//! # Example
//!
//! ```rust,no_run
//! use assetpipe::test_utils::SiteFixture;
//!
//! let site = SiteFixture::new().unwrap();
//! site.write("src/templates/index.mustache", "{{> header }}").unwrap();
//! let config = site.config();
//! assert_eq!(config.root(), site.path());
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::BuildConfig;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses the given level, or `RUST_LOG` when `level` is `None`. Without
/// either nothing is installed. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// A temporary site directory that is removed on drop.
pub struct SiteFixture {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl SiteFixture {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary site directory")?;
        let root = temp_dir.path().to_path_buf();
        Ok(Self {
            _temp_dir: temp_dir,
            root,
        })
    }

    /// Site root.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write `content` at `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Read a file below the site root.
    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.root.join(relative);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Whether `relative` exists below the site root.
    pub fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }

    /// Default configuration rooted at this site.
    pub fn config(&self) -> BuildConfig {
        BuildConfig::with_defaults(&self.root)
    }
}
