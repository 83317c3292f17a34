//! Common test utilities for assetpipe integration tests

// Not every helper is used by every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Throwaway site directory with helpers to run the binary inside it
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
}

impl TestProject {
    /// Create an empty project directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("site");
        fs::create_dir_all(&project_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// Get the project directory path
    pub fn path(&self) -> &Path {
        &self.project_dir
    }

    /// Write a file below the project, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> Result<()> {
        let path = self.project_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Write `assetpipe.toml` at the project root
    pub fn write_config(&self, content: &str) -> Result<()> {
        self.write("assetpipe.toml", content)
    }

    /// Read a file below the project
    pub fn read(&self, relative: &str) -> String {
        let path = self.project_dir.join(relative);
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
    }

    /// Whether a path below the project exists
    pub fn exists(&self, relative: &str) -> bool {
        self.project_dir.join(relative).exists()
    }

    /// A command for the binary running in the project directory
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("assetpipe").unwrap();
        cmd.current_dir(&self.project_dir)
            .env_remove("ASSETPIPE_CONFIG")
            .env_remove("RUST_LOG")
            .env("ASSETPIPE_NO_PROGRESS", "1")
            .env("NO_COLOR", "1");
        cmd
    }

    /// Populate a site with one file for every asset kind
    pub fn create_standard_site(&self) -> Result<()> {
        self.write("src/styles/site.css", "body { margin: 0; }")?;
        self.write("src/styles/admin/panel.scss", "$gap: 4px;")?;
        self.write("src/fonts/icons.woff", "woff")?;
        self.write("src/images/logo.png", "png")?;
        self.write("src/scripts/nav.js", "nav()")?;
        self.write("src/scripts/app/main.js", "main()")?;
        self.write("src/templates/partials/header.mustache", "<header>{{ site }}</header>")?;
        self.write("src/templates/layout/footer.mustache", "<footer></footer>")?;
        self.write("src/templates/index.mustache", "{{> header }}<main>{{ title }}</main>{{> footer }}")?;
        self.write_config("[templates.data]\nsite = \"Demo\"\ntitle = \"Home\"\n")?;
        Ok(())
    }
}
