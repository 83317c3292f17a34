//! Shared helpers for CLI commands

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::CliConfig;
use crate::config::BuildConfig;

/// Output format for listing commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON for scripts
    Json,
}

/// Directory discovery starts from.
pub fn working_dir(cli: &CliConfig) -> Result<PathBuf> {
    match &cli.working_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().context(
            "Cannot determine current working directory. This may indicate a permission issue",
        ),
    }
}

/// Loads the build configuration for a command.
pub fn load_build_config(cli: &CliConfig) -> Result<BuildConfig> {
    let start = working_dir(cli)?;
    BuildConfig::discover(cli.config_path.as_deref(), &start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_build_config_from_injected_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("assetpipe.toml"), "[scripts]\nbundle_name = \"site.js\"\n")
            .unwrap();

        let cli = CliConfig {
            working_dir: Some(temp.path().to_path_buf()),
            ..CliConfig::default()
        };

        let config = load_build_config(&cli).unwrap();
        assert_eq!(config.scripts.bundle_name, "site.js");
        assert_eq!(config.root(), temp.path());
    }
}
