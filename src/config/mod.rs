//! Build configuration for assetpipe
//!
//! A project is described by `assetpipe.toml` at its root. Every table is
//! optional and every missing key falls back to the built-in default, so an
//! empty file (or no file at all) describes the conventional layout:
//!
//! ```toml
//! [src]
//! styles    = ["src/styles/**/*.{css,scss}"]
//! templates = ["src/templates/*.mustache"]
//! partials  = ["src/templates/partials/**/*.mustache", "src/templates/layout/**/*.mustache"]
//!
//! [build]
//! styles    = "build/styles"
//! templates = "build"
//!
//! [templates]
//! extensions       = ["mustache", "tmpl"]
//! output_extension = "html"
//!
//! [templates.data]
//! title = "My site"
//!
//! [scripts]
//! bundle_name = "app.js"
//! separator   = ";\n"
//! ```
//!
//! # Discovery
//!
//! 1. An explicit path (`--config` or `ASSETPIPE_CONFIG`) must exist
//! 2. Otherwise `assetpipe.toml` is searched for from the working directory
//!    upwards
//! 3. If none is found the defaults apply, rooted at the working directory
//!
//! The loaded [`BuildConfig`] is validated once and never mutated afterwards.

mod settings;

pub use settings::{BuildConfig, BuildPaths, ScriptSettings, SourcePaths, TemplateSettings};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::CONFIG_FILE_NAME;
use crate::core::PipelineError;

impl BuildConfig {
    /// Parses and validates the configuration file at `path`.
    ///
    /// The directory containing the file becomes the project root.
    ///
    /// # Errors
    ///
    /// - the file cannot be read
    /// - [`PipelineError::ConfigParseError`] for invalid TOML or unknown keys
    /// - [`PipelineError::ConfigValidationError`] for unsafe values
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| PipelineError::ConfigParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let config = config.with_root(root);
        config.validate()?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolves the configuration for a run started in `start_dir`.
    ///
    /// See the [module documentation](self) for the lookup order.
    ///
    /// # Errors
    ///
    /// [`PipelineError::ConfigNotFound`] when `explicit_path` does not exist,
    /// plus everything [`load`](Self::load) can return.
    pub fn discover(explicit_path: Option<&Path>, start_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit_path {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                start_dir.join(path)
            };

            if !path.is_file() {
                return Err(PipelineError::ConfigNotFound {
                    path: path.display().to_string(),
                }
                .into());
            }
            return Self::load(&path);
        }

        match find_config_from(start_dir) {
            Some(path) => Self::load(&path),
            None => {
                info!(
                    "No {} found, using built-in defaults rooted at {}",
                    CONFIG_FILE_NAME,
                    start_dir.display()
                );
                Ok(Self::with_defaults(start_dir))
            }
        }
    }
}

/// Searches `start` and its ancestors for `assetpipe.toml`.
///
/// # Examples
///
/// ```rust,no_run
/// use assetpipe::config::find_config_from;
/// use std::path::Path;
///
/// if let Some(path) = find_config_from(Path::new("/home/user/site/src/styles")) {
///     println!("Using {}", path.display());
/// }
/// ```
pub fn find_config_from(start: &Path) -> Option<PathBuf> {
    start.ancestors().map(|dir| dir.join(CONFIG_FILE_NAME)).find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = BuildConfig::discover(None, temp.path()).unwrap();

        assert_eq!(config.root(), temp.path());
        assert_eq!(config.src, SourcePaths::default());
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let temp = TempDir::new().unwrap();
        let err = BuildConfig::discover(Some(Path::new("nope.toml")), temp.path()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_discovery_walks_up() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[build]\nstyles = \"public/css\"\n",
        )
        .unwrap();
        let nested = temp.path().join("src/styles");
        fs::create_dir_all(&nested).unwrap();

        let config = BuildConfig::discover(None, &nested).unwrap();

        assert_eq!(config.root(), temp.path());
        assert_eq!(config.build.styles, PathBuf::from("public/css"));
        assert_eq!(config.build.fonts, PathBuf::from("build/fonts"));
    }

    #[test]
    fn test_partial_tables_keep_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
[templates]
extensions = ["hbs"]

[templates.data]
title = "Docs"
"#,
        )
        .unwrap();

        let config = BuildConfig::load(&path).unwrap();
        assert_eq!(config.templates.extensions, vec!["hbs"]);
        assert_eq!(config.templates.output_extension, "html");
        assert_eq!(config.templates.data.get("title").and_then(|v| v.as_str()), Some("Docs"));
        assert_eq!(config.scripts, ScriptSettings::default());
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[src]\nstylez = [\"a/*.css\"]\n").unwrap();

        let err = BuildConfig::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[build]\nscripts = \"/var/www/js\"\n").unwrap();

        let err = BuildConfig::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_find_config_from_none() {
        let temp = TempDir::new().unwrap();
        // A temp dir's ancestors normally have no assetpipe.toml.
        let found = find_config_from(temp.path());
        assert!(found.is_none_or(|path| !path.starts_with(temp.path())));
    }
}
