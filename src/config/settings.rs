use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::constants::{
    DEFAULT_BUNDLE_NAME, DEFAULT_BUNDLE_SEPARATOR, DEFAULT_OUTPUT_EXTENSION,
    DEFAULT_TEMPLATE_EXTENSIONS,
};
use crate::core::PipelineError;
use crate::partials::PartialResolver;
use crate::pattern::validate_pattern_safety;

/// Immutable build configuration shared by every task.
///
/// Loaded once per run, either from `assetpipe.toml` or from the built-in
/// defaults, and passed by reference afterwards. All relative paths are
/// resolved against [`root`](Self::root), the directory holding the config
/// file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Source glob patterns, one list per asset kind
    pub src: SourcePaths,
    /// Output directories, one per asset kind
    pub build: BuildPaths,
    /// Template rendering settings
    pub templates: TemplateSettings,
    /// Script bundling settings
    pub scripts: ScriptSettings,
    #[serde(skip)]
    root: PathBuf,
}

/// `[src]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcePaths {
    pub scripts: Vec<String>,
    pub styles: Vec<String>,
    pub images: Vec<String>,
    pub fonts: Vec<String>,
    /// Top-level templates, each rendered to one output page
    pub templates: Vec<String>,
    /// Partials available by name to every top-level template
    pub partials: Vec<String>,
}

/// `[build]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildPaths {
    pub scripts: PathBuf,
    pub styles: PathBuf,
    pub images: PathBuf,
    pub fonts: PathBuf,
    pub templates: PathBuf,
}

/// `[templates]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateSettings {
    /// Extensions recognized as template files, without the dot
    pub extensions: Vec<String>,
    /// Extension given to rendered pages
    pub output_extension: String,
    /// Context available to every rendered template
    pub data: toml::Table,
}

/// `[scripts]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptSettings {
    /// File name of the concatenated bundle inside `build.scripts`
    pub bundle_name: String,
    /// Text inserted between concatenated scripts
    pub separator: String,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            scripts: strings(&[
                "src/bower_components/modernizr/modernizr.js",
                "src/bower_components/jquery/dist/jquery.min.js",
                "src/bower_components/fastclick/lib/fastclick.js",
                "src/bower_components/jquery.cookie/jquery.cookie.js",
                "src/bower_components/jquery-placeholder/jquery.placeholder.js",
                "src/bower_components/foundation/js/foundation.min.js",
                "src/scripts/**/*.js",
            ]),
            styles: strings(&["src/styles/**/*.{css,scss}"]),
            images: strings(&["src/images/**/*.{png,jpg,jpeg,gif}"]),
            fonts: strings(&[
                "src/fonts/**/*",
                "src/bower_components/font-awesome/fonts/*.{eot,svg,ttf,woff,otf}",
            ]),
            templates: strings(&["src/templates/*.mustache"]),
            partials: strings(&[
                "src/templates/partials/**/*.mustache",
                "src/templates/layout/**/*.mustache",
            ]),
        }
    }
}

impl Default for BuildPaths {
    fn default() -> Self {
        Self {
            scripts: PathBuf::from("build/scripts"),
            styles: PathBuf::from("build/styles"),
            images: PathBuf::from("build/images"),
            fonts: PathBuf::from("build/fonts"),
            templates: PathBuf::from("build"),
        }
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            extensions: strings(DEFAULT_TEMPLATE_EXTENSIONS),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            data: toml::Table::new(),
        }
    }
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            bundle_name: DEFAULT_BUNDLE_NAME.to_string(),
            separator: DEFAULT_BUNDLE_SEPARATOR.to_string(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            src: SourcePaths::default(),
            build: BuildPaths::default(),
            templates: TemplateSettings::default(),
            scripts: ScriptSettings::default(),
            root: PathBuf::from("."),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

impl BuildConfig {
    /// Built-in defaults rooted at `root`.
    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self::default().with_root(root)
    }

    /// Returns the same configuration resolved against a different root.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Project directory every relative path is resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins a configured relative path onto the project root.
    pub fn resolve_path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Resolver reading partials below the project root with the configured
    /// template extensions.
    pub fn partial_resolver(&self) -> PartialResolver {
        PartialResolver::new(&self.root).with_extensions(self.templates.extensions.iter())
    }

    /// Every `(section, patterns)` source list, in a fixed order.
    pub fn source_lists(&self) -> [(&'static str, &[String]); 6] {
        [
            ("src.scripts", &self.src.scripts),
            ("src.styles", &self.src.styles),
            ("src.images", &self.src.images),
            ("src.fonts", &self.src.fonts),
            ("src.templates", &self.src.templates),
            ("src.partials", &self.src.partials),
        ]
    }

    /// Every `(section, directory)` build output, in a fixed order.
    pub fn build_dirs(&self) -> [(&'static str, &Path); 5] {
        [
            ("build.scripts", &self.build.scripts),
            ("build.styles", &self.build.styles),
            ("build.images", &self.build.images),
            ("build.fonts", &self.build.fonts),
            ("build.templates", &self.build.templates),
        ]
    }

    /// Rejects values that would make the build read or write outside the
    /// project, or that leave a task with nothing sensible to do.
    ///
    /// # Errors
    ///
    /// [`PipelineError::ConfigValidationError`] naming the first bad value.
    pub fn validate(&self) -> Result<(), PipelineError> {
        for (section, patterns) in self.source_lists() {
            for pattern in patterns {
                validate_pattern_safety(pattern).map_err(|e| invalid(format!("{section}: {e}")))?;
            }
        }

        for (section, dir) in self.build_dirs() {
            if !is_contained_relative(dir) {
                return Err(invalid(format!(
                    "{section} must be a relative path inside the project: {}",
                    dir.display()
                )));
            }
        }

        if self.templates.extensions.iter().all(|ext| ext.trim_start_matches('.').is_empty()) {
            return Err(invalid("templates.extensions must name at least one extension".to_string()));
        }

        let output_extension = self.templates.output_extension.as_str();
        if output_extension.is_empty() || output_extension.contains(['/', '\\', '.']) {
            return Err(invalid(format!(
                "templates.output_extension must be a bare extension such as \"html\": {output_extension:?}"
            )));
        }

        let bundle_name = self.scripts.bundle_name.as_str();
        if bundle_name.is_empty() || bundle_name.contains(['/', '\\']) || bundle_name == ".." {
            return Err(invalid(format!(
                "scripts.bundle_name must be a plain file name: {bundle_name:?}"
            )));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> PipelineError {
    PipelineError::ConfigValidationError {
        reason,
    }
}

fn is_contained_relative(path: &Path) -> bool {
    path.components().all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}
