//! The work behind each task.
//!
//! Copy tasks keep every file's path below its pattern's glob base, so
//! `src/styles/**/*.css` copies `src/styles/admin/site.css` to
//! `<build.styles>/admin/site.css`. When several patterns match the same file
//! the first pattern decides.

use anyhow::{Context, Result};
use futures::future::try_join_all;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{AssetKind, Task};
use crate::config::BuildConfig;
use crate::core::PipelineError;
use crate::partials::GlobAggregator;
use crate::pattern::PatternMatcher;
use crate::templating::TemplateRenderer;
use crate::utils::fs::{
    atomic_write, copy_files_parallel, read_files_parallel, remove_dir_if_exists,
    remove_files_with_extension,
};

/// A file matched by a source pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the project root
    pub path: PathBuf,
    /// Glob base of the pattern that matched it
    pub base: PathBuf,
}

impl SourceFile {
    /// Path below the glob base, used to place the file in a build directory.
    pub fn relative_to_base(&self) -> &Path {
        self.path.strip_prefix(&self.base).unwrap_or(&self.path)
    }
}

/// What a finished task did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Files copied into a build directory
    Copied {
        files: usize,
    },
    /// Scripts concatenated into one bundle
    Bundled {
        files: usize,
        output: PathBuf,
    },
    /// Pages rendered
    Rendered {
        pages: usize,
        partials: usize,
    },
    /// Paths removed by a clean task
    Removed {
        paths: usize,
    },
    /// Aggregate task, nothing of its own to do
    Grouped,
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copied {
                files,
            } => write!(f, "copied {files} files"),
            Self::Bundled {
                files,
                output,
            } => write!(f, "bundled {files} scripts into {}", output.display()),
            Self::Rendered {
                pages,
                partials,
            } => write!(f, "rendered {pages} pages with {partials} partials"),
            Self::Removed {
                paths,
            } => write!(f, "removed {paths} paths"),
            Self::Grouped => write!(f, "done"),
        }
    }
}

/// Expands `patterns` below the project root.
///
/// Patterns are expanded concurrently on the blocking pool; the result keeps
/// pattern order with each pattern's matches sorted, and lists every file
/// once.
///
/// # Errors
///
/// Invalid glob syntax or an unreadable directory.
pub async fn collect_sources(config: &BuildConfig, patterns: &[String]) -> Result<Vec<SourceFile>> {
    let expansions = patterns.iter().map(|pattern| {
        let root = config.root().to_path_buf();
        let pattern = pattern.clone();
        async move {
            let matcher = PatternMatcher::new(&pattern)?;
            let base = PathBuf::from(matcher.base());
            let files = tokio::task::spawn_blocking(move || matcher.find_matches(&root))
                .await
                .with_context(|| format!("Pattern expansion for '{pattern}' did not complete"))??;

            if files.is_empty() && !pattern.contains(crate::constants::WILDCARD_CHARS) {
                warn!("Source file not found: {}", pattern);
            }
            Ok::<_, anyhow::Error>((base, files))
        }
    });

    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for (base, files) in try_join_all(expansions).await? {
        for path in files {
            if seen.insert(path.clone()) {
                sources.push(SourceFile {
                    path,
                    base: base.clone(),
                });
            }
        }
    }

    debug!("{} patterns matched {} files", patterns.len(), sources.len());
    Ok(sources)
}

async fn copy_assets(config: &BuildConfig, patterns: &[String], out_dir: &Path) -> Result<TaskOutcome> {
    let sources = collect_sources(config, patterns).await?;
    let out_dir = config.resolve_path(out_dir);

    let pairs: Vec<(PathBuf, PathBuf)> = sources
        .iter()
        .map(|source| (config.resolve_path(&source.path), out_dir.join(source.relative_to_base())))
        .collect();

    copy_files_parallel(&pairs).await?;
    Ok(TaskOutcome::Copied {
        files: pairs.len(),
    })
}

/// Copies stylesheets into `build.styles`.
pub async fn build_styles(config: &BuildConfig) -> Result<TaskOutcome> {
    copy_assets(config, &config.src.styles, &config.build.styles).await
}

/// Copies fonts into `build.fonts`.
pub async fn build_fonts(config: &BuildConfig) -> Result<TaskOutcome> {
    copy_assets(config, &config.src.fonts, &config.build.fonts).await
}

/// Copies images into `build.images`.
pub async fn build_images(config: &BuildConfig) -> Result<TaskOutcome> {
    copy_assets(config, &config.src.images, &config.build.images).await
}

/// Concatenates every script into `build.scripts/<bundle_name>`.
///
/// Nothing is written when no script matches.
pub async fn build_scripts(config: &BuildConfig) -> Result<TaskOutcome> {
    let sources = collect_sources(config, &config.src.scripts).await?;
    let output = config.resolve_path(&config.build.scripts).join(&config.scripts.bundle_name);

    if sources.is_empty() {
        warn!("No scripts matched, {} not written", output.display());
        return Ok(TaskOutcome::Bundled {
            files: 0,
            output,
        });
    }

    let paths: Vec<PathBuf> = sources.iter().map(|source| config.resolve_path(&source.path)).collect();
    let contents = read_files_parallel(&paths).await?;
    let bundle = contents.join(&config.scripts.separator);

    let target = output.clone();
    tokio::task::spawn_blocking(move || atomic_write(&target, bundle.as_bytes()))
        .await
        .context("Script bundle write did not complete")??;

    Ok(TaskOutcome::Bundled {
        files: sources.len(),
        output,
    })
}

/// Renders every top-level template into `build.templates`.
///
/// Partials are aggregated first; any partial that fails to load stops the
/// task before a single page is written.
pub async fn build_templates(config: &BuildConfig) -> Result<TaskOutcome> {
    let aggregator = GlobAggregator::new(config.partial_resolver());
    let partials = aggregator
        .aggregate(&config.src.partials)
        .await
        .map_err(PipelineError::from)
        .context("Failed to load partials")?;

    let renderer = TemplateRenderer::new(&partials, &config.templates.data)?;

    let pages = collect_sources(config, &config.src.templates).await?;
    let paths: Vec<PathBuf> = pages.iter().map(|page| config.resolve_path(&page.path)).collect();
    let sources = read_files_parallel(&paths).await?;

    let out_dir = config.resolve_path(&config.build.templates);
    let mut outputs = Vec::with_capacity(pages.len());
    for (page, source) in pages.iter().zip(sources) {
        let name = page.path.to_string_lossy();
        let html = renderer.render(&name, &source)?;

        let relative = page.relative_to_base().with_extension(&config.templates.output_extension);
        debug!("Rendered {} -> {}", page.path.display(), relative.display());
        outputs.push((out_dir.join(relative), html));
    }

    let writes = outputs.into_iter().map(|(path, html)| {
        tokio::task::spawn_blocking(move || atomic_write(&path, html.as_bytes()))
    });
    for result in try_join_all(writes).await.context("Failed to join page write tasks")? {
        result?;
    }

    Ok(TaskOutcome::Rendered {
        pages: pages.len(),
        partials: partials.len(),
    })
}

/// Removes the build output of one asset kind.
///
/// Templates share their build directory with other output, so only
/// rendered pages (`*.<output_extension>`) are removed for them; every other
/// kind loses its whole directory.
pub async fn clean_kind(config: &BuildConfig, kind: AssetKind) -> Result<TaskOutcome> {
    let dir = config.resolve_path(match kind {
        AssetKind::Styles => &config.build.styles,
        AssetKind::Scripts => &config.build.scripts,
        AssetKind::Images => &config.build.images,
        AssetKind::Fonts => &config.build.fonts,
        AssetKind::Templates => &config.build.templates,
    });
    let extension = config.templates.output_extension.clone();

    let paths = tokio::task::spawn_blocking(move || -> Result<usize> {
        match kind {
            AssetKind::Templates => Ok(remove_files_with_extension(&dir, &extension)?.len()),
            _ => Ok(usize::from(remove_dir_if_exists(&dir)?)),
        }
    })
    .await
    .context("Clean task did not complete")??;

    Ok(TaskOutcome::Removed {
        paths,
    })
}

/// Runs one task to completion without its dependencies.
pub async fn run_task(config: &BuildConfig, task: Task) -> Result<TaskOutcome> {
    info!("Starting '{}'", task);

    let outcome = match task {
        Task::Build(AssetKind::Styles) => build_styles(config).await,
        Task::Build(AssetKind::Fonts) => build_fonts(config).await,
        Task::Build(AssetKind::Images) => build_images(config).await,
        Task::Build(AssetKind::Scripts) => build_scripts(config).await,
        Task::Build(AssetKind::Templates) => build_templates(config).await,
        Task::Clean(kind) => clean_kind(config, kind).await,
        Task::CleanAll | Task::Default => Ok(TaskOutcome::Grouped),
    }
    .with_context(|| format!("Task '{task}' failed"))?;

    info!("Finished '{}': {}", task, outcome);
    Ok(outcome)
}
