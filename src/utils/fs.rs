//! File system helpers used by the build tasks.
//!
//! Writes go through [`atomic_write`] so a build output is either the old file
//! or the complete new one. Bulk copies run on the blocking pool via
//! [`copy_files_parallel`].

use anyhow::{Context, Result};
use futures::future::try_join_all;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;

/// Creates `path` and all missing parents.
///
/// # Errors
///
/// Fails when the directory cannot be created or `path` exists as a file.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| {
            format!(
                "Failed to create directory: {}\n\nCheck directory permissions and path validity",
                path.display()
            )
        })?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// The content goes to a uniquely named temp file in the same directory, is
/// synced to disk and then renamed over `path`, so concurrent writers never
/// share a temp file. Parent directories are created as needed.
///
/// # Examples
///
/// ```rust,no_run
/// use assetpipe::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// atomic_write(Path::new("build/js/app.js"), b"console.log(1)")?;
/// # Ok(())
/// # }
/// ```
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;

    let mut file = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write temp file for: {}", path.display()))?;

    file.as_file().sync_all().with_context(|| "Failed to sync file to disk")?;

    file.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Removes a directory tree if it exists.
///
/// Returns whether anything was removed.
pub fn remove_dir_if_exists(path: &Path) -> Result<bool> {
    if !path.exists() {
        debug!("Nothing to remove at {}", path.display());
        return Ok(false);
    }

    fs::remove_dir_all(path)
        .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    Ok(true)
}

/// Removes every file under `dir` whose extension equals `extension`.
///
/// Directories are left in place. A missing `dir` removes nothing.
///
/// # Returns
///
/// The removed paths, sorted.
pub fn remove_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut removed = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk directory: {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == extension) {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove file: {}", path.display()))?;
            removed.push(path.to_path_buf());
        }
    }

    Ok(removed)
}

/// Copies many files concurrently, creating destination directories.
///
/// Every copy is attempted; failures are collected and reported together.
///
/// # Errors
///
/// Lists each failed copy when at least one fails.
pub async fn copy_files_parallel(sources_and_destinations: &[(PathBuf, PathBuf)]) -> Result<()> {
    if sources_and_destinations.is_empty() {
        return Ok(());
    }

    let mut tasks = Vec::with_capacity(sources_and_destinations.len());

    for (src, dst) in sources_and_destinations {
        let src = src.clone();
        let dst = dst.clone();
        let task = tokio::task::spawn_blocking(move || {
            if let Some(parent) = dst.parent() {
                ensure_dir(parent)?;
            }

            fs::copy(&src, &dst).with_context(|| {
                format!("Failed to copy file from {} to {}", src.display(), dst.display())
            })?;

            Ok::<_, anyhow::Error>(())
        });
        tasks.push(task);
    }

    let results = try_join_all(tasks).await.context("Failed to join file copy tasks")?;

    let errors: Vec<String> =
        results.into_iter().filter_map(Result::err).map(|error| format!("  {error:#}")).collect();

    if !errors.is_empty() {
        return Err(anyhow::anyhow!(
            "Failed to copy {} files:\n{}",
            errors.len(),
            errors.join("\n")
        ));
    }

    Ok(())
}

/// Reads several text files concurrently, preserving input order.
pub async fn read_files_parallel(paths: &[PathBuf]) -> Result<Vec<String>> {
    let reads = paths.iter().map(|path| async move {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    });
    try_join_all(reads).await
}
