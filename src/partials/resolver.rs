//! Single-file partial resolution.
//!
//! Turns one template path into the identifier other templates use to include
//! it, and reads its text.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::PartialError;
use crate::constants::DEFAULT_TEMPLATE_EXTENSIONS;

/// A resolved partial: the identifier templates refer to it by and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPartial {
    /// Flattened, underscore-joined name
    pub identifier: String,
    /// Full UTF-8 text of the file
    pub content: String,
}

/// Resolves template files into [`ResolvedPartial`]s.
///
/// Paths handed to [`resolve`](Self::resolve) are interpreted relative to the
/// resolver's root, which is normally the project directory. Identifiers are
/// derived from the path text exactly as given, so callers should pass the
/// same relative form the glob pattern was written in.
#[derive(Debug, Clone)]
pub struct PartialResolver {
    root: PathBuf,
    extensions: Vec<String>,
}

impl PartialResolver {
    /// Creates a resolver rooted at `root` that recognizes the default
    /// template extensions (`mustache`, `tmpl`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_TEMPLATE_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect(),
        }
    }

    /// Replaces the recognized extensions. Leading dots are ignored, so
    /// `".tmpl"` and `"tmpl"` are equivalent.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    /// Directory relative paths are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Recognized template extensions, without dots.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Returns `path` with its template extension removed, or `None` if the
    /// path does not end in a recognized extension.
    pub fn strip_template_extension<'a>(&self, path: &'a str) -> Option<&'a str> {
        self.extensions.iter().find_map(|ext| {
            path.strip_suffix(ext.as_str()).and_then(|rest| rest.strip_suffix('.'))
        })
    }

    /// Derives the identifier for `path` without reading it.
    ///
    /// 1. Strip the template extension.
    /// 2. Remove the first occurrence of `prefix`, wherever it appears.
    /// 3. Replace every path separator with `_`.
    /// 4. Drop exactly one leading `_`.
    ///
    /// # Errors
    ///
    /// [`PartialError::InvalidFileKind`] if the extension is not recognized or
    /// the derived identifier is empty.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use assetpipe::partials::PartialResolver;
    /// use std::path::Path;
    ///
    /// let resolver = PartialResolver::new(".");
    /// let name = resolver
    ///     .derive_identifier(Path::new("src/templates/partials/nav/_item.mustache"), "src/templates/partials/")
    ///     .unwrap();
    /// assert_eq!(name, "nav__item");
    /// ```
    pub fn derive_identifier(&self, path: &Path, prefix: &str) -> Result<String, PartialError> {
        let invalid = || PartialError::InvalidFileKind {
            path: path.to_path_buf(),
        };

        let path_text = path_to_slash(path);
        let stem = self.strip_template_extension(&path_text).ok_or_else(invalid)?;
        let identifier = flatten_identifier(stem, prefix);

        if identifier.is_empty() {
            return Err(invalid());
        }
        Ok(identifier)
    }

    /// Resolves a template file into its identifier and content.
    ///
    /// The extension is checked before the file is touched, so a non-template
    /// path fails with [`PartialError::InvalidFileKind`] even if it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// - [`PartialError::InvalidFileKind`] for an unrecognized extension
    /// - [`PartialError::ReadFailure`] if the file cannot be read as UTF-8 text
    pub async fn resolve(&self, path: &Path, prefix: &str) -> Result<ResolvedPartial, PartialError> {
        let identifier = self.derive_identifier(path, prefix)?;

        let content = tokio::fs::read_to_string(self.root.join(path)).await.map_err(|source| {
            PartialError::ReadFailure {
                path: path.to_path_buf(),
                source,
            }
        })?;

        debug!("Resolved partial '{}' from {}", identifier, path.display());
        Ok(ResolvedPartial {
            identifier,
            content,
        })
    }
}

/// Applies steps 2-4 of identifier derivation to an extension-less path.
///
/// The prefix is removed at its first occurrence anywhere in the text, not
/// only as a leading anchor. Separator replacement runs after the removal so
/// separators that become adjacent are still flattened.
pub fn flatten_identifier(stem: &str, prefix: &str) -> String {
    let without_prefix = if prefix.is_empty() {
        stem.to_string()
    } else {
        stem.replacen(prefix, "", 1)
    };

    let mut identifier = without_prefix;
    while identifier.contains(is_path_separator) {
        identifier = identifier.replace(is_path_separator, "_");
    }

    strip_leading_underscore(&identifier).to_string()
}

/// Removes exactly one leading underscore, if present.
pub fn strip_leading_underscore(identifier: &str) -> &str {
    identifier.strip_prefix('_').unwrap_or(identifier)
}

fn is_path_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Path text with `/` separators on every platform, so prefixes written in
/// configuration files line up with matched paths.
fn path_to_slash(path: &Path) -> String {
    let text = path.to_string_lossy();
    if cfg!(windows) {
        text.replace('\\', "/")
    } else {
        text.into_owned()
    }
}
