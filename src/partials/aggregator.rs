//! Glob-driven aggregation of partials into a [`PartialSet`].

use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use super::{PartialError, PartialResolver, ResolvedPartial};
use crate::pattern::PatternMatcher;

/// Mapping from partial identifier to template text.
///
/// Built fresh by every [`GlobAggregator::aggregate`] call and handed whole to
/// the renderer. Inserting an identifier that is already present replaces
/// the earlier content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialSet {
    partials: BTreeMap<String, String>,
}

impl PartialSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a partial, returning the content it replaced.
    pub fn insert(&mut self, partial: ResolvedPartial) -> Option<String> {
        self.partials.insert(partial.identifier, partial.content)
    }

    /// Content of the partial named `identifier`.
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.partials.get(identifier).map(String::as_str)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.partials.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.partials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }

    /// Identifiers in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.partials.keys().map(String::as_str)
    }

    /// `(identifier, content)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.partials.iter().map(|(name, content)| (name.as_str(), content.as_str()))
    }
}

impl FromIterator<ResolvedPartial> for PartialSet {
    fn from_iter<I: IntoIterator<Item = ResolvedPartial>>(iter: I) -> Self {
        let mut set = Self::new();
        for partial in iter {
            set.insert(partial);
        }
        set
    }
}

impl IntoIterator for PartialSet {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.partials.into_iter()
    }
}

/// Expands glob patterns and resolves every match into one [`PartialSet`].
///
/// Each pattern is expanded on the blocking pool and its matches are read
/// concurrently; patterns do not wait on one another. The aggregate is
/// available only after every expansion and read has finished, and the
/// first failure anywhere discards everything collected so far.
///
/// Results are merged in pattern order, and in path order within a pattern,
/// so when two files flatten to the same identifier the one from the later
/// pattern wins.
///
/// # Examples
///
/// ```rust,no_run
/// use assetpipe::partials::{GlobAggregator, PartialResolver};
///
/// # async fn example() -> Result<(), assetpipe::partials::PartialError> {
/// let aggregator = GlobAggregator::new(PartialResolver::new("."));
/// let partials = aggregator
///     .aggregate(&["src/templates/partials/**/*.mustache", "src/templates/layout/**/*.mustache"])
///     .await?;
///
/// for name in partials.names() {
///     println!("{name}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GlobAggregator {
    resolver: Arc<PartialResolver>,
}

impl GlobAggregator {
    pub fn new(resolver: PartialResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    pub fn resolver(&self) -> &PartialResolver {
        &self.resolver
    }

    /// Builds the partial set for `patterns`.
    ///
    /// An empty pattern list yields an empty set.
    ///
    /// # Errors
    ///
    /// The first [`PartialError`] raised by any expansion or resolution.
    pub async fn aggregate<S: AsRef<str>>(&self, patterns: &[S]) -> Result<PartialSet, PartialError> {
        if patterns.is_empty() {
            return Ok(PartialSet::new());
        }

        let per_pattern = patterns.iter().map(|pattern| self.resolve_pattern(pattern.as_ref()));
        let resolved = try_join_all(per_pattern).await?;

        let partials: PartialSet = resolved.into_iter().flatten().collect();
        info!("Aggregated {} partials from {} patterns", partials.len(), patterns.len());
        Ok(partials)
    }

    async fn resolve_pattern(&self, pattern: &str) -> Result<Vec<ResolvedPartial>, PartialError> {
        let matcher = PatternMatcher::new(pattern)?;
        let prefix = matcher.prefix().to_string();
        let files = self.expand(matcher).await?;
        debug!("Pattern '{}' (prefix '{}') matched {} files", pattern, prefix, files.len());

        let reads = files.iter().map(|file| self.resolver.resolve(file, &prefix));
        try_join_all(reads).await
    }

    async fn expand(&self, matcher: PatternMatcher) -> Result<Vec<PathBuf>, PartialError> {
        let root = self.resolver.root().to_path_buf();
        let pattern = matcher.pattern().to_string();

        tokio::task::spawn_blocking(move || matcher.find_matches(&root)).await.map_err(|e| {
            PartialError::ReadFailure {
                path: PathBuf::from(pattern),
                source: std::io::Error::other(e),
            }
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn aggregator(root: &Path) -> GlobAggregator {
        GlobAggregator::new(PartialResolver::new(root))
    }

    #[tokio::test]
    async fn test_empty_pattern_list_is_empty_set() {
        let temp_dir = TempDir::new().unwrap();
        let empty: [&str; 0] = [];

        let partials = aggregator(temp_dir.path()).aggregate(&empty).await.unwrap();
        assert!(partials.is_empty());
    }

    #[tokio::test]
    async fn test_aggregate_strips_prefix_and_underscore() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a/x.tmpl", "X");
        write(temp_dir.path(), "a/_y.tmpl", "Y");

        let partials = aggregator(temp_dir.path()).aggregate(&["a/*.tmpl"]).await.unwrap();

        assert_eq!(partials.len(), 2);
        assert_eq!(partials.get("x"), Some("X"));
        assert_eq!(partials.get("y"), Some("Y"));
    }

    #[tokio::test]
    async fn test_aggregate_recursive_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "src/templates/partials/header.mustache", "<header>");
        write(root, "src/templates/partials/nav/_item.mustache", "<li>");
        write(root, "src/templates/layout/base.mustache", "<html>");
        write(root, "src/templates/index.mustache", "page");

        let partials = aggregator(root)
            .aggregate(&["src/templates/partials/**/*.mustache", "src/templates/layout/**/*.mustache"])
            .await
            .unwrap();

        let names: Vec<&str> = partials.names().collect();
        assert_eq!(names, vec!["base", "header", "nav__item"]);
    }

    #[tokio::test]
    async fn test_dot_relative_pattern_names_like_plain() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a/x.tmpl", "X");
        write(temp_dir.path(), "a/_y.tmpl", "Y");

        let partials = aggregator(temp_dir.path()).aggregate(&["./a/*.tmpl"]).await.unwrap();

        assert_eq!(partials.names().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(partials.get("x"), Some("X"));
    }

    #[tokio::test]
    async fn test_dotfiles_are_not_partials() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "a/x.tmpl", "X");
        write(root, "a/.x.tmpl.swp", "swap");
        write(root, "a/.hidden.tmpl", "hidden");

        let all = aggregator(root).aggregate(&["a/*"]).await.unwrap();
        assert_eq!(all.names().collect::<Vec<_>>(), vec!["x"]);

        let templates = aggregator(root).aggregate(&["a/*.tmpl"]).await.unwrap();
        assert_eq!(templates.names().collect::<Vec<_>>(), vec!["x"]);
    }

    #[tokio::test]
    async fn test_colliding_identifiers_keep_one_entry() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "one/shared.tmpl", "first");
        write(root, "two/shared.tmpl", "second");

        let partials = aggregator(root).aggregate(&["one/*.tmpl", "two/*.tmpl"]).await.unwrap();

        assert_eq!(partials.len(), 1);
        assert_eq!(partials.get("shared"), Some("second"));
    }

    #[tokio::test]
    async fn test_non_template_match_aborts_aggregation() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "a/good.tmpl", "ok");
        write(root, "a/notes.txt", "not a partial");

        let err = aggregator(root).aggregate(&["a/*"]).await.unwrap_err();
        match err {
            PartialError::InvalidFileKind {
                path,
            } => assert_eq!(path, PathBuf::from("a/notes.txt")),
            other => panic!("expected InvalidFileKind, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreadable_partial_aborts_aggregation() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "a/good.tmpl", "ok");
        fs::write(root.join("a/bad.tmpl"), [0xc3, 0x28]).unwrap();

        let err = aggregator(root).aggregate(&["a/*.tmpl"]).await.unwrap_err();
        assert!(matches!(err, PartialError::ReadFailure { .. }));
    }

    #[tokio::test]
    async fn test_invalid_pattern_aborts_aggregation() {
        let temp_dir = TempDir::new().unwrap();

        let err = aggregator(temp_dir.path()).aggregate(&["a/[*.tmpl"]).await.unwrap_err();
        assert!(matches!(err, PartialError::InvalidPattern { .. }));
    }

    #[tokio::test]
    async fn test_pattern_without_matches_contributes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a/x.tmpl", "X");

        let partials =
            aggregator(temp_dir.path()).aggregate(&["a/*.tmpl", "missing/**/*.tmpl"]).await.unwrap();
        assert_eq!(partials.names().collect::<Vec<_>>(), vec!["x"]);
    }
}
