//! Glob pattern handling for asset sources.
//!
//! Every source list in `assetpipe.toml` is a list of glob patterns. This
//! module compiles them, expands them against the project tree, and exposes
//! the two derived pieces of text the pipeline depends on:
//!
//! - the **literal prefix**: everything before the first wildcard character,
//!   used by the partial resolver to shorten identifiers
//! - the **glob base**: the directory part of the prefix, used as the root
//!   that copied assets keep their relative layout under
//!
//! # Pattern Syntax
//!
//! - `*` matches any sequence of characters within a single path component
//! - `**` matches any sequence of path components (recursive matching)
//! - `?` matches any single character
//! - `[abc]` / `[a-z]` match one character from a set or range
//! - `{css,scss}` expands into one pattern per alternative before matching
//!
//! # Examples
//!
//! ```rust,no_run
//! use assetpipe::pattern::{PatternMatcher, glob_base, literal_prefix};
//!
//! assert_eq!(literal_prefix("src/templates/partials/**/*.mustache"), "src/templates/partials/");
//! assert_eq!(glob_base("src/styles/**/*.{css,scss}"), "src/styles");
//!
//! let matcher = PatternMatcher::new("src/styles/**/*.{css,scss}")?;
//! let files = matcher.find_matches(std::path::Path::new("."))?;
//! # Ok::<(), assetpipe::partials::PartialError>(())
//! ```

use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::constants::WILDCARD_CHARS;
use crate::partials::PartialError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Strips every leading `./` so patterns line up with root-relative paths.
///
/// # Examples
///
/// ```rust,no_run
/// use assetpipe::pattern::normalize_pattern;
///
/// assert_eq!(normalize_pattern("./src/*.js"), "src/*.js");
/// assert_eq!(normalize_pattern("././a/*.tmpl"), "a/*.tmpl");
/// assert_eq!(normalize_pattern("src/./x.js"), "src/./x.js");
/// ```
pub fn normalize_pattern(pattern: &str) -> &str {
    let mut normalized = pattern;
    while let Some(rest) = normalized.strip_prefix("./") {
        normalized = rest;
    }
    normalized
}

/// Returns the substring of `pattern` before its first wildcard character.
///
/// A pattern without wildcards yields the empty string, so literal file
/// paths never shorten the identifiers derived from them.
///
/// # Examples
///
/// ```rust,no_run
/// use assetpipe::pattern::literal_prefix;
///
/// assert_eq!(literal_prefix("a/*.tmpl"), "a/");
/// assert_eq!(literal_prefix("src/templates/page-?.mustache"), "src/templates/page-");
/// assert_eq!(literal_prefix("src/layout.mustache"), "");
/// ```
pub fn literal_prefix(pattern: &str) -> &str {
    match pattern.find(WILDCARD_CHARS) {
        Some(index) => &pattern[..index],
        None => "",
    }
}

/// Returns the directory that matches of `pattern` are laid out relative to.
///
/// This is the literal prefix cut back to its last `/`. For a pattern with
/// no wildcard it is the parent directory of the literal path.
pub fn glob_base(pattern: &str) -> &str {
    let literal = if pattern.contains(WILDCARD_CHARS) {
        literal_prefix(pattern)
    } else {
        pattern
    };
    match literal.rfind('/') {
        Some(index) => &literal[..index],
        None => "",
    }
}

/// Expands `{a,b}` groups into one pattern per alternative.
///
/// Groups may repeat and nest; a `{` without a matching `}` is kept
/// literally. The output preserves the order alternatives were written in.
///
/// # Examples
///
/// ```rust,no_run
/// use assetpipe::pattern::expand_braces;
///
/// assert_eq!(
///     expand_braces("img/*.{png,jpg}"),
///     vec!["img/*.png".to_string(), "img/*.jpg".to_string()]
/// );
/// ```
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0usize;
    let mut close = None;
    let mut splits = Vec::new();
    for (offset, ch) in pattern[open..].char_indices() {
        let index = open + offset;
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(index);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(index),
            _ => {}
        }
    }

    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let head = &pattern[..open];
    let tail = &pattern[close + 1..];
    let mut bounds = Vec::with_capacity(splits.len() + 2);
    bounds.push(open);
    bounds.extend(splits);
    bounds.push(close);

    let mut expanded = Vec::new();
    for window in bounds.windows(2) {
        let alternative = &pattern[window[0] + 1..window[1]];
        expanded.extend(expand_braces(&format!("{head}{alternative}{tail}")));
    }
    expanded
}

/// A compiled source pattern.
///
/// Leading `./` is dropped and brace groups are expanded once at
/// construction; a path matches when any expansion matches it. Wildcards
/// skip names starting with `.` unless the dot is written literally. The
/// matcher is cheap to clone and can be moved into blocking tasks.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Vec<Pattern>,
    original_pattern: String,
    normalized_pattern: String,
}

impl PatternMatcher {
    /// Compiles a glob pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`PartialError::InvalidPattern`] if any brace expansion of the
    /// pattern is not valid glob syntax.
    pub fn new(pattern_str: &str) -> Result<Self, PartialError> {
        let normalized = normalize_pattern(pattern_str);
        let patterns = expand_braces(normalized)
            .iter()
            .map(|expanded| {
                Pattern::new(expanded).map_err(|e| PartialError::InvalidPattern {
                    pattern: pattern_str.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            original_pattern: pattern_str.to_string(),
            normalized_pattern: normalized.to_string(),
        })
    }

    /// The pattern as written.
    pub fn pattern(&self) -> &str {
        &self.original_pattern
    }

    /// See [`literal_prefix`]; computed without the leading `./`.
    pub fn prefix(&self) -> &str {
        literal_prefix(&self.normalized_pattern)
    }

    /// See [`glob_base`]; computed without the leading `./`.
    pub fn base(&self) -> &str {
        glob_base(&self.normalized_pattern)
    }

    /// Checks a path relative to the project root against the pattern
    /// without touching the filesystem.
    pub fn matches(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.patterns.iter().any(|pattern| pattern.matches_with(&path_str, MATCH_OPTIONS))
    }

    /// Finds every regular file below `base_path` that matches the pattern.
    ///
    /// The walk starts at the glob base rather than at `base_path` itself and
    /// does not follow symlinks. Returned paths are relative to `base_path`,
    /// sorted, and free of duplicates. A glob base that does not exist simply
    /// matches nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PartialError::ReadFailure`] if a directory below the walk
    /// root cannot be read.
    pub fn find_matches(&self, base_path: &Path) -> Result<Vec<PathBuf>, PartialError> {
        debug!("Searching for pattern '{}' in {}", self.original_pattern, base_path.display());

        let walk_root = base_path.join(self.base());
        if !walk_root.is_dir() {
            debug!("Glob base {} does not exist, no matches", walk_root.display());
            return Ok(Vec::new());
        }

        let mut matches = BTreeSet::new();
        for entry in WalkDir::new(&walk_root).follow_links(false) {
            let entry = entry.map_err(|e| PartialError::ReadFailure {
                path: e.path().map_or_else(|| walk_root.clone(), Path::to_path_buf),
                source: e.into(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            if let Ok(relative_path) = entry.path().strip_prefix(base_path) {
                trace!("Checking path: {}", relative_path.display());
                if self.matches(relative_path) {
                    matches.insert(relative_path.to_path_buf());
                }
            }
        }

        debug!("Found {} matches for pattern '{}'", matches.len(), self.original_pattern);
        Ok(matches.into_iter().collect())
    }
}

/// Validates that a pattern stays inside the project directory.
///
/// # Errors
///
/// Returns an error if the pattern contains `..` or is an absolute path.
///
/// # Examples
///
/// ```rust,no_run
/// use assetpipe::pattern::validate_pattern_safety;
///
/// assert!(validate_pattern_safety("src/**/*.js").is_ok());
/// assert!(validate_pattern_safety("../secrets/*").is_err());
/// ```
pub fn validate_pattern_safety(pattern: &str) -> anyhow::Result<()> {
    if pattern.contains("..") {
        anyhow::bail!("Pattern contains path traversal (..): {pattern}");
    }

    if pattern.starts_with('/') || pattern.starts_with('\\') {
        anyhow::bail!("Pattern contains absolute path: {pattern}");
    }

    if cfg!(windows) && pattern.contains(':') {
        anyhow::bail!("Pattern contains absolute path: {pattern}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_literal_prefix_stops_at_first_wildcard() {
        assert_eq!(literal_prefix("src/templates/partials/**/*.mustache"), "src/templates/partials/");
        assert_eq!(literal_prefix("a/*.tmpl"), "a/");
        assert_eq!(literal_prefix("a/b?.tmpl"), "a/b");
        assert_eq!(literal_prefix("a/[xy].tmpl"), "a/");
        assert_eq!(literal_prefix("*.tmpl"), "");
        assert_eq!(literal_prefix("a/plain.tmpl"), "");
    }

    #[test]
    fn test_glob_base() {
        assert_eq!(glob_base("src/styles/**/*.{css,scss}"), "src/styles");
        assert_eq!(glob_base("src/templates/page-*.mustache"), "src/templates");
        assert_eq!(glob_base("src/vendor/jquery.min.js"), "src/vendor");
        assert_eq!(glob_base("*.js"), "");
        assert_eq!(glob_base("app.js"), "");
    }

    #[test]
    fn test_expand_braces() {
        assert_eq!(expand_braces("a/*.js"), vec!["a/*.js"]);
        assert_eq!(expand_braces("a/*.{css,scss}"), vec!["a/*.css", "a/*.scss"]);
        assert_eq!(
            expand_braces("{a,b}/*.{x,y}"),
            vec!["a/*.x", "a/*.y", "b/*.x", "b/*.y"]
        );
        assert_eq!(expand_braces("a/{b,{c,d}}.js"), vec!["a/b.js", "a/c.js", "a/d.js"]);
        assert_eq!(expand_braces("a/{unclosed.js"), vec!["a/{unclosed.js"]);
    }

    #[test]
    fn test_single_star_does_not_cross_directories() {
        let matcher = PatternMatcher::new("src/templates/*.mustache").unwrap();

        assert!(matcher.matches(Path::new("src/templates/index.mustache")));
        assert!(!matcher.matches(Path::new("src/templates/partials/header.mustache")));
        assert!(!matcher.matches(Path::new("src/styles/index.mustache")));
    }

    #[test]
    fn test_globstar_matches_zero_or_more_directories() {
        let matcher = PatternMatcher::new("src/fonts/**/*").unwrap();

        assert!(matcher.matches(Path::new("src/fonts/a.ttf")));
        assert!(matcher.matches(Path::new("src/fonts/sub/b.woff")));
        assert!(!matcher.matches(Path::new("src/images/a.png")));
    }

    #[test]
    fn test_normalize_pattern() {
        assert_eq!(normalize_pattern("./a/*.tmpl"), "a/*.tmpl");
        assert_eq!(normalize_pattern("././a/*.tmpl"), "a/*.tmpl");
        assert_eq!(normalize_pattern("a/*.tmpl"), "a/*.tmpl");
        assert_eq!(normalize_pattern(".hidden/*.tmpl"), ".hidden/*.tmpl");
    }

    #[test]
    fn test_dot_relative_pattern_matches_like_plain() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        fs::create_dir_all(base_path.join("a")).unwrap();
        fs::write(base_path.join("a/x.tmpl"), "").unwrap();

        let matcher = PatternMatcher::new("./a/*.tmpl").unwrap();
        assert_eq!(matcher.pattern(), "./a/*.tmpl");
        assert_eq!(matcher.prefix(), "a/");
        assert_eq!(matcher.base(), "a");
        assert!(matcher.matches(Path::new("a/x.tmpl")));
        assert_eq!(matcher.find_matches(base_path).unwrap(), vec![PathBuf::from("a/x.tmpl")]);
    }

    #[test]
    fn test_wildcards_skip_dotfiles() {
        let matcher = PatternMatcher::new("src/fonts/**/*").unwrap();
        assert!(!matcher.matches(Path::new("src/fonts/.DS_Store")));
        assert!(!matcher.matches(Path::new("src/fonts/.cache/icons.woff")));
        assert!(matcher.matches(Path::new("src/fonts/icons.woff")));

        let literal_dot = PatternMatcher::new("a/.*.tmpl").unwrap();
        assert!(literal_dot.matches(Path::new("a/.hidden.tmpl")));
    }

    #[test]
    fn test_find_matches_skips_dotfiles() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        fs::create_dir_all(base_path.join("a/.git")).unwrap();
        fs::write(base_path.join("a/x.tmpl"), "").unwrap();
        fs::write(base_path.join("a/.x.tmpl.swp"), "").unwrap();
        fs::write(base_path.join("a/.git/y.tmpl"), "").unwrap();

        let matcher = PatternMatcher::new("a/**/*").unwrap();
        assert_eq!(matcher.find_matches(base_path).unwrap(), vec![PathBuf::from("a/x.tmpl")]);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternMatcher::new("src/[.js").unwrap_err();
        assert!(matches!(err, PartialError::InvalidPattern { .. }));
        assert!(err.to_string().contains("src/[.js"));
    }

    #[test]
    fn test_find_matches_in_directory_structure() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        fs::create_dir_all(base_path.join("src/styles/vendor")).unwrap();
        fs::write(base_path.join("src/styles/main.scss"), "").unwrap();
        fs::write(base_path.join("src/styles/reset.css"), "").unwrap();
        fs::write(base_path.join("src/styles/vendor/grid.css"), "").unwrap();
        fs::write(base_path.join("src/styles/notes.txt"), "").unwrap();
        fs::create_dir_all(base_path.join("src/styles/dir.css")).unwrap();

        let matcher = PatternMatcher::new("src/styles/**/*.{css,scss}").unwrap();
        let matches = matcher.find_matches(base_path).unwrap();

        assert_eq!(
            matches,
            vec![
                PathBuf::from("src/styles/main.scss"),
                PathBuf::from("src/styles/reset.css"),
                PathBuf::from("src/styles/vendor/grid.css"),
            ]
        );
    }

    #[test]
    fn test_find_matches_missing_base_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let matcher = PatternMatcher::new("src/nothing/**/*.js").unwrap();
        assert!(matcher.find_matches(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_find_matches_literal_path() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        fs::create_dir_all(base_path.join("vendor/lib")).unwrap();
        fs::write(base_path.join("vendor/lib/jquery.js"), "").unwrap();
        fs::write(base_path.join("vendor/lib/other.js"), "").unwrap();

        let matcher = PatternMatcher::new("vendor/lib/jquery.js").unwrap();
        assert_eq!(
            matcher.find_matches(base_path).unwrap(),
            vec![PathBuf::from("vendor/lib/jquery.js")]
        );
    }

    #[test]
    fn test_validate_pattern_safety() {
        assert!(validate_pattern_safety("src/**/*.js").is_ok());
        assert!(validate_pattern_safety("../outside/*.js").is_err());
        assert!(validate_pattern_safety("/etc/*").is_err());
    }
}
