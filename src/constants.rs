//! Global constants used throughout the assetpipe codebase.
//!
//! File names, environment variable names, and default values that more
//! than one module needs to agree on.

/// Name of the project configuration file searched for in the current
/// directory and its parents.
pub const CONFIG_FILE_NAME: &str = "assetpipe.toml";

/// Environment variable holding an explicit configuration file path.
pub const CONFIG_ENV: &str = "ASSETPIPE_CONFIG";

/// Environment variable that disables progress spinners when set.
pub const NO_PROGRESS_ENV: &str = "ASSETPIPE_NO_PROGRESS";

/// Template file extensions recognized by the partial resolver when the
/// configuration does not override them.
pub const DEFAULT_TEMPLATE_EXTENSIONS: &[&str] = &["mustache", "tmpl"];

/// Extension given to rendered top-level templates.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "html";

/// File name of the concatenated script bundle.
pub const DEFAULT_BUNDLE_NAME: &str = "app.js";

/// Text inserted between concatenated scripts.
///
/// A bare newline is not enough: a script without a trailing semicolon
/// followed by one starting with `(` would merge into a call expression.
pub const DEFAULT_BUNDLE_SEPARATOR: &str = ";\n";

/// Characters that start a wildcard in a glob pattern.
///
/// The literal prefix of a pattern ends at the first of these.
pub const WILDCARD_CHARS: &[char] = &['*', '?', '[', '{'];
