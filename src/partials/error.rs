//! Error type for partial resolution and aggregation.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while resolving a single partial or aggregating a partial set.
///
/// Every variant carries the offending path or pattern so the build can
/// report exactly which input stopped it. Aggregation is fail-fast: the
/// first error aborts the whole run and no partial mapping is returned.
#[derive(Error, Debug)]
pub enum PartialError {
    /// The matched file does not carry a recognized template extension, or
    /// nothing is left of its name once the extension and prefix are removed.
    #[error("Invalid template file: {}", path.display())]
    InvalidFileKind {
        /// Path of the rejected file
        path: PathBuf,
    },

    /// The file could not be opened, read, or decoded as UTF-8.
    #[error("Error reading template file {}: {source}", path.display())]
    ReadFailure {
        /// Path of the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A glob pattern could not be compiled.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as written in the configuration
        pattern: String,
        /// Why the glob compiler rejected it
        reason: String,
    },
}

impl PartialError {
    /// Path or pattern that caused the failure, for display.
    pub fn subject(&self) -> String {
        match self {
            Self::InvalidFileKind {
                path,
            }
            | Self::ReadFailure {
                path,
                ..
            } => path.display().to_string(),
            Self::InvalidPattern {
                pattern,
                ..
            } => pattern.clone(),
        }
    }
}

impl Clone for PartialError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidFileKind {
                path,
            } => Self::InvalidFileKind {
                path: path.clone(),
            },
            Self::ReadFailure {
                path,
                source,
            } => Self::ReadFailure {
                path: path.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            },
            Self::InvalidPattern {
                pattern,
                reason,
            } => Self::InvalidPattern {
                pattern: pattern.clone(),
                reason: reason.clone(),
            },
        }
    }
}
