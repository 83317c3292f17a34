//! Error handling for assetpipe
//!
//! Two layers, following the same split throughout the crate:
//! 1. **Strongly-typed errors** ([`PipelineError`], [`PartialError`]) raised
//!    where a failure is first detected
//! 2. **User-friendly messages** ([`ErrorContext`]) built at the CLI boundary
//!    with details and an actionable suggestion
//!
//! Library code returns `anyhow::Result` and attaches context with
//! `.with_context(..)`; the typed error stays reachable through
//! `downcast_ref`, which is how [`user_friendly_error`] picks a suggestion.
//!
//! # Examples
//!
//! ```rust,no_run
//! use assetpipe::core::{PipelineError, user_friendly_error};
//!
//! let error = anyhow::Error::from(PipelineError::UnknownTask {
//!     name: "stlyes".to_string(),
//!     suggestion: Some("styles".to_string()),
//! });
//! user_friendly_error(error).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::partials::PartialError;

/// The main error type for pipeline operations.
///
/// ## Configuration
/// - [`ConfigNotFound`](Self::ConfigNotFound) - explicit config path missing
/// - [`ConfigParseError`](Self::ConfigParseError) - invalid TOML
/// - [`ConfigValidationError`](Self::ConfigValidationError) - unsafe or empty values
///
/// ## Task graph
/// - [`UnknownTask`](Self::UnknownTask) - task name not registered
/// - [`CircularTask`](Self::CircularTask) - dependency cycle
///
/// ## Build steps
/// - [`Partial`](Self::Partial) - partial resolution failed
/// - [`RenderFailed`](Self::RenderFailed) - template engine rejected a template
/// - [`FileSystemError`](Self::FileSystemError) - copy, write or remove failed
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration file named on the command line does not exist
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was given
        path: String,
    },

    /// Configuration parsing error
    #[error("Invalid configuration file syntax in {file}")]
    ConfigParseError {
        /// Path to the file that failed to parse
        file: String,
        /// Parser message
        reason: String,
    },

    /// Configuration parsed but holds values the pipeline refuses to use
    #[error("Configuration validation failed: {reason}")]
    ConfigValidationError {
        /// What is wrong
        reason: String,
    },

    /// Task name is not part of the task graph
    #[error("Unknown task '{name}'")]
    UnknownTask {
        /// The requested name
        name: String,
        /// Closest registered name, if any is close enough
        suggestion: Option<String>,
    },

    /// Task dependencies form a cycle
    #[error("Circular task dependency detected: {cycle}")]
    CircularTask {
        /// Task names along the cycle, joined with arrows
        cycle: String,
    },

    /// Partial loading failed
    #[error(transparent)]
    Partial(#[from] PartialError),

    /// Template rendering failed
    #[error("Failed to render template '{template}'")]
    RenderFailed {
        /// Template name or path
        template: String,
        /// Engine message chain
        reason: String,
    },

    /// File system operation failed
    #[error("File system error during {operation}: {path}")]
    FileSystemError {
        /// What was being done (e.g. "copy", "remove")
        operation: String,
        /// The path involved
        path: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for PipelineError {
    fn clone(&self) -> Self {
        match self {
            Self::ConfigNotFound {
                path,
            } => Self::ConfigNotFound {
                path: path.clone(),
            },
            Self::ConfigParseError {
                file,
                reason,
            } => Self::ConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ConfigValidationError {
                reason,
            } => Self::ConfigValidationError {
                reason: reason.clone(),
            },
            Self::UnknownTask {
                name,
                suggestion,
            } => Self::UnknownTask {
                name: name.clone(),
                suggestion: suggestion.clone(),
            },
            Self::CircularTask {
                cycle,
            } => Self::CircularTask {
                cycle: cycle.clone(),
            },
            Self::Partial(error) => Self::Partial(error.clone()),
            Self::RenderFailed {
                template,
                reason,
            } => Self::RenderFailed {
                template: template.clone(),
                reason: reason.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error wrapper carrying a suggestion and details for CLI display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: PipelineError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: PipelineError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`].
///
/// Recognizes [`PipelineError`] and [`PartialError`] anywhere in the context
/// chain and [`std::io::Error`] kinds; everything else is shown with its full
/// cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let chain = cause_chain(&error);

    if let Some(pipeline_error) = error.downcast_ref::<PipelineError>() {
        return with_chain(create_error_context(pipeline_error.clone()), chain);
    }

    if let Some(partial_error) = error.downcast_ref::<PartialError>() {
        return with_chain(
            create_error_context(PipelineError::Partial(partial_error.clone())),
            chain,
        );
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(PipelineError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check file ownership and permissions of the source and build directories")
                .with_details(error.to_string());
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(PipelineError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(error.to_string());
            }
            _ => {}
        }
    }

    let mut message = error.to_string();
    if let Some(chain) = chain {
        message.push_str(&chain);
    }

    ErrorContext::new(PipelineError::Other {
        message,
    })
}

fn cause_chain(error: &anyhow::Error) -> Option<String> {
    let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if causes.is_empty() {
        return None;
    }

    let mut message = String::from("\n\nCaused by:");
    for (i, cause) in causes.iter().enumerate() {
        message.push_str(&format!("\n  {}: {}", i + 1, cause));
    }
    Some(message)
}

fn with_chain(mut context: ErrorContext, chain: Option<String>) -> ErrorContext {
    if let Some(chain) = chain {
        let details = context.details.take().unwrap_or_default();
        context.details = Some(format!("{details}{chain}").trim_start().to_string());
    }
    context
}

fn create_error_context(error: PipelineError) -> ErrorContext {
    match &error {
        PipelineError::ConfigNotFound {
            path,
        } => {
            let path = path.clone();
            ErrorContext::new(error)
                .with_suggestion(format!(
                    "Create {path} or drop --config to use {} discovery and built-in defaults",
                    crate::constants::CONFIG_FILE_NAME
                ))
        }

        PipelineError::ConfigParseError {
            reason,
            ..
        } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and that every key is a known setting")
                .with_details(reason)
        }

        PipelineError::ConfigValidationError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Source patterns and build directories must be relative paths inside the project"),

        PipelineError::UnknownTask {
            suggestion,
            ..
        } => {
            let hint = match suggestion {
                Some(name) => format!("Did you mean '{name}'? Run 'assetpipe tasks' to list every task"),
                None => "Run 'assetpipe tasks' to list every task".to_string(),
            };
            ErrorContext::new(error).with_suggestion(hint)
        }

        PipelineError::CircularTask {
            ..
        } => ErrorContext::new(error)
            .with_details("A task cannot depend on itself, directly or through other tasks"),

        PipelineError::Partial(partial) => {
            let (suggestion, details) = match partial {
                PartialError::InvalidFileKind {
                    ..
                } => (
                    "Narrow the partial glob so it only matches template files, e.g. '**/*.mustache'",
                    "Every file matched by a partial pattern must carry a template extension and a non-empty name",
                ),
                PartialError::ReadFailure {
                    ..
                } => (
                    "Check that the file exists, is readable, and is valid UTF-8 text",
                    "No partials are registered when any one of them fails to load",
                ),
                PartialError::InvalidPattern {
                    ..
                } => (
                    "Fix the glob syntax; character classes need a closing ']'",
                    "Patterns support *, **, ?, [..] and {a,b}",
                ),
            };
            let details = format!("{details}. Rejected input: {}", partial.subject());
            ErrorContext::new(error).with_suggestion(suggestion).with_details(details)
        }

        PipelineError::RenderFailed {
            reason,
            ..
        } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_suggestion(
                    "Check template syntax. Partials are included with {{> name }} or {% include \"name\" %}; \
                     run 'assetpipe partials' to list available names",
                )
                .with_details(reason)
        }

        PipelineError::FileSystemError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check permissions on the build directory and that no other process holds files open"),

        PipelineError::Other {
            ..
        } => ErrorContext::new(error),
    }
}

/// Suggests the closest name from `candidates` using Levenshtein distance.
///
/// Returns `None` when nothing is within half of the input's length.
pub fn closest_match<'a, I>(input: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let threshold = (input.len() / 2).max(1);
    candidates
        .into_iter()
        .map(|candidate| (strsim::levenshtein(input, candidate), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}
