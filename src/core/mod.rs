//! Core error types shared by every module.
//!
//! [`PipelineError`] covers configuration, task planning, partial loading and
//! rendering failures. The CLI converts any [`anyhow::Error`] into an
//! [`ErrorContext`] with [`user_friendly_error`] so users see a colored
//! message plus a suggestion instead of a raw error chain.

pub mod error;

pub use error::{ErrorContext, PipelineError, closest_match, user_friendly_error};
