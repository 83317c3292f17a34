//! Progress indicators for build runs
//!
//! Thin wrapper over `indicatif` with the pipeline's styling. A bar tracks the
//! tasks of a build plan; a spinner covers work of unknown length such as
//! partial discovery.
//!
//! # Environment Variables
//!
//! - `ASSETPIPE_NO_PROGRESS`: set to any value to hide every indicator
//!
//! # Examples
//!
//! ```rust,no_run
//! use assetpipe::utils::progress::ProgressBar;
//!
//! let progress = ProgressBar::new(6, true);
//! progress.set_message("styles");
//! progress.inc(1);
//! progress.finish_with_message("Build complete");
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

use crate::constants::NO_PROGRESS_ENV;

fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV).is_some()
}

/// A progress bar or spinner that can be switched off as a whole.
///
/// When disabled, either by the caller or through `ASSETPIPE_NO_PROGRESS`,
/// the bar is hidden and every call is a no-op.
#[derive(Clone, Debug)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a bar counting up to `len`.
    pub fn new(len: u64, enabled: bool) -> Self {
        let bar = if !enabled || is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(len);
            bar.set_style(bar_style());
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Creates an animated spinner.
    pub fn new_spinner(enabled: bool) -> Self {
        let bar = if !enabled || is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self {
            inner: bar,
        }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix.into());
    }

    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    /// Whether output is suppressed.
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }
}

fn bar_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_bar())
        .progress_chars("━╸━")
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{prefix:.bold} {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

/// Spinner preloaded with `msg`.
pub fn spinner_with_message(msg: impl Into<String>, enabled: bool) -> ProgressBar {
    let spinner = ProgressBar::new_spinner(enabled);
    spinner.set_message(msg);
    spinner
}
