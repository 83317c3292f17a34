//! File system and terminal helpers
//!
//! - [`fs`] - atomic writes, parallel copies and directory cleanup
//! - [`progress`] - progress bars and spinners for build runs

pub mod fs;
pub mod progress;

pub use fs::{atomic_write, copy_files_parallel, ensure_dir, remove_dir_if_exists};
pub use progress::ProgressBar;
