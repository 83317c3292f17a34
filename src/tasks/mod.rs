//! Build tasks and their scheduling
//!
//! Every unit of work is a named [`Task`]. Tasks are wired into a
//! [`TaskGraph`] with two kinds of edges:
//!
//! - **requires**: running the task pulls the other task into the plan
//! - **after**: when both tasks are planned, one waits for the other
//!
//! The standard graph mirrors a conventional front-end build:
//!
//! ```text
//! default ──requires──▶ clean ──requires──▶ clean-styles, clean-scripts, ...
//!    │
//!    └──requires──▶ styles, scripts, images, fonts, templates
//!                   (each runs after clean and after its own clean-<kind>)
//! ```
//!
//! The [`Scheduler`] turns the requested names into levels with
//! [`TaskGraph::plan`] and runs each level concurrently.
//!
//! # Examples
//!
//! ```rust,no_run
//! use assetpipe::config::BuildConfig;
//! use assetpipe::tasks::{Scheduler, TaskGraph};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = BuildConfig::with_defaults(".");
//! let graph = TaskGraph::standard();
//! let plan = graph.plan_names(&["styles", "templates"])?;
//!
//! Scheduler::new(&config).run(&plan).await?;
//! # Ok(())
//! # }
//! ```

mod assets;
mod graph;
mod scheduler;

pub use assets::{
    TaskOutcome, build_fonts, build_images, build_scripts, build_styles, build_templates,
    clean_kind, collect_sources, run_task,
};
pub use graph::{EdgeKind, Plan, TaskGraph};
pub use scheduler::Scheduler;

use std::fmt;

/// The five kinds of asset a project produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    Styles,
    Scripts,
    Images,
    Fonts,
    Templates,
}

impl AssetKind {
    /// Every kind, in the order tasks are listed.
    pub const ALL: [Self; 5] = [Self::Styles, Self::Fonts, Self::Scripts, Self::Images, Self::Templates];

    /// Lowercase name used in task names and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Styles => "styles",
            Self::Scripts => "scripts",
            Self::Images => "images",
            Self::Fonts => "fonts",
            Self::Templates => "templates",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {
    /// Produce one kind of asset (`styles`, `scripts`, ...)
    Build(AssetKind),
    /// Remove the output of one kind (`clean-styles`, ...)
    Clean(AssetKind),
    /// Every `clean-*` task (`clean`)
    CleanAll,
    /// Clean then build everything (`default`)
    Default,
}

impl Task {
    /// Every registered task.
    pub fn all() -> Vec<Self> {
        let mut tasks: Vec<Self> = AssetKind::ALL.into_iter().map(Self::Build).collect();
        tasks.extend(AssetKind::ALL.into_iter().map(Self::Clean));
        tasks.push(Self::CleanAll);
        tasks.push(Self::Default);
        tasks
    }

    pub fn name(self) -> String {
        match self {
            Self::Build(kind) => kind.name().to_string(),
            Self::Clean(kind) => format!("clean-{}", kind.name()),
            Self::CleanAll => "clean".to_string(),
            Self::Default => "default".to_string(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "clean" => Some(Self::CleanAll),
            "default" => Some(Self::Default),
            _ => match name.strip_prefix("clean-") {
                Some(kind) => AssetKind::from_name(kind).map(Self::Clean),
                None => AssetKind::from_name(name).map(Self::Build),
            },
        }
    }

    /// One-line summary shown by `assetpipe tasks`.
    pub fn description(self) -> String {
        match self {
            Self::Build(AssetKind::Styles) => "Copy stylesheets into the build".to_string(),
            Self::Build(AssetKind::Fonts) => "Copy font files into the build".to_string(),
            Self::Build(AssetKind::Images) => "Copy images into the build".to_string(),
            Self::Build(AssetKind::Scripts) => "Concatenate scripts into one bundle".to_string(),
            Self::Build(AssetKind::Templates) => "Render templates with partials".to_string(),
            Self::Clean(AssetKind::Templates) => "Remove rendered pages".to_string(),
            Self::Clean(kind) => format!("Remove the {kind} build directory"),
            Self::CleanAll => "Remove every build output".to_string(),
            Self::Default => "Clean, then build every asset".to_string(),
        }
    }

    /// Aggregate tasks only group other tasks and do no work themselves.
    pub const fn is_aggregate(self) -> bool {
        matches!(self, Self::CleanAll | Self::Default)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
