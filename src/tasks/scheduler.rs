//! Level-by-level execution of a [`Plan`].

use anyhow::Result;
use futures::future::try_join_all;
use tracing::{debug, info};

use super::{Plan, Task, TaskOutcome, run_task};
use crate::config::BuildConfig;
use crate::utils::progress::ProgressBar;

/// Runs planned tasks against one configuration.
///
/// All tasks of a level run concurrently and the next level starts once the
/// whole level has finished. The first failing task ends the run; its
/// siblings in the same level are dropped and later levels never start.
pub struct Scheduler<'a> {
    config: &'a BuildConfig,
    show_progress: bool,
}

impl<'a> Scheduler<'a> {
    pub const fn new(config: &'a BuildConfig) -> Self {
        Self {
            config,
            show_progress: false,
        }
    }

    /// Shows a progress bar counting finished tasks.
    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Executes `plan`, returning every task's outcome in plan order.
    ///
    /// # Errors
    ///
    /// The error of the first task that fails.
    pub async fn run(&self, plan: &Plan) -> Result<Vec<(Task, TaskOutcome)>> {
        let progress = ProgressBar::new(plan.len() as u64, self.show_progress);
        progress.set_prefix("Building");

        let mut outcomes = Vec::with_capacity(plan.len());
        for (index, level) in plan.levels().iter().enumerate() {
            debug!(
                "Level {}: {}",
                index,
                level.iter().map(|task| task.name()).collect::<Vec<_>>().join(", ")
            );

            let running = level.iter().map(|task| {
                let progress = progress.clone();
                async move {
                    let outcome = run_task(self.config, *task).await?;
                    progress.set_message(task.name());
                    progress.inc(1);
                    Ok::<_, anyhow::Error>((*task, outcome))
                }
            });

            match try_join_all(running).await {
                Ok(finished) => outcomes.extend(finished),
                Err(e) => {
                    progress.finish_and_clear();
                    return Err(e);
                }
            }
        }

        progress.finish_and_clear();
        info!("Ran {} tasks in {} levels", outcomes.len(), plan.levels().len());
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskGraph;
    use crate::test_utils::{SiteFixture, init_test_logging};

    #[tokio::test]
    async fn test_default_plan_cleans_then_builds() {
        init_test_logging(None);
        let site = SiteFixture::new().unwrap();
        site.write("build/styles/stale.css", "old").unwrap();
        site.write("src/styles/site.css", "new").unwrap();

        let config = site.config();
        let plan = TaskGraph::standard().plan(&[Task::Default]).unwrap();
        let outcomes = Scheduler::new(&config).run(&plan).await.unwrap();

        assert_eq!(outcomes.len(), 12);
        assert_eq!(outcomes.last().map(|(task, _)| *task), Some(Task::Default));
        assert!(!site.exists("build/styles/stale.css"));
        assert_eq!(site.read("build/styles/site.css").unwrap(), "new");
    }

    #[tokio::test]
    async fn test_failure_stops_later_levels() {
        init_test_logging(None);
        let site = SiteFixture::new().unwrap();
        site.write("src/templates/partials/notes.txt", "x").unwrap();
        site.write("src/templates/index.mustache", "home").unwrap();

        let mut config = site.config();
        config.src.partials = vec!["src/templates/partials/*".to_string()];

        let plan = TaskGraph::standard().plan(&[Task::Default]).unwrap();
        let err = Scheduler::new(&config).run(&plan).await.unwrap_err();

        assert!(format!("{err:#}").contains("templates"));
        assert!(!site.exists("build/index.html"));
    }
}
