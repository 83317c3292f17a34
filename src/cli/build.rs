//! `assetpipe build`: run tasks and their dependencies.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use super::common::load_build_config;
use crate::tasks::{Scheduler, TaskGraph};

/// Run build tasks.
///
/// Every named task is planned together with the tasks it requires. With
/// no names the `default` task runs: clean everything, then build every
/// asset kind.
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// Tasks to run (e.g. `styles`, `templates`, `clean-fonts`)
    #[arg(value_name = "TASK")]
    pub tasks: Vec<String>,

    /// Print the execution plan without running it
    #[arg(long)]
    pub dry_run: bool,
}

impl BuildCommand {
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let config = load_build_config(cli)?;
        let graph = TaskGraph::standard();

        let names = if self.tasks.is_empty() {
            vec!["default".to_string()]
        } else {
            self.tasks
        };
        let plan = graph.plan_names(&names)?;

        if self.dry_run {
            for (index, level) in plan.levels().iter().enumerate() {
                let tasks: Vec<String> = level.iter().map(|task| task.name()).collect();
                println!("{} {}", format!("{}.", index + 1).dimmed(), tasks.join(", "));
            }
            return Ok(());
        }

        let outcomes = Scheduler::new(&config).with_progress(cli.show_progress()).run(&plan).await?;

        for (task, outcome) in &outcomes {
            if task.is_aggregate() {
                continue;
            }
            println!("{} {} {}", "✓".green(), task.name().bold(), outcome);
        }
        println!("{} {} tasks finished", "Build complete:".green().bold(), outcomes.len());

        Ok(())
    }
}
