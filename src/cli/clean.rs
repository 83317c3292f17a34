//! `assetpipe clean`: remove build output.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use super::common::load_build_config;
use crate::tasks::{Scheduler, TaskGraph};

/// Remove build output.
#[derive(Args, Debug)]
pub struct CleanCommand {
    /// Asset kind to clean (`styles`, `scripts`, `images`, `fonts`,
    /// `templates`); everything when omitted
    #[arg(value_name = "KIND")]
    pub kind: Option<String>,
}

impl CleanCommand {
    /// The task this invocation runs.
    pub fn task_name(&self) -> String {
        match &self.kind {
            Some(kind) => format!("clean-{kind}"),
            None => "clean".to_string(),
        }
    }

    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let config = load_build_config(cli)?;
        let plan = TaskGraph::standard().plan_names(&[self.task_name()])?;

        let outcomes = Scheduler::new(&config).with_progress(cli.show_progress()).run(&plan).await?;
        for (task, outcome) in outcomes.iter().filter(|(task, _)| !task.is_aggregate()) {
            println!("{} {} {}", "✓".green(), task.name().bold(), outcome);
        }

        Ok(())
    }
}
