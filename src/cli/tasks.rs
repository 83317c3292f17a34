//! `assetpipe tasks`: list the task graph.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::CliConfig;
use super::common::OutputFormat;
use crate::tasks::{Task, TaskGraph};

/// List tasks in the order they would run.
#[derive(Args, Debug)]
pub struct TasksCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct TaskListing {
    name: String,
    description: String,
    requires: Vec<String>,
    after: Vec<String>,
}

impl TaskListing {
    fn new(graph: &TaskGraph, task: Task) -> Self {
        Self {
            name: task.name(),
            description: task.description(),
            requires: graph.dependencies(task).into_iter().map(Task::name).collect(),
            after: graph.orderings(task).into_iter().map(Task::name).collect(),
        }
    }
}

impl TasksCommand {
    pub fn execute(self, _cli: &CliConfig) -> Result<()> {
        let graph = TaskGraph::standard();
        let listings: Vec<TaskListing> = graph
            .topological_order()?
            .into_iter()
            .map(|task| TaskListing::new(&graph, task))
            .collect();

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listings)?),
            OutputFormat::Text => {
                let width = listings.iter().map(|listing| listing.name.len()).max().unwrap_or(0);
                for listing in &listings {
                    println!("{:width$}  {}", listing.name.bold(), listing.description);
                    if !listing.requires.is_empty() {
                        println!("{:width$}  {} {}", "", "requires:".dimmed(), listing.requires.join(", "));
                    }
                }
            }
        }

        Ok(())
    }
}
