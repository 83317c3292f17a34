//! `assetpipe partials`: show which partials templates can include.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::CliConfig;
use super::common::{OutputFormat, load_build_config};
use crate::core::PipelineError;
use crate::partials::GlobAggregator;
use crate::utils::progress::spinner_with_message;

/// Resolve the configured partial globs and list the resulting names.
///
/// Fails exactly as a `templates` build would if any matched file is not a
/// loadable template.
#[derive(Args, Debug)]
pub struct PartialsCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct PartialListing<'a> {
    name: &'a str,
    bytes: usize,
}

impl PartialsCommand {
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let config = load_build_config(cli)?;

        let spinner = spinner_with_message("Collecting partials", cli.show_progress());
        let result = GlobAggregator::new(config.partial_resolver())
            .aggregate(&config.src.partials)
            .await;
        spinner.finish_and_clear();

        let partials = result.map_err(PipelineError::from).context("Failed to load partials")?;
        let listings: Vec<PartialListing<'_>> = partials
            .iter()
            .map(|(name, content)| PartialListing {
                name,
                bytes: content.len(),
            })
            .collect();

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listings)?),
            OutputFormat::Text => {
                if listings.is_empty() {
                    println!("{}", "No partials found".yellow());
                }
                for listing in &listings {
                    println!("{} {}", listing.name.bold(), format!("({} bytes)", listing.bytes).dimmed());
                }
            }
        }

        Ok(())
    }
}
