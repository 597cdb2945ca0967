//! The `list` command: show configured groups and jobs.

use std::path::Path;

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde_json::json;

use crate::engine;
use crate::manifest::Manifest;

/// Arguments for `stencil list`.
#[derive(Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

impl ListArgs {
    /// Print the manifest's groups and jobs.
    ///
    /// # Errors
    ///
    /// Fails when the manifest cannot be loaded.
    pub fn execute(self, manifest_path: &Path) -> Result<()> {
        let manifest = Manifest::load(manifest_path)?;
        let plugin = manifest.into_plugin();

        match self.format {
            OutputFormat::Table => {
                for set in plugin.job_sets() {
                    println!("{}", set.name.bold());
                    for job in set.jobs() {
                        let engine_note = if job.engine_name() == engine::REPLACE {
                            String::new()
                        } else {
                            format!(" [{}]", job.engine_name())
                        };
                        println!(
                            "  {} {} {}{}",
                            job.source().display(),
                            "->".dimmed(),
                            job.destination().display(),
                            engine_note.cyan()
                        );
                        for (key, value) in job.params() {
                            println!("      {key} = {value}");
                        }
                    }
                }
            }
            OutputFormat::Json => {
                let groups: Vec<_> = plugin
                    .job_sets()
                    .iter()
                    .map(|set| {
                        json!({
                            "name": set.name,
                            "registers_source_root": set.registers_source_root(),
                            "jobs": set.jobs().iter().map(|job| {
                                json!({
                                    "name": job.name(),
                                    "src": job.source(),
                                    "dst": job.destination(),
                                    "engine": job.engine_name(),
                                    "params": job.params().iter().map(|(k, v)| {
                                        json!({ "key": k, "value": v })
                                    }).collect::<Vec<_>>(),
                                })
                            }).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "task_prefix": plugin.task_prefix(),
                        "groups": groups,
                    }))?
                );
            }
        }

        Ok(())
    }
}
