//! Command-line interface for stencil.
//!
//! Each command lives in its own module with its own argument struct and
//! execution logic:
//! - `render` - load the manifest, wire the task graph, run the root node
//! - `list` - show the configured groups and jobs
//! - `validate` - check the manifest, engines, and source files
//!
//! Global options apply to every command:
//! - `--manifest <PATH>` - manifest location (default `stencil.toml`)
//! - `--verbose` / `--quiet` - logging verbosity
//! - `--no-progress` - disable progress output for scripts and CI

mod list;
mod render;
mod validate;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::manifest::MANIFEST_FILE;

/// Main CLI structure for stencil.
#[derive(Parser)]
#[command(
    name = "stencil",
    about = "Build-time template expansion over a dependency-ordered task graph",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the manifest file.
    #[arg(long, global = true, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Enable debug output.
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Disable progress indicators.
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every configured template job.
    Render(render::RenderArgs),
    /// List configured groups and jobs.
    List(list::ListArgs),
    /// Validate the manifest, engines, and source files.
    Validate(validate::ValidateArgs),
}

impl Cli {
    /// Initialize tracing based on the verbosity flags. `RUST_LOG` wins
    /// when set.
    pub fn init_logging(&self) {
        let default_level = if self.quiet {
            "error"
        } else if self.verbose {
            "stencil=debug"
        } else {
            "stencil=info"
        };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        // Logs go to stderr; stdout stays parseable (list --format json).
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    /// Execute the selected command.
    ///
    /// # Errors
    ///
    /// Returns whatever the command fails with; `main` turns it into a
    /// user-friendly display.
    pub async fn execute(self) -> Result<()> {
        let manifest_path = self.manifest.unwrap_or_else(|| PathBuf::from(MANIFEST_FILE));
        match self.command {
            Commands::Render(args) => args.execute(&manifest_path, self.no_progress).await,
            Commands::List(args) => args.execute(&manifest_path),
            Commands::Validate(args) => args.execute(&manifest_path),
        }
    }
}
