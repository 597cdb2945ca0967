//! The `render` command: run every configured template job.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::graph::TaskGraph;
use crate::manifest::Manifest;
use crate::project::{ProjectPaths, RecordedSourceRoots};

/// Arguments for `stencil render`.
#[derive(Args)]
pub struct RenderArgs {
    /// Project root directory; defaults to the manifest's directory.
    #[arg(long, value_name = "DIR")]
    project_dir: Option<PathBuf>,

    /// Build output directory; defaults to `<project>/build`.
    #[arg(long, value_name = "DIR")]
    build_dir: Option<PathBuf>,

    /// Maximum number of jobs rendering concurrently.
    #[arg(long, value_name = "N")]
    max_parallel: Option<usize>,
}

impl RenderArgs {
    /// Load the manifest, wire the graph, and run the root node.
    ///
    /// # Errors
    ///
    /// Fails on manifest problems, wiring problems, or when any task node
    /// failed; individual failures are printed before returning.
    pub async fn execute(self, manifest_path: &Path, no_progress: bool) -> Result<()> {
        let manifest = Manifest::load(manifest_path)?;
        let paths = self.resolve_paths(manifest_path);
        let plugin = manifest.into_plugin();
        let job_count: usize = plugin.job_sets().iter().map(|set| set.jobs().len()).sum();

        let mut graph = TaskGraph::new();
        let mut compile = RecordedSourceRoots::default();
        let root = plugin.apply(&mut graph, &paths, &mut compile)?;

        let max_parallel = self.max_parallel.unwrap_or_else(default_parallelism);
        tracing::debug!(jobs = job_count, max_parallel, "running template job graph");

        let progress = (!no_progress).then(|| spinner(job_count));
        let report = graph.run(root, max_parallel).await;
        if let Some(progress) = progress {
            progress.finish_and_clear();
        }

        for root_dir in compile.roots() {
            println!("{} generated source root: {}", "note:".cyan(), root_dir.display());
        }

        if report.is_success() {
            println!(
                "{} rendered {} template job{} into {}",
                "✓".green().bold(),
                job_count,
                if job_count == 1 { "" } else { "s" },
                paths.build_dir.display()
            );
            return Ok(());
        }

        for failure in &report.failed {
            eprintln!("{} {}: {:#}", "✗".red().bold(), failure.task.bold(), failure.error);
        }
        anyhow::bail!("{} task(s) failed", report.failed.len())
    }

    fn resolve_paths(&self, manifest_path: &Path) -> ProjectPaths {
        let project_dir = self.project_dir.clone().unwrap_or_else(|| {
            manifest_path.parent().filter(|p| !p.as_os_str().is_empty()).map_or_else(
                || PathBuf::from("."),
                Path::to_path_buf,
            )
        });
        match &self.build_dir {
            Some(build_dir) => ProjectPaths::with_build_dir(project_dir, build_dir.clone()),
            None => ProjectPaths::new(project_dir),
        }
    }
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get)
}

fn spinner(job_count: usize) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(format!("rendering {job_count} template job(s)"));
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
