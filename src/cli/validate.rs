//! The `validate` command: check the manifest before a build uses it.
//!
//! Three layers of checks:
//! 1. structural manifest rules (done by [`Manifest::load`])
//! 2. every referenced engine resolves against the built-in registry
//! 3. every job's resolved source file exists
//!
//! The engine check is stricter here than at render time on purpose: the
//! CLI cannot register custom engines, so an unknown engine in the manifest
//! can only fail later.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::engine::EngineRegistry;
use crate::manifest::Manifest;
use crate::project::ProjectPaths;

/// Arguments for `stencil validate`.
#[derive(Args)]
pub struct ValidateArgs {
    /// Project root directory; defaults to the manifest's directory.
    #[arg(long, value_name = "DIR")]
    project_dir: Option<PathBuf>,
}

impl ValidateArgs {
    /// Run all checks and report findings.
    ///
    /// # Errors
    ///
    /// Fails when the manifest cannot be loaded or any check finds a
    /// problem.
    pub fn execute(self, manifest_path: &Path) -> Result<()> {
        let manifest = Manifest::load(manifest_path)?;
        let project_dir = self.project_dir.clone().unwrap_or_else(|| {
            manifest_path.parent().filter(|p| !p.as_os_str().is_empty()).map_or_else(
                || PathBuf::from("."),
                Path::to_path_buf,
            )
        });
        let paths = ProjectPaths::new(project_dir);
        let plugin = manifest.into_plugin();
        let engines = EngineRegistry::with_builtins();

        let mut problems = Vec::new();
        for set in plugin.job_sets() {
            for job in set.jobs() {
                if !engines.contains(job.engine_name()) {
                    problems.push(format!(
                        "group '{}': job '{}' uses unknown engine [{}]",
                        set.name,
                        job.name(),
                        job.engine_name()
                    ));
                }
                let source = job.absolute_source(set, &paths);
                if !source.is_file() {
                    problems.push(format!(
                        "group '{}': source file missing: {}",
                        set.name,
                        source.display()
                    ));
                }
            }
        }

        if problems.is_empty() {
            let job_count: usize = plugin.job_sets().iter().map(|set| set.jobs().len()).sum();
            println!(
                "{} manifest ok: {} group(s), {} job(s)",
                "✓".green().bold(),
                plugin.job_sets().len(),
                job_count
            );
            return Ok(());
        }

        for problem in &problems {
            eprintln!("{} {}", "✗".red().bold(), problem);
        }
        anyhow::bail!("validation found {} problem(s)", problems.len())
    }
}
