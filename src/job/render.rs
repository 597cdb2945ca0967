//! Execution form of a job.
//!
//! The wiring layer resolves a [`Job`](super::Job) against its owning set
//! and the project context once, producing a [`RenderJob`] with absolute
//! paths and an owned parameter list. The render job is what a task node
//! captures: it is self-contained (own paths, own buffers), shares nothing
//! mutable with sibling jobs, and can be rendered without any task-graph
//! object present - which is also what makes it directly testable.

use std::path::PathBuf;

use crate::core::StencilError;
use crate::engine::EngineRegistry;
use crate::job::{Job, JobSet};
use crate::project::ProjectPaths;
use crate::utils::fs::atomic_write_text;

/// A fully resolved rendering unit, ready to execute.
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Task base name, carried over from the job for diagnostics.
    pub name: String,
    /// Absolute source path.
    pub source: PathBuf,
    /// Absolute destination path.
    pub destination: PathBuf,
    /// Engine to resolve at render time.
    pub engine_name: String,
    /// Ordered substitution parameters.
    pub params: Vec<(String, String)>,
}

impl RenderJob {
    /// Resolve `job` against its owning `set` and the project context.
    #[must_use]
    pub fn plan(job: &Job, set: &JobSet, paths: &ProjectPaths) -> Self {
        Self {
            name: job.name().to_string(),
            source: job.absolute_source(set, paths),
            destination: job.absolute_destination(set, paths),
            engine_name: job.engine_name().to_string(),
            params: job.params().to_vec(),
        }
    }

    /// Render this job: read the source, expand it with the named engine,
    /// and write the destination (creating missing parent directories).
    ///
    /// This is the sole side-effecting operation of a job and is safe to
    /// invoke independently of any other job; the task graph invokes it
    /// exactly once per build execution of the corresponding node.
    ///
    /// # Errors
    ///
    /// - [`StencilError::SourceRead`] when the source is unreadable
    /// - [`StencilError::EngineNotFound`] when the engine is unregistered;
    ///   no filesystem write has happened at that point
    /// - [`StencilError::EngineFailed`] when a custom engine errors
    /// - [`StencilError::DestinationWrite`] when the destination (or its
    ///   parent directories) cannot be written
    pub async fn render(&self, engines: &EngineRegistry) -> Result<(), StencilError> {
        tracing::debug!(source = %self.source.display(), "reading template source");
        let source_text = tokio::fs::read_to_string(&self.source).await.map_err(|source| {
            StencilError::SourceRead { path: self.source.clone(), source }
        })?;

        let engine = engines.resolve(&self.engine_name)?;
        let destination_text = engine.expand(&source_text, &self.params).map_err(|err| {
            StencilError::EngineFailed {
                name: self.engine_name.clone(),
                reason: format!("{err:#}"),
            }
        })?;

        atomic_write_text(&self.destination, &destination_text).map_err(|source| {
            StencilError::DestinationWrite { path: self.destination.clone(), source }
        })?;

        tracing::info!(
            source = %self.source.display(),
            destination = %self.destination.display(),
            "rendered template"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn plan_in(dir: &std::path::Path) -> (JobSet, ProjectPaths) {
        let mut set = JobSet::new("render-test");
        set.src_base("templates").dst_base("generated");
        let paths = ProjectPaths::with_build_dir(dir, dir.join("build"));
        (set, paths)
    }

    #[tokio::test]
    async fn renders_source_into_destination() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/config.txt.tpl"), "v=VERSION").unwrap();

        let (mut set, paths) = plan_in(dir.path());
        set.job("config.txt.tpl").dst("config.txt").param("VERSION", "1.2.3");
        let render = RenderJob::plan(&set.jobs()[0], &set, &paths);

        let engines = EngineRegistry::with_builtins();
        render.render(&engines).await.unwrap();

        let out = fs::read_to_string(dir.path().join("build/generated/config.txt")).unwrap();
        assert_eq!(out, "v=1.2.3");
        // The source is untouched.
        let src = fs::read_to_string(dir.path().join("templates/config.txt.tpl")).unwrap();
        assert_eq!(src, "v=VERSION");
    }

    #[tokio::test]
    async fn unknown_engine_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/a.tpl"), "text").unwrap();

        let (mut set, paths) = plan_in(dir.path());
        set.job("a.tpl").engine("does-not-exist");
        let render = RenderJob::plan(&set.jobs()[0], &set, &paths);

        let engines = EngineRegistry::with_builtins();
        let err = render.render(&engines).await.unwrap_err();
        assert!(matches!(err, StencilError::EngineNotFound { .. }), "got: {err}");
        // Nothing was written, not even the destination directory.
        assert!(!dir.path().join("build").exists());
    }

    #[tokio::test]
    async fn unreadable_source_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let (mut set, paths) = plan_in(dir.path());
        set.job("missing.tpl");
        let render = RenderJob::plan(&set.jobs()[0], &set, &paths);

        let engines = EngineRegistry::with_builtins();
        let err = render.render(&engines).await.unwrap_err();
        match err {
            StencilError::SourceRead { path, .. } => {
                assert!(path.ends_with("templates/missing.tpl"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn render_creates_nested_destination_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("templates/deep")).unwrap();
        fs::write(dir.path().join("templates/deep/a.tpl"), "A").unwrap();

        let (mut set, paths) = plan_in(dir.path());
        set.job("deep/a.tpl").param("A", "B");
        let render = RenderJob::plan(&set.jobs()[0], &set, &paths);

        let engines = EngineRegistry::with_builtins();
        render.render(&engines).await.unwrap();
        let out = fs::read_to_string(dir.path().join("build/generated/deep/a.tpl")).unwrap();
        assert_eq!(out, "B");
    }
}
