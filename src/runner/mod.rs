//! Task wiring: turning the declared job tree into graph nodes.
//!
//! The runner walks job sets, registers one leaf node per job (body: render
//! that job), one aggregate node per set, and one root node over all sets,
//! wiring dependency edges bottom-up:
//!
//! ```text
//! root -> group (one per job set) -> leaf (one per job)
//! ```
//!
//! The root node is the single attachment point exposed to the host build;
//! once it is satisfied, every configured job's destination file exists and
//! reflects the latest source and parameters. Sibling leaves carry no edges
//! between each other - each writes only its own destination - so the
//! scheduler is free to run them in any order or in parallel.
//!
//! All node names come from the [`TaskNameGenerator`], seeded with the set's
//! logical name for groups and the job's name for leaves, so registration
//! can never collide.

use std::sync::Arc;

use futures::FutureExt;

use crate::core::StencilError;
use crate::engine::EngineRegistry;
use crate::graph::{TaskAction, TaskGraph, TaskId, TaskNameGenerator};
use crate::job::{Job, JobSet, RenderJob};
use crate::project::ProjectPaths;

/// Wires jobs and job sets into a task graph.
pub struct JobRunner<'g> {
    graph: &'g mut TaskGraph,
    names: TaskNameGenerator,
    engines: Arc<EngineRegistry>,
    paths: ProjectPaths,
}

impl<'g> JobRunner<'g> {
    /// Create a runner registering nodes under `task_prefix`.
    pub fn new(
        graph: &'g mut TaskGraph,
        task_prefix: &str,
        engines: Arc<EngineRegistry>,
        paths: ProjectPaths,
    ) -> Self {
        Self { graph, names: TaskNameGenerator::new(task_prefix), engines, paths }
    }

    /// Register the root node, then wire every job set beneath it.
    ///
    /// The root carries the bare task prefix as its name (suffixed only if
    /// something else already took it) and depends on each set's group
    /// node.
    ///
    /// # Errors
    ///
    /// Propagates registration failures from the graph; with generated
    /// names these do not occur in practice.
    pub fn wire_root(&mut self, sets: &[JobSet]) -> Result<TaskId, StencilError> {
        let root_name = self.names.generate_root(self.graph);
        let root = self.graph.register_task(&root_name, None)?;
        for set in sets {
            let group = self.wire_job_set(set)?;
            self.graph.add_dependency(root, group)?;
        }
        tracing::debug!(root = %root_name, sets = sets.len(), "wired template job tree");
        Ok(root)
    }

    /// Register one aggregate node for `set` plus a leaf node per job, with
    /// edges group -> leaf.
    ///
    /// # Errors
    ///
    /// Propagates registration failures from the graph.
    pub fn wire_job_set(&mut self, set: &JobSet) -> Result<TaskId, StencilError> {
        let group_name = self.names.generate(self.graph, &set.name);
        let group = self.graph.register_task(&group_name, None)?;
        for job in set.jobs() {
            let leaf = self.wire_job(job, set)?;
            self.graph.add_dependency(group, leaf)?;
        }
        tracing::debug!(group = %group_name, jobs = set.jobs().len(), "wired job set");
        Ok(group)
    }

    fn wire_job(&mut self, job: &Job, set: &JobSet) -> Result<TaskId, StencilError> {
        // Resolve paths now, while the project context is at hand; the node
        // body captures only self-contained data.
        let plan = RenderJob::plan(job, set, &self.paths);
        let engines = Arc::clone(&self.engines);
        let action: TaskAction = Box::new(move || {
            let plan = plan.clone();
            let engines = Arc::clone(&engines);
            async move { plan.render(&engines).await.map_err(anyhow::Error::from) }.boxed()
        });

        let name = self.names.generate(self.graph, job.name());
        self.graph.register_task(&name, Some(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;

    fn runner_fixture(graph: &mut TaskGraph) -> JobRunner<'_> {
        JobRunner::new(
            graph,
            "stencil",
            Arc::new(EngineRegistry::with_builtins()),
            ProjectPaths::new("/proj"),
        )
    }

    #[test]
    fn wires_root_group_and_leaf_nodes() {
        let mut set = JobSet::new("config");
        set.job("a.tpl");
        set.job("b.tpl");

        let mut graph = TaskGraph::new();
        let root = runner_fixture(&mut graph).wire_root(std::slice::from_ref(&set)).unwrap();

        assert_eq!(graph.task_name(root), "stencil");
        assert_eq!(
            graph.task_names(),
            vec!["stencil", "stencil-a.tpl", "stencil-b.tpl", "stencil-config"]
        );

        let group = graph.find_task("stencil-config").unwrap();
        let group_deps: Vec<&str> =
            graph.dependencies(group).map(|id| graph.task_name(id)).collect();
        assert_eq!(group_deps.len(), 2);
        assert!(group_deps.contains(&"stencil-a.tpl"));
        assert!(group_deps.contains(&"stencil-b.tpl"));

        let root_deps: Vec<&str> = graph.dependencies(root).map(|id| graph.task_name(id)).collect();
        assert_eq!(root_deps, vec!["stencil-config"]);
    }

    #[test]
    fn colliding_job_names_get_numeric_suffixes() {
        // Two jobs whose default names collide (same source file name in
        // different directories).
        let mut set = JobSet::new("dup");
        set.job("one/config.tpl");
        set.job("two/config.tpl");

        let mut graph = TaskGraph::new();
        runner_fixture(&mut graph).wire_job_set(&set).unwrap();

        assert!(graph.contains_task("stencil-config.tpl"));
        assert!(graph.contains_task("stencil-config.tpl-1"));
    }

    #[test]
    fn group_name_collides_with_sibling_group() {
        let mut first = JobSet::new("custom");
        first.job("a.tpl");
        let mut second = JobSet::new("custom");
        second.job("b.tpl");

        let mut graph = TaskGraph::new();
        runner_fixture(&mut graph).wire_root(&[first, second]).unwrap();

        assert!(graph.contains_task("stencil-custom"));
        assert!(graph.contains_task("stencil-custom-1"));
    }

    #[tokio::test]
    async fn leaf_bodies_render_their_job() {
        // The closure wired into a leaf node must be exactly the job's
        // render; exercise one through the graph against a real directory.
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("greeting.tpl"), "hello NAME").unwrap();

        let mut set = JobSet::new("greetings");
        set.job("greeting.tpl").dst("greeting.txt").param("NAME", "world");
        assert_eq!(set.jobs()[0].engine_name(), engine::REPLACE);

        let mut graph = TaskGraph::new();
        let mut runner = JobRunner::new(
            &mut graph,
            "stencil",
            Arc::new(EngineRegistry::with_builtins()),
            ProjectPaths::with_build_dir(dir.path(), dir.path().join("out")),
        );
        let group = runner.wire_job_set(&set).unwrap();

        let report = graph.run(group, 2).await;
        assert!(report.is_success(), "failures: {:?}", report.failed);
        let rendered = std::fs::read_to_string(dir.path().join("out/greeting.txt")).unwrap();
        assert_eq!(rendered, "hello world");
    }
}
