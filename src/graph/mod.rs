//! The build task graph.
//!
//! This is the host-capability surface the wiring layer consumes: register a
//! node under a unique name, add dependency edges, attach an executable
//! body, query the live namespace, and run a target node on demand. Node
//! identity ([`TaskId`], a name, its edges) is kept separate from the body
//! (a boxed async closure), so core logic stays constructible and testable
//! without any graph object.
//!
//! Scheduling guarantees, and nothing more:
//! - every node reachable from the run target executes exactly once
//! - dependencies complete before their dependents start
//! - independent nodes may run concurrently (bounded by `max_parallel`)
//! - a failing node fails its transitive dependents; unrelated nodes and
//!   already-running siblings are unaffected
//!
//! There are no retries, no timeouts, and no rollback; a node failure is
//! reported with the node name and the underlying error.

pub mod executor;
pub mod names;

pub use executor::{ExecutionReport, TaskFailure};
pub use names::TaskNameGenerator;

use std::collections::HashMap;

use futures::future::BoxFuture;
use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::StencilError;

/// Future returned by a task body.
pub type TaskFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Executable body of a task node.
///
/// Bodies are `Fn` (not `FnOnce`) because the graph may be run more than
/// once per process in tests; within a single run each body is invoked
/// exactly once.
pub type TaskAction = Box<dyn Fn() -> TaskFuture + Send + Sync>;

/// Handle to a registered task node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(NodeIndex);

struct TaskNode {
    name: String,
    action: Option<TaskAction>,
}

/// Dependency-ordered task graph with a flat, unique name namespace.
#[derive(Default)]
pub struct TaskGraph {
    graph: DiGraph<TaskNode, ()>,
    names: HashMap<String, TaskId>,
}

impl TaskGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under `name`, optionally with an executable body.
    /// Nodes without a body (aggregate nodes) complete trivially.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::DuplicateTaskName`] if the name is taken;
    /// collision-free names come from [`TaskNameGenerator`].
    pub fn register_task(
        &mut self,
        name: &str,
        action: Option<TaskAction>,
    ) -> Result<TaskId, StencilError> {
        if self.names.contains_key(name) {
            return Err(StencilError::DuplicateTaskName { name: name.to_string() });
        }
        let id = TaskId(self.graph.add_node(TaskNode { name: name.to_string(), action }));
        self.names.insert(name.to_string(), id);
        tracing::debug!(task = name, "registered task");
        Ok(id)
    }

    /// Make `task` depend on `depends_on`. Duplicate edges are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::DependencyCycle`] if the edge would close a
    /// cycle (including self-dependency).
    pub fn add_dependency(
        &mut self,
        task: TaskId,
        depends_on: TaskId,
    ) -> Result<(), StencilError> {
        if task == depends_on || has_path_connecting(&self.graph, depends_on.0, task.0, None) {
            return Err(StencilError::DependencyCycle {
                task: self.task_name(task).to_string(),
                depends_on: self.task_name(depends_on).to_string(),
            });
        }
        if self.graph.find_edge(task.0, depends_on.0).is_none() {
            self.graph.add_edge(task.0, depends_on.0, ());
        }
        Ok(())
    }

    /// Whether a node with this exact name is currently registered.
    ///
    /// This is the live namespace query the name generator re-checks on
    /// every call; the namespace grows as sibling nodes register.
    #[must_use]
    pub fn contains_task(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Look up a node by name.
    #[must_use]
    pub fn find_task(&self, name: &str) -> Option<TaskId> {
        self.names.get(name).copied()
    }

    /// Currently registered node names, sorted.
    #[must_use]
    pub fn task_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Name of a registered node.
    #[must_use]
    pub fn task_name(&self, id: TaskId) -> &str {
        &self.graph[id.0].name
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Run `target` and its dependency closure.
    ///
    /// See the module docs for the scheduling guarantees. `max_parallel`
    /// bounds how many bodies execute concurrently; it is clamped to at
    /// least 1.
    pub async fn run(&self, target: TaskId, max_parallel: usize) -> ExecutionReport {
        executor::run(self, target, max_parallel).await
    }

    pub(crate) fn dependencies(&self, id: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.graph.neighbors_directed(id.0, Direction::Outgoing).map(TaskId)
    }

    pub(crate) fn dependents(&self, id: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.graph.neighbors_directed(id.0, Direction::Incoming).map(TaskId)
    }

    pub(crate) fn action(&self, id: TaskId) -> Option<&TaskAction> {
        self.graph[id.0].action.as_ref()
    }
}
