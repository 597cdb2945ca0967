//! On-demand execution of a task node and its dependency closure.
//!
//! The executor walks the closure in dependency order, keeping a pending
//! count per node and pushing every node whose dependencies are satisfied
//! into a [`FuturesUnordered`] fan-out, bounded by a semaphore. Nodes with
//! no body (aggregates) complete trivially without taking a permit.
//!
//! Failure propagation is the standard dependency-graph policy: a failed
//! node marks each transitive dependent as failed without running it, while
//! siblings that do not depend on the failure keep running to completion.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use super::{TaskGraph, TaskId};

/// One failed node: its name and the underlying error.
#[derive(Debug)]
pub struct TaskFailure {
    /// Name of the failed node.
    pub task: String,
    /// What went wrong - the node's own error, or a dependency-failure
    /// marker for nodes that never ran.
    pub error: anyhow::Error,
}

/// Outcome of one run: which nodes completed and which failed.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    /// Names of nodes that ran (or completed trivially) without error.
    pub succeeded: Vec<String>,
    /// Failed nodes, in completion order.
    pub failed: Vec<TaskFailure>,
}

impl ExecutionReport {
    /// Whether every node in the closure completed successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub(crate) async fn run(graph: &TaskGraph, target: TaskId, max_parallel: usize) -> ExecutionReport {
    // Dependency closure of the target; only these nodes run.
    let mut closure = HashSet::new();
    let mut stack = vec![target];
    while let Some(id) = stack.pop() {
        if closure.insert(id) {
            stack.extend(graph.dependencies(id));
        }
    }

    let mut pending: HashMap<TaskId, usize> =
        closure.iter().map(|&id| (id, graph.dependencies(id).count())).collect();

    let semaphore = Arc::new(Semaphore::new(max_parallel.max(1)));
    let mut running = FuturesUnordered::new();
    let mut failed: HashSet<TaskId> = HashSet::new();
    let mut report = ExecutionReport::default();

    for (&id, &count) in &pending {
        if count == 0 {
            running.push(launch(graph, id, Arc::clone(&semaphore)));
        }
    }

    while let Some((id, result)) = running.next().await {
        match result {
            Ok(()) => {
                tracing::debug!(task = graph.task_name(id), "task completed");
                report.succeeded.push(graph.task_name(id).to_string());
            }
            Err(error) => {
                tracing::error!(task = graph.task_name(id), %error, "task failed");
                failed.insert(id);
                report.failed.push(TaskFailure { task: graph.task_name(id).to_string(), error });
            }
        }

        // Release dependents; a dependent whose dependencies include a
        // failure inherits it without running, and completes in turn.
        let mut completed = vec![id];
        while let Some(done) = completed.pop() {
            for dependent in graph.dependents(done) {
                let Some(count) = pending.get_mut(&dependent) else {
                    continue; // outside the run closure
                };
                *count -= 1;
                if *count > 0 {
                    continue;
                }
                match graph.dependencies(dependent).find(|dep| failed.contains(dep)) {
                    Some(failed_dep) => {
                        failed.insert(dependent);
                        report.failed.push(TaskFailure {
                            task: graph.task_name(dependent).to_string(),
                            error: anyhow::anyhow!(
                                "dependency task '{}' failed",
                                graph.task_name(failed_dep)
                            ),
                        });
                        completed.push(dependent);
                    }
                    None => {
                        running.push(launch(graph, dependent, Arc::clone(&semaphore)));
                    }
                }
            }
        }
    }

    report
}

/// Turn a node into a future resolving to `(id, outcome)`. The body future
/// is created up front (it is inert until polled) so the returned future
/// does not borrow the graph.
fn launch(
    graph: &TaskGraph,
    id: TaskId,
    semaphore: Arc<Semaphore>,
) -> BoxFuture<'static, (TaskId, anyhow::Result<()>)> {
    let body = graph.action(id).map(|action| action());
    async move {
        match body {
            Some(future) => {
                let _permit = semaphore.acquire_owned().await.ok();
                (id, future.await)
            }
            None => (id, Ok(())),
        }
    }
    .boxed()
}
