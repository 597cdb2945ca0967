//! Collision-free task name generation.
//!
//! Every node this crate registers is namespaced under a task prefix, and
//! generated names must be unique in the host graph's flat namespace. The
//! generator appends a growing numeric suffix until a free candidate is
//! found, so it has no failure mode. The suffix carries no meaning beyond
//! disambiguation.

use super::TaskGraph;

/// Generates unique task names under a fixed prefix.
///
/// The generator is a pure function of the graph's current namespace: it
/// re-checks registered names on every call rather than caching or counting,
/// because registrations happen interleaved with generation as the job tree
/// is walked. Two calls in the same namespace state return the same name;
/// registering the first result is what makes the second call move on.
pub struct TaskNameGenerator {
    prefix: String,
}

impl TaskNameGenerator {
    /// Create a generator for the given task prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// The task prefix all generated names start with.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Generate a unique name for `base`: `{prefix}-{base}`, then
    /// `{prefix}-{base}-1`, `-2`, ... until unregistered.
    #[must_use]
    pub fn generate(&self, graph: &TaskGraph, base: &str) -> String {
        first_free(graph, &format!("{}-{base}", self.prefix))
    }

    /// Generate a unique name for the root node: the bare prefix, then
    /// `{prefix}-1`, `-2`, ...
    #[must_use]
    pub fn generate_root(&self, graph: &TaskGraph) -> String {
        first_free(graph, &self.prefix)
    }
}

fn first_free(graph: &TaskGraph, stem: &str) -> String {
    let mut idx = 0usize;
    loop {
        let candidate =
            if idx == 0 { stem.to_string() } else { format!("{stem}-{idx}") };
        if !graph.contains_task(&candidate) {
            tracing::debug!(task = %candidate, "generated task name");
            return candidate;
        }
        idx += 1;
    }
}
