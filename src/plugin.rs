//! The user-facing plugin: declarative configuration plus task wiring.
//!
//! Configuration happens in two phases, deliberately separated:
//!
//! 1. **Declare**: closures populate [`JobSet`] builders (`custom`, `group`,
//!    `java`); custom engines are registered by name. Pure data, no I/O, no
//!    graph.
//! 2. **Wire**: [`StencilPlugin::apply`] consumes the plugin, walks the
//!    declared tree, and registers every node and edge in the given
//!    [`TaskGraph`], returning the root node the host build attaches its
//!    compile steps to.
//!
//! The engine registry is owned by the plugin instance and handed to the
//! wiring layer by reference - there is no global registry. Engines may be
//! registered at any point of the declare phase; lookup only happens when a
//! job node actually runs.

use std::sync::Arc;

use crate::core::StencilError;
use crate::engine::{EngineRegistry, TemplateEngine};
use crate::graph::{TaskGraph, TaskId};
use crate::job::JobSet;
use crate::project::{CompileModel, ProjectPaths};
use crate::runner::JobRunner;

/// Default task prefix for all generated node names.
pub const DEFAULT_TASK_PREFIX: &str = "stencil";

/// Source base pre-filled by the java preset.
pub const JAVA_SRC_BASE: &str = "src/main/java-templates";

/// Destination base pre-filled by the java preset.
pub const JAVA_DST_BASE: &str = "generated/sourceTemplate/java";

/// Build-time template expansion plugin.
///
/// ```
/// use stencil::graph::TaskGraph;
/// use stencil::plugin::StencilPlugin;
/// use stencil::project::{ProjectPaths, RecordedSourceRoots};
///
/// let mut plugin = StencilPlugin::new();
/// plugin.group("config", |set| {
///     set.src_base("templates").dst_base("generated");
///     set.job("config.txt.tpl").dst("config.txt").param("VERSION", "1.2.3");
/// });
///
/// let mut graph = TaskGraph::new();
/// let mut compile = RecordedSourceRoots::default();
/// let paths = ProjectPaths::new("/my/project");
/// let root = plugin.apply(&mut graph, &paths, &mut compile).unwrap();
/// assert_eq!(graph.task_name(root), "stencil");
/// ```
pub struct StencilPlugin {
    engines: EngineRegistry,
    task_prefix: String,
    job_sets: Vec<JobSet>,
}

impl StencilPlugin {
    /// Create a plugin with the built-in engines and the default prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::with_task_prefix(DEFAULT_TASK_PREFIX)
    }

    /// Create a plugin whose generated task names use `prefix`.
    #[must_use]
    pub fn with_task_prefix(prefix: impl Into<String>) -> Self {
        Self {
            engines: EngineRegistry::with_builtins(),
            task_prefix: prefix.into(),
            job_sets: Vec::new(),
        }
    }

    /// The prefix generated node names start with.
    #[must_use]
    pub fn task_prefix(&self) -> &str {
        &self.task_prefix
    }

    /// Register a custom template engine under `name`.
    ///
    /// May be called any time before [`apply`](Self::apply); jobs referring
    /// to `name` resolve it when their node runs.
    pub fn add_engine(
        &mut self,
        name: impl Into<String>,
        engine: impl TemplateEngine + 'static,
    ) -> &mut Self {
        self.engines.register(name, engine);
        self
    }

    /// Engines registered so far.
    #[must_use]
    pub fn engines(&self) -> &EngineRegistry {
        &self.engines
    }

    /// Declare a job set not configured for any programming language.
    pub fn custom(&mut self, configure: impl FnOnce(&mut JobSet)) -> &mut Self {
        let mut set = JobSet::default();
        configure(&mut set);
        self.add_job_set(set)
    }

    /// Declare a custom job set under an explicit logical name.
    pub fn group(&mut self, name: impl Into<String>, configure: impl FnOnce(&mut JobSet)) -> &mut Self {
        let mut set = JobSet::new(name);
        configure(&mut set);
        self.add_job_set(set)
    }

    /// Declare a java job set: bases pre-filled with the conventional
    /// template and generated-source directories (the closure may override
    /// them), and the resolved destination base is registered with the host
    /// compile model as an additional source root at apply time.
    pub fn java(&mut self, configure: impl FnOnce(&mut JobSet)) -> &mut Self {
        self.java_group("java", configure)
    }

    /// [`java`](Self::java) with an explicit logical name.
    pub fn java_group(
        &mut self,
        name: impl Into<String>,
        configure: impl FnOnce(&mut JobSet),
    ) -> &mut Self {
        let mut set = JobSet::new(name);
        set.src_base(JAVA_SRC_BASE).dst_base(JAVA_DST_BASE).register_outputs_as_source_root();
        configure(&mut set);
        self.add_job_set(set)
    }

    /// Add an already-built job set.
    pub fn add_job_set(&mut self, set: JobSet) -> &mut Self {
        self.job_sets.push(set);
        self
    }

    /// Job sets declared so far, in declaration order.
    #[must_use]
    pub fn job_sets(&self) -> &[JobSet] {
        &self.job_sets
    }

    /// Wire the declared tree into `graph` and return the root node.
    ///
    /// Consumes the plugin: the configuration phase ends here and the
    /// engine registry becomes shared, read-only state of the job nodes.
    /// Sets flagged by a preset register their resolved destination base
    /// with `compile`.
    ///
    /// # Errors
    ///
    /// Propagates node-registration failures from the graph.
    pub fn apply(
        self,
        graph: &mut TaskGraph,
        paths: &ProjectPaths,
        compile: &mut dyn CompileModel,
    ) -> Result<TaskId, StencilError> {
        let engines = Arc::new(self.engines);
        let mut runner = JobRunner::new(graph, &self.task_prefix, engines, paths.clone());
        let root = runner.wire_root(&self.job_sets)?;

        for set in &self.job_sets {
            if set.registers_source_root() {
                compile.add_generated_source_root(set.absolute_dst_base(paths));
            }
        }

        Ok(root)
    }
}

impl Default for StencilPlugin {
    fn default() -> Self {
        Self::new()
    }
}
