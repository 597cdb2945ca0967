//! stencil - build-time template expansion wired into a task graph.
//!
//! stencil renders declared template jobs (source file, destination file,
//! named parameters, substitution engine) into destination files, and
//! exposes each rendering operation as a node in a dependency-ordered task
//! graph so consuming build steps can depend on it.
//!
//! # Architecture Overview
//!
//! Configuration is declarative and separated from execution:
//! - A [`plugin::StencilPlugin`] collects template groups ([`job::JobSet`])
//!   and jobs ([`job::Job`]) through builder closures, plus any custom
//!   engines - pure data, no I/O.
//! - `apply()` wires the declared tree into a [`graph::TaskGraph`]: one
//!   leaf node per job, one aggregate node per group, one root node over
//!   everything, with collision-free generated names.
//! - Running the root node renders every job - reading the source,
//!   expanding it through the named engine, and atomically writing the
//!   destination - with independent jobs running in parallel.
//!
//! ```text
//! root ("stencil") -> group ("stencil-<set>") -> leaf ("stencil-<job>")
//! ```
//!
//! Every build invocation re-renders every configured job; ordering and
//! caching beyond that are the task graph's business. There is no manifest
//! of outputs, no checksum cache, and no retry logic.
//!
//! # Core Modules
//!
//! - [`engine`] - named substitution strategies and the engine registry
//! - [`job`] - jobs, job sets, and deferred path resolution
//! - [`graph`] - the task graph: nodes, edges, names, on-demand execution
//! - [`runner`] - wiring jobs and sets into graph nodes
//! - [`plugin`] - the user-facing configuration surface
//! - [`manifest`] - the `stencil.toml` declarative surface for the CLI
//! - [`project`] - project/build roots and the compile-model collaborator
//! - [`core`] - error types shared by everything above
//!
//! # Example
//!
//! ```
//! use stencil::graph::TaskGraph;
//! use stencil::plugin::StencilPlugin;
//! use stencil::project::{ProjectPaths, RecordedSourceRoots};
//!
//! let mut plugin = StencilPlugin::new();
//! plugin.custom(|set| {
//!     set.src_base("templates").dst_base("generated");
//!     set.job("config.txt.tpl").dst("config.txt").param("VERSION", "1.2.3");
//! });
//!
//! let mut graph = TaskGraph::new();
//! let mut compile = RecordedSourceRoots::default();
//! let root = plugin
//!     .apply(&mut graph, &ProjectPaths::new("/my/project"), &mut compile)
//!     .unwrap();
//! // graph.run(root, max_parallel).await renders everything.
//! # let _ = root;
//! ```

pub mod cli;
pub mod core;
pub mod engine;
pub mod graph;
pub mod job;
pub mod manifest;
pub mod plugin;
pub mod project;
pub mod runner;
pub mod utils;
