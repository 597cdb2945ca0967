//! Template jobs and job sets.
//!
//! A [`Job`] describes one file rendering unit: source path, destination
//! path, chosen engine, and an ordered parameter list. Jobs are plain
//! configuration data - declaring one performs no I/O. A [`JobSet`] groups
//! jobs that share base source/destination directories under a logical name.
//!
//! Path resolution is deferred: a job's absolute paths are computable only
//! once the owning set's bases have been resolved against [`ProjectPaths`],
//! which the wiring layer does when the project context becomes available.
//! Absolute paths supplied directly bypass base resolution entirely.

mod render;

pub use render::RenderJob;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::engine;
use crate::project::ProjectPaths;

/// Default logical name for job sets created without one.
pub const DEFAULT_GROUP_NAME: &str = "custom";

/// Describes a single file template processing unit.
///
/// Built through [`JobSet::job`] and configured fluently:
///
/// ```
/// use stencil::job::JobSet;
///
/// let mut set = JobSet::new("config");
/// set.job("config.txt.tpl").dst("config.txt").param("VERSION", "1.2.3");
/// ```
pub struct Job {
    /// Task base name; captured from the initial source file name and not
    /// updated by later `src()` calls.
    name: String,
    source: PathBuf,
    destination: PathBuf,
    engine_name: String,
    /// Ordered key/value pairs; order is the substitution order.
    params: Vec<(String, String)>,
}

impl Job {
    fn new(source: PathBuf, destination: PathBuf) -> Self {
        let name = source
            .file_name()
            .map_or_else(|| source.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self {
            name,
            source,
            destination,
            engine_name: engine::REPLACE.to_string(),
            params: Vec::new(),
        }
    }

    /// Select the template engine by name.
    ///
    /// The name must identify a built-in engine or a custom engine added to
    /// the plugin before this job executes.
    pub fn engine(&mut self, name: impl Into<String>) -> &mut Self {
        self.engine_name = name.into();
        self
    }

    /// Set the source file location, relative to the owning set's source
    /// base directory (or absolute).
    pub fn src(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.source = path.into();
        self
    }

    /// Set the destination file location, relative to the owning set's
    /// destination base directory (or absolute).
    pub fn dst(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.destination = path.into();
        self
    }

    /// Set a template parameter. Any displayable value is accepted and
    /// stored in string form.
    ///
    /// Parameters apply in insertion order. Setting an existing key updates
    /// its value in place, keeping the original position.
    pub fn param(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    /// Task base name for this job.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured source path, before base resolution.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Configured destination path, before base resolution.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Name of the engine this job renders with.
    #[must_use]
    pub fn engine_name(&self) -> &str {
        &self.engine_name
    }

    /// Ordered parameter list.
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Absolute source path: the configured path if absolute, otherwise the
    /// owning set's resolved source base joined with it.
    #[must_use]
    pub fn absolute_source(&self, set: &JobSet, paths: &ProjectPaths) -> PathBuf {
        if self.source.is_absolute() {
            self.source.clone()
        } else {
            set.absolute_src_base(paths).join(&self.source)
        }
    }

    /// Absolute destination path, symmetric to [`absolute_source`](Self::absolute_source)
    /// using the destination base.
    #[must_use]
    pub fn absolute_destination(&self, set: &JobSet, paths: &ProjectPaths) -> PathBuf {
        if self.destination.is_absolute() {
            self.destination.clone()
        } else {
            set.absolute_dst_base(paths).join(&self.destination)
        }
    }
}

impl fmt::Display for Job {
    /// Human-readable description: `source->destination:{K=V, ...}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}:{{", self.source.display(), self.destination.display())?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, "}}")
    }
}

/// A named collection of jobs sharing base source and destination
/// directories.
///
/// Every job in a set resolves relative paths against the same two bases.
/// An unset source base defaults to the project directory; an unset
/// destination base defaults to the build output directory.
pub struct JobSet {
    /// Logical name; the set's task name is generated from it.
    pub name: String,
    src_base: Option<PathBuf>,
    dst_base: Option<PathBuf>,
    jobs: Vec<Job>,
    register_source_root: bool,
}

impl JobSet {
    /// Create an empty set with the given logical name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            src_base: None,
            dst_base: None,
            jobs: Vec::new(),
            register_source_root: false,
        }
    }

    /// Set the base directory for job source files.
    pub fn src_base(&mut self, base: impl Into<PathBuf>) -> &mut Self {
        self.src_base = Some(base.into());
        self
    }

    /// Set the base directory for job destination files.
    pub fn dst_base(&mut self, base: impl Into<PathBuf>) -> &mut Self {
        self.dst_base = Some(base.into());
        self
    }

    /// After wiring, register the resolved destination base with the host
    /// compile model as an additional generated-source root. Used by
    /// language presets.
    pub fn register_outputs_as_source_root(&mut self) -> &mut Self {
        self.register_source_root = true;
        self
    }

    /// Whether this set asks for its destination base to become a compiler
    /// input directory.
    #[must_use]
    pub fn registers_source_root(&self) -> bool {
        self.register_source_root
    }

    /// Create a new job with destination defaulting to the source path.
    ///
    /// The default means the same relative path under the destination base.
    /// When the set's bases differ, that is a different physical file, so
    /// the source is not overwritten.
    pub fn job(&mut self, src: impl Into<PathBuf>) -> &mut Job {
        let src = src.into();
        let job = Job::new(src.clone(), src);
        self.jobs.push(job);
        self.jobs.last_mut().expect("job was just pushed")
    }

    /// Jobs declared so far, in declaration order.
    #[must_use]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Resolved absolute source base: the project directory when unset, the
    /// configured base verbatim when absolute, otherwise the configured base
    /// joined onto the project directory.
    #[must_use]
    pub fn absolute_src_base(&self, paths: &ProjectPaths) -> PathBuf {
        match &self.src_base {
            None => paths.project_dir.clone(),
            Some(base) if base.is_absolute() => base.clone(),
            Some(base) => paths.project_dir.join(base),
        }
    }

    /// Resolved absolute destination base; as
    /// [`absolute_src_base`](Self::absolute_src_base) but defaulting to the
    /// build output directory.
    #[must_use]
    pub fn absolute_dst_base(&self, paths: &ProjectPaths) -> PathBuf {
        match &self.dst_base {
            None => paths.build_dir.clone(),
            Some(base) if base.is_absolute() => base.clone(),
            Some(base) => paths.build_dir.join(base),
        }
    }
}

impl Default for JobSet {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP_NAME)
    }
}
