//! The declarative manifest (`stencil.toml`).
//!
//! The manifest is the CLI's configuration surface: it declares template
//! groups and their jobs, and converts into a [`StencilPlugin`] ready to be
//! applied to a task graph. Library users configuring programmatically can
//! skip it entirely.
//!
//! # Format
//!
//! ```toml
//! task-prefix = "stencil"        # optional
//!
//! [[group]]
//! name = "config"                # optional, defaults to "custom"
//! src-base = "templates"         # optional, defaults to the project dir
//! dst-base = "generated"         # optional, defaults to the build dir
//!
//! [[group.job]]
//! src = "config.txt.tpl"
//! dst = "config.txt"             # optional, defaults to src
//! engine = "replace"             # optional
//! params = [
//!     { key = "VERSION", value = "1.2.3" },
//! ]
//! ```
//!
//! Parameters are an array of key/value tables rather than a TOML table so
//! that their order - which is the substitution order - is explicit and
//! preserved. A group may also declare `preset = "java"` to take the java
//! preset's base directories and generated-source-root registration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::StencilError;
use crate::job::JobSet;
use crate::plugin::{DEFAULT_TASK_PREFIX, StencilPlugin};

/// Conventional manifest file name.
pub const MANIFEST_FILE: &str = "stencil.toml";

/// Parsed `stencil.toml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Manifest {
    /// Prefix for all generated task names.
    #[serde(default = "default_task_prefix")]
    pub task_prefix: String,

    /// Declared template groups.
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupConfig>,
}

/// One `[[group]]` entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct GroupConfig {
    /// Logical group name; the group's task name is generated from it.
    pub name: Option<String>,

    /// Language preset to apply before the explicit settings.
    pub preset: Option<Preset>,

    /// Base directory for job sources.
    pub src_base: Option<PathBuf>,

    /// Base directory for job destinations.
    pub dst_base: Option<PathBuf>,

    /// Jobs in this group.
    #[serde(default, rename = "job")]
    pub jobs: Vec<JobConfig>,
}

/// Language presets a group can opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Java source templates: conventional bases plus generated-source-root
    /// registration.
    Java,
}

/// One `[[group.job]]` entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct JobConfig {
    /// Source file, relative to the group's source base (or absolute).
    pub src: PathBuf,

    /// Destination file; defaults to `src` under the destination base.
    pub dst: Option<PathBuf>,

    /// Engine name; defaults to the built-in replace engine.
    pub engine: Option<String>,

    /// Ordered substitution parameters.
    #[serde(default)]
    pub params: Vec<ParamConfig>,
}

/// A single ordered key/value parameter.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamConfig {
    pub key: String,
    pub value: String,
}

fn default_task_prefix() -> String {
    DEFAULT_TASK_PREFIX.to_string()
}

impl Manifest {
    /// Load and validate a manifest from `path`.
    ///
    /// # Errors
    ///
    /// - [`StencilError::ManifestNotFound`] when the file does not exist
    /// - [`StencilError::ManifestParse`] on TOML or schema errors
    /// - [`StencilError::ManifestValidation`] on structural rule violations
    pub fn load(path: &Path) -> Result<Self, StencilError> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                StencilError::ManifestNotFound { path: path.to_path_buf() }
            } else {
                StencilError::Io(err)
            }
        })?;

        let manifest: Self = toml::from_str(&content).map_err(|err| {
            StencilError::ManifestParse { path: path.to_path_buf(), reason: err.to_string() }
        })?;

        manifest.validate()?;
        tracing::debug!(
            manifest = %path.display(),
            groups = manifest.groups.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// Check structural rules: at least one group, every group has at least
    /// one job, and no empty names or paths.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::ManifestValidation`] naming the first
    /// violated rule.
    pub fn validate(&self) -> Result<(), StencilError> {
        if self.task_prefix.is_empty() {
            return Err(validation("task-prefix must not be empty"));
        }
        if self.groups.is_empty() {
            return Err(validation("manifest declares no [[group]] entries"));
        }
        for group in &self.groups {
            let label = group.label().to_string();
            if group.name.as_deref() == Some("") {
                return Err(validation("group name must not be empty"));
            }
            if group.jobs.is_empty() {
                return Err(validation(format!(
                    "group '{label}' declares no [[group.job]] entries"
                )));
            }
            for job in &group.jobs {
                if job.src.as_os_str().is_empty() {
                    return Err(validation(format!("group '{label}' has a job with an empty src")));
                }
                if let Some(engine) = &job.engine {
                    if engine.is_empty() {
                        return Err(validation(format!(
                            "group '{label}': job '{}' has an empty engine name",
                            job.src.display()
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Build the plugin described by this manifest.
    #[must_use]
    pub fn into_plugin(self) -> StencilPlugin {
        let mut plugin = StencilPlugin::with_task_prefix(self.task_prefix);
        for group in self.groups {
            plugin.add_job_set(group.into_job_set());
        }
        plugin
    }
}

fn validation(reason: impl Into<String>) -> StencilError {
    StencilError::ManifestValidation { reason: reason.into() }
}

impl GroupConfig {
    /// Display label for diagnostics: the name, or the preset/default name
    /// the group will get.
    #[must_use]
    pub fn label(&self) -> &str {
        match (&self.name, self.preset) {
            (Some(name), _) => name,
            (None, Some(Preset::Java)) => "java",
            (None, None) => crate::job::DEFAULT_GROUP_NAME,
        }
    }

    fn into_job_set(self) -> JobSet {
        let mut set = JobSet::new(self.label().to_string());
        if let Some(Preset::Java) = self.preset {
            set.src_base(crate::plugin::JAVA_SRC_BASE)
                .dst_base(crate::plugin::JAVA_DST_BASE)
                .register_outputs_as_source_root();
        }
        if let Some(base) = self.src_base {
            set.src_base(base);
        }
        if let Some(base) = self.dst_base {
            set.dst_base(base);
        }
        for job_config in self.jobs {
            let job = set.job(job_config.src);
            if let Some(dst) = job_config.dst {
                job.dst(dst);
            }
            if let Some(engine) = job_config.engine {
                job.engine(engine);
            }
            for param in job_config.params {
                job.param(param.key, param.value);
            }
        }
        set
    }
}
