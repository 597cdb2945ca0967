//! Error handling for stencil.
//!
//! Two types carry the error story:
//! 1. [`StencilError`] - strongly-typed failures for every operation in the crate
//! 2. [`ErrorContext`] - a wrapper that adds a user-facing suggestion and details
//!
//! Library code returns [`StencilError`] (or `anyhow::Error` at application
//! boundaries); the CLI converts whatever bubbles up through
//! [`user_friendly_error`] into an [`ErrorContext`] for colored display.
//!
//! Failure locality follows the task-graph model: an error raised while
//! rendering one job fails that job's node and, transitively, the aggregate
//! nodes above it. Nothing is rolled back and nothing is retried; destination
//! files are written atomically, so a failed node leaves either the previous
//! content or no file, never a partial write.

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for stencil operations.
///
/// Variants map onto the failure kinds of the system:
/// - configuration errors: [`EngineNotFound`](Self::EngineNotFound) and the
///   manifest variants
/// - I/O errors: [`SourceRead`](Self::SourceRead) and
///   [`DestinationWrite`](Self::DestinationWrite)
/// - task-graph registration errors: [`DuplicateTaskName`](Self::DuplicateTaskName)
///   and [`DependencyCycle`](Self::DependencyCycle)
///
/// Name generation has no failure mode: the generator grows a numeric suffix
/// until a free name is found, so no variant exists for it.
#[derive(Debug, Error)]
pub enum StencilError {
    /// A job referenced a template engine that is not registered.
    ///
    /// Raised at render time, never at configuration time, since engines may
    /// be registered lazily up to the point the first job executes.
    #[error("no such template engine: [{name}]")]
    EngineNotFound {
        /// The engine name the job asked for.
        name: String,
        /// Names currently registered, used for suggestions.
        available: Vec<String>,
    },

    /// A registered engine failed while expanding a template.
    #[error("template engine '{name}' failed: {reason}")]
    EngineFailed { name: String, reason: String },

    /// The job's source file could not be read.
    #[error("failed to read template source {}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rendered output could not be written, including failure to create
    /// the destination's parent directories.
    #[error("failed to write rendered output {}", path.display())]
    DestinationWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A task with this exact name is already registered in the graph.
    ///
    /// The wiring layer never produces this because it names every node
    /// through the generator; it exists for direct graph users.
    #[error("task name already registered: '{name}'")]
    DuplicateTaskName { name: String },

    /// Adding this dependency edge would close a cycle.
    #[error("dependency edge '{task}' -> '{depends_on}' would create a cycle")]
    DependencyCycle { task: String, depends_on: String },

    /// No manifest file at the expected location.
    #[error("manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    /// The manifest file exists but is not valid TOML for our schema.
    #[error("failed to parse manifest {}: {reason}", path.display())]
    ManifestParse { path: PathBuf, reason: String },

    /// The manifest parsed but violates a structural rule.
    #[error("invalid manifest: {reason}")]
    ManifestValidation { reason: String },

    /// Generic I/O failure outside the render path.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure surfaced through the CLI.
    #[error("{0}")]
    Other(String),
}

/// Error wrapper that adds user-friendly context for CLI display.
///
/// The CLI is the only consumer; library code should return plain
/// [`StencilError`] and let [`user_friendly_error`] attach suggestions.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying stencil error.
    pub error: StencilError,
    /// Optional actionable suggestion, shown in green.
    pub suggestion: Option<String>,
    /// Optional additional details, shown in yellow.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details attached.
    #[must_use]
    pub const fn new(error: StencilError) -> Self {
        Self { error, suggestion: None, details: None }
    }

    /// Add an actionable suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining why the error occurred.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details, and suggestion to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with suggestions.
///
/// Recognizes [`StencilError`] variants and attaches tailored suggestions;
/// falls back to the full `anyhow` chain for everything else.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    match error.downcast::<StencilError>() {
        Ok(stencil_error) => create_error_context(stencil_error),
        Err(error) => {
            // Generic error: include the chain for diagnostics.
            let mut message = error.to_string();
            let chain: Vec<String> =
                error.chain().skip(1).map(std::string::ToString::to_string).collect();
            if !chain.is_empty() {
                message.push_str("\n\nCaused by:");
                for (i, cause) in chain.iter().enumerate() {
                    message.push_str(&format!("\n  {}: {}", i + 1, cause));
                }
            }
            ErrorContext::new(StencilError::Other(message))
                .with_suggestion("Run with --verbose for more detail")
        }
    }
}

fn create_error_context(error: StencilError) -> ErrorContext {
    match &error {
        StencilError::EngineNotFound { name, available } => {
            let suggestion = match closest_engine_name(name, available) {
                Some(candidate) => format!("Did you mean '{candidate}'?"),
                None if available.is_empty() => {
                    "Register the engine on the plugin before rendering".to_string()
                }
                None => format!("Available engines: {}", available.join(", ")),
            };
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Engines must be registered before any job using them executes")
        }
        StencilError::SourceRead { path, .. } => {
            let details = format!("The job's resolved source path is {}", path.display());
            ErrorContext::new(error)
                .with_suggestion(
                    "Check the job's src path and the group's src-base against the project directory",
                )
                .with_details(details)
        }
        StencilError::DestinationWrite { .. } => {
            ErrorContext::new(error).with_suggestion("Check permissions on the destination directory")
        }
        StencilError::ManifestNotFound { path } => {
            let details = format!("Looked for {}", path.display());
            ErrorContext::new(error)
                .with_suggestion("Create a stencil.toml or pass --manifest <path>")
                .with_details(details)
        }
        StencilError::ManifestParse { .. } => ErrorContext::new(error).with_suggestion(
            "Check the TOML syntax: quotes, brackets, and [[group]] / [[group.job]] table headers",
        ),
        StencilError::DependencyCycle { .. } => ErrorContext::new(error).with_details(
            "Template jobs never depend on each other; cycles can only come from external wiring",
        ),
        _ => ErrorContext::new(error),
    }
}

/// Find the registered engine name closest to `target`, if any is close
/// enough to be a plausible typo (Levenshtein distance within half the
/// target's length).
fn closest_engine_name(target: &str, available: &[String]) -> Option<String> {
    available
        .iter()
        .map(|name| (name, strsim::levenshtein(target, name)))
        .filter(|(_, dist)| *dist <= target.len().div_ceil(2))
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name.clone())
}
