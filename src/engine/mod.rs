//! Template engines and the engine registry.
//!
//! An engine is a named text-substitution strategy: given source text and an
//! ordered parameter list it produces destination text. The registry maps
//! engine names to implementations and is owned by the plugin instance -
//! there is no process-global state. It is constructed with the built-in
//! [`replace`](ReplaceEngine) engine and may be extended with custom engines
//! any time before the first job executes; after the configuration phase it
//! is only read, so concurrent rendering operations can share it freely.
//!
//! Lookup failures are deliberately deferred to render time: a job may name
//! an engine that is registered later in the configuration phase, so
//! [`EngineRegistry::resolve`] is only called from inside a running task
//! node.

mod replace;

pub use replace::ReplaceEngine;

use std::collections::HashMap;

use crate::core::StencilError;

/// Name of the built-in literal-replacement engine.
pub const REPLACE: &str = "replace";

/// A named text-substitution strategy.
///
/// Implementations must be pure with respect to the job: all inputs arrive
/// as arguments and the only output is the returned text. Engines are shared
/// between concurrently rendering jobs, hence the `Send + Sync` bound.
pub trait TemplateEngine: Send + Sync {
    /// Expand `source` using the ordered `params` list.
    ///
    /// Parameter order is part of the contract: engines that substitute
    /// sequentially (like the built-in replace engine) must apply pairs in
    /// the given order.
    fn expand(&self, source: &str, params: &[(String, String)]) -> anyhow::Result<String>;
}

/// Registry of template engines, keyed by name.
///
/// One registry exists per plugin instance. [`register`](Self::register)
/// stores or overwrites; [`resolve`](Self::resolve) fails with
/// [`StencilError::EngineNotFound`] for unknown names.
pub struct EngineRegistry {
    engines: HashMap<String, Box<dyn TemplateEngine>>,
}

impl EngineRegistry {
    /// Create a registry pre-populated with the built-in engines.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self { engines: HashMap::new() };
        registry.register(REPLACE, ReplaceEngine);
        registry
    }

    /// Store `engine` under `name`, replacing any previous registration.
    pub fn register(&mut self, name: impl Into<String>, engine: impl TemplateEngine + 'static) {
        let name = name.into();
        tracing::debug!(engine = %name, "registering template engine");
        self.engines.insert(name, Box::new(engine));
    }

    /// Look up the engine registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::EngineNotFound`] carrying the currently
    /// registered names, so callers can surface suggestions.
    pub fn resolve(&self, name: &str) -> Result<&dyn TemplateEngine, StencilError> {
        self.engines.get(name).map(|engine| &**engine).ok_or_else(|| StencilError::EngineNotFound {
            name: name.to_string(),
            available: self.names(),
        })
    }

    /// Registered engine names, sorted for stable output.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.engines.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether an engine is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.engines.contains_key(name)
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
