//! Core types for stencil.
//!
//! Holds the error system shared by every other module:
//! - [`StencilError`] - enumerated failure modes for all stencil operations
//! - [`ErrorContext`] - user-friendly wrapper with suggestions and details
//! - [`user_friendly_error`] - conversion used by the CLI before display

pub mod error;

pub use error::{ErrorContext, StencilError, user_friendly_error};

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StencilError>;
