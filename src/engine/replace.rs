//! The built-in literal replacement engine.

use super::TemplateEngine;

/// Simplest template engine: replaces each parameter key with its value.
///
/// Replacements are literal (no pattern syntax, no escaping) and global, and
/// they are applied strictly in parameter order, each pair operating on the
/// output of the previous one. A value that contains a later key will itself
/// be substituted when that key's turn comes; this sequential behavior is
/// part of the contract, not an accident.
pub struct ReplaceEngine;

impl TemplateEngine for ReplaceEngine {
    fn expand(&self, source: &str, params: &[(String, String)]) -> anyhow::Result<String> {
        let mut text = source.to_string();
        for (key, value) in params {
            text = text.replace(key.as_str(), value.as_str());
        }
        Ok(text)
    }
}
