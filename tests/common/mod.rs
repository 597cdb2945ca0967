//! Common test utilities and fixtures for stencil integration tests.

// Allow dead code because these utilities are shared across test files and
// not every test file uses all of them.
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated project directory with templates and a manifest.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Create an empty project in a fresh temporary directory.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp project dir")?;
        Ok(Self { dir })
    }

    /// Project root path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file under the project root, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write `stencil.toml` at the project root and return its path.
    pub fn write_manifest(&self, content: &str) -> Result<PathBuf> {
        self.write_file("stencil.toml", content)
    }

    /// Read a file under the project root.
    pub fn read_file(&self, relative: &str) -> Result<String> {
        let path = self.dir.path().join(relative);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Whether a file exists under the project root.
    pub fn has_file(&self, relative: &str) -> bool {
        self.dir.path().join(relative).exists()
    }
}
