//! Filesystem helpers for the render path.
//!
//! Destination files are written atomically: content goes to a temporary
//! file in the destination's directory which is then persisted over the
//! final path. A failing render therefore leaves either the previous
//! destination content or no file at all, never a partial write - which is
//! what lets the task graph re-run a failed build without cleanup.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Create `path` (and all missing parents) if it does not exist.
///
/// # Errors
///
/// Returns the underlying I/O error, or `NotADirectory` when the path
/// exists but is not a directory.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("path exists but is not a directory: {}", path.display()),
        ));
    }
    Ok(())
}

/// Atomically write `content` to `path`, creating missing parent
/// directories.
///
/// The content is written and synced to a named temporary file in the same
/// directory, then renamed over `path`.
///
/// # Errors
///
/// Returns the underlying I/O error from directory creation, the temporary
/// write, or the final rename.
pub fn atomic_write_text(path: &Path, content: &str) -> io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    ensure_dir(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
