//! Shared folder helpers for the describe and fetch stages.

use crate::error::{Result, ResultExt};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Create `dir` (and its parents) if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        fs::create_dir_all(dir).context(format!("Creating {}", dir.display()))?;
        debug!("Created directory {}", dir.display());
    }
    Ok(())
}

/// Remove `dir` and everything below it, if it exists.
pub fn remove_dir_if_exists(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        fs::remove_dir_all(dir).context(format!("Removing {}", dir.display()))?;
        debug!("Removed directory {}", dir.display());
    }
    Ok(())
}

/// Last path component as a string, e.g. `raw_data/classification` ->
/// `classification`.
pub fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
