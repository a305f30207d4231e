//! Input file discovery.

use crate::error::{DescribeError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Recursively collect every file under `root` whose extension is
/// `extension` (given without the dot).
///
/// The result is sorted lexicographically by path, which fixes the
/// discovery order used as the size tie-break. A missing root yields an
/// empty list.
pub fn discover_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if root.is_dir() {
        walk(root, extension, &mut files)?;
    } else {
        debug!("{} is not a directory", root.display());
    }
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| {
        DescribeError::Io(e).with_context(format!("Listing {}", dir.display()))
    })?;

    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, extension, files)?;
        } else if path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    Ok(())
}

/// Like [`discover_files`], but an empty result is a
/// [`DescribeError::EmptyCollection`].
pub fn discover_collection(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let files = discover_files(root, extension)?;
    if files.is_empty() {
        return Err(DescribeError::EmptyCollection {
            root: root.to_path_buf(),
            extension: extension.to_string(),
        });
    }
    Ok(files)
}
