//! Directory listing.

use std::path::{Path, PathBuf};

use dirwave_core::WalkError;

/// List the immediate entries of a directory.
///
/// Returned paths are `dir` joined with each entry name, so a relative
/// directory yields relative entry paths. A failure at any point, including
/// midway through iteration, fails the whole listing.
pub async fn list_directory(dir: &Path) -> Result<Vec<PathBuf>, WalkError> {
    let mut read_dir = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| WalkError::read_dir(dir, e))?;

    let mut entries = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| WalkError::read_dir(dir, e))?
    {
        entries.push(entry.path());
    }

    Ok(entries)
}
