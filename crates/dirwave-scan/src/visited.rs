//! Directory de-duplication for a single walk.

use std::path::{Path, PathBuf};

use dashmap::DashSet;
use dirwave_core::normalize_path;

/// Tracks directories already scheduled for reading.
///
/// Paths are claimed before their read is issued, so the same directory
/// reached from two roots, or listed twice, is read once. The set only grows.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: DashSet<PathBuf>,
}

impl VisitedSet {
    /// Create an empty visited set.
    pub fn new() -> Self {
        Self {
            seen: DashSet::new(),
        }
    }

    /// Claim a directory. Returns `true` if this is the first claim.
    ///
    /// A `false` return means the directory is already scheduled or read and
    /// must be skipped.
    pub fn claim(&self, path: &Path) -> bool {
        self.seen.insert(normalize_path(path))
    }

    /// Get the number of claimed directories.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Check if nothing has been claimed.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
