//! Events emitted by a walk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entry::EntryKind;
use crate::error::WalkError;

/// A single notification from a running walk.
#[derive(Debug)]
pub enum WalkEvent {
    /// A directory was listed successfully.
    Directory(PathBuf),
    /// An entry was inspected and satisfies `kind`.
    Entry { path: PathBuf, kind: EntryKind },
    /// A directory read or inspection failed.
    Error(WalkError),
    /// All work has settled. Always the last event of a walk.
    Done(WalkSummary),
}

impl WalkEvent {
    /// Path the event refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Directory(path) | Self::Entry { path, .. } => Some(path),
            Self::Error(err) => Some(err.path()),
            Self::Done(_) => None,
        }
    }

    /// Check if this is the completion event.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// Totals for a finished walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkSummary {
    /// Directories listed successfully.
    pub dirs_read: u64,
    /// Entries whose metadata was read successfully.
    pub entries_inspected: u64,
    /// `Entry` events emitted.
    pub entries_reported: u64,
    /// `Error` events emitted.
    pub errors: u64,
    /// Deepest level at which a directory was read.
    pub deepest_level: u32,
    /// Wall time from start to completion.
    pub elapsed: Duration,
}

impl WalkSummary {
    /// Check if the walk finished without errors.
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }

    /// Fold one level's totals into this summary.
    pub fn absorb(&mut self, other: &WalkSummary) {
        self.dirs_read += other.dirs_read;
        self.entries_inspected += other.entries_inspected;
        self.entries_reported += other.entries_reported;
        self.errors += other.errors;
        self.deepest_level = self.deepest_level.max(other.deepest_level);
    }
}
