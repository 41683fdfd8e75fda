//! Error types reported during a walk.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stage of the walk at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalkStage {
    /// Listing the entries of a directory.
    ReadDir,
    /// Reading the metadata of a listed entry.
    Inspect,
}

impl std::fmt::Display for WalkStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadDir => write!(f, "read_dir"),
            Self::Inspect => write!(f, "inspect"),
        }
    }
}

/// A non-fatal failure delivered through the event stream.
///
/// A walk never aborts on one of these; the affected path simply contributes
/// nothing further.
#[derive(Debug, Error)]
pub enum WalkError {
    /// A directory could not be listed.
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An entry's metadata could not be read.
    #[error("Failed to inspect {}: {source}", path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    /// Create a directory read error with path context.
    pub fn read_dir(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }

    /// Create a metadata inspection error with path context.
    pub fn inspect(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Inspect {
            path: path.into(),
            source,
        }
    }

    /// The path that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::ReadDir { path, .. } | Self::Inspect { path, .. } => path,
        }
    }

    /// Which stage failed.
    pub fn stage(&self) -> WalkStage {
        match self {
            Self::ReadDir { .. } => WalkStage::ReadDir,
            Self::Inspect { .. } => WalkStage::Inspect,
        }
    }

    /// The kind of the underlying I/O failure.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            Self::ReadDir { source, .. } | Self::Inspect { source, .. } => source.kind(),
        }
    }

    /// Whether the path was missing when it was touched.
    pub fn is_not_found(&self) -> bool {
        self.io_kind() == io::ErrorKind::NotFound
    }

    /// Whether access to the path was denied.
    pub fn is_permission_denied(&self) -> bool {
        self.io_kind() == io::ErrorKind::PermissionDenied
    }
}
