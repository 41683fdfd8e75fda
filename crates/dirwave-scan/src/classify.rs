//! Entry inspection and classification.

use std::path::PathBuf;

use dirwave_core::{EntryKind, WalkError};

/// Result of a successful metadata inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    /// Path that was inspected.
    pub path: PathBuf,
    /// Every kind the metadata reports, in reporting order. May be empty for
    /// file types outside the known set.
    pub kinds: Vec<EntryKind>,
}

impl Inspection {
    /// Check if the entry extends the frontier.
    pub fn is_dir(&self) -> bool {
        self.kinds.contains(&EntryKind::Dir)
    }
}

/// Read an entry's metadata and classify it.
///
/// Uses `stat` semantics: symlinks are followed, and a dangling link is an
/// inspection failure.
pub async fn inspect_entry(path: PathBuf) -> Result<Inspection, WalkError> {
    match tokio::fs::metadata(&path).await {
        Ok(metadata) => {
            let kinds = EntryKind::classify(&metadata.file_type());
            Ok(Inspection { path, kinds })
        }
        Err(e) => Err(WalkError::inspect(path, e)),
    }
}
