//! Root path sets.

use std::path::{Component, Path, PathBuf};

/// Ordered list of paths a walk starts from.
///
/// A single path converts into a one-element list. Duplicates are kept here;
/// the walker's visited set drops them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkRoots(Vec<PathBuf>);

impl WalkRoots {
    /// Create an empty root list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root.
    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.0.push(path.into());
    }

    /// Roots in the order given.
    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    /// Number of roots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no roots.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the underlying list.
    pub fn into_vec(self) -> Vec<PathBuf> {
        self.0
    }
}

impl From<PathBuf> for WalkRoots {
    fn from(path: PathBuf) -> Self {
        Self(vec![path])
    }
}

impl From<&Path> for WalkRoots {
    fn from(path: &Path) -> Self {
        Self(vec![path.to_path_buf()])
    }
}

impl From<&str> for WalkRoots {
    fn from(path: &str) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl From<String> for WalkRoots {
    fn from(path: String) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl<P: Into<PathBuf>> From<Vec<P>> for WalkRoots {
    fn from(paths: Vec<P>) -> Self {
        paths.into_iter().collect()
    }
}

impl<P: Into<PathBuf>, const N: usize> From<[P; N]> for WalkRoots {
    fn from(paths: [P; N]) -> Self {
        paths.into_iter().collect()
    }
}

impl<P: AsRef<Path>> From<&[P]> for WalkRoots {
    fn from(paths: &[P]) -> Self {
        paths.iter().map(|p| p.as_ref().to_path_buf()).collect()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for WalkRoots {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for WalkRoots {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Lexically normalize a path for identity comparison.
///
/// Drops `.` components and trailing separators. `..` is kept as-is and the
/// filesystem is never consulted, so symlinked aliases stay distinct. An
/// input that normalizes to nothing becomes `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}
