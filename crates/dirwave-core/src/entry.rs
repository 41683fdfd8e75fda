//! Entry classification.

use std::fs::FileType;

#[cfg(unix)]
use std::os::unix::fs::FileTypeExt;

use serde::{Deserialize, Serialize};

/// Classification of a filesystem entry, as reported by its metadata.
///
/// The predicates are independent: an entry is reported under every kind its
/// file type satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Block device.
    #[serde(rename = "block")]
    BlockDevice,
    /// Character device.
    #[serde(rename = "character")]
    CharDevice,
    /// Named pipe.
    Fifo,
    /// Unix domain socket.
    Socket,
}

impl EntryKind {
    /// Every kind, in reporting order.
    pub const ALL: [EntryKind; 6] = [
        EntryKind::File,
        EntryKind::Dir,
        EntryKind::BlockDevice,
        EntryKind::CharDevice,
        EntryKind::Fifo,
        EntryKind::Socket,
    ];

    /// Every kind the given file type satisfies, in reporting order.
    pub fn classify(file_type: &FileType) -> Vec<EntryKind> {
        Self::ALL
            .into_iter()
            .filter(|kind| kind.matches(file_type))
            .collect()
    }

    /// Check whether a file type satisfies this kind's predicate.
    pub fn matches(self, file_type: &FileType) -> bool {
        match self {
            Self::File => file_type.is_file(),
            Self::Dir => file_type.is_dir(),
            #[cfg(unix)]
            Self::BlockDevice => file_type.is_block_device(),
            #[cfg(unix)]
            Self::CharDevice => file_type.is_char_device(),
            #[cfg(unix)]
            Self::Fifo => file_type.is_fifo(),
            #[cfg(unix)]
            Self::Socket => file_type.is_socket(),
            #[cfg(not(unix))]
            Self::BlockDevice | Self::CharDevice | Self::Fifo | Self::Socket => false,
        }
    }

    /// Check if this is a directory.
    pub fn is_dir(self) -> bool {
        self == Self::Dir
    }

    /// Short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Dir => "dir",
            Self::BlockDevice => "block",
            Self::CharDevice => "character",
            Self::Fifo => "fifo",
            Self::Socket => "socket",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown entry kind: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_regular_file() {
        let temp = std::env::temp_dir().join(format!("dirwave-entry-{}", std::process::id()));
        std::fs::write(&temp, "x").unwrap();
        let file_type = std::fs::metadata(&temp).unwrap().file_type();
        std::fs::remove_file(&temp).unwrap();

        assert_eq!(EntryKind::classify(&file_type), vec![EntryKind::File]);
    }

    #[test]
    fn test_classify_directory() {
        let file_type = std::fs::metadata(std::env::temp_dir()).unwrap().file_type();
        assert_eq!(EntryKind::classify(&file_type), vec![EntryKind::Dir]);
    }

    #[test]
    fn test_names_round_trip() {
        for kind in EntryKind::ALL {
            assert_eq!(kind.as_str().parse::<EntryKind>().unwrap(), kind);
        }
        assert!("symlink".parse::<EntryKind>().is_err());
    }
}
