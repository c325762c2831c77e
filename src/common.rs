// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling, command-line parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub use std::fs::File;
pub use std::path::Path;

/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;
pub type FPaths = Vec<FPath>;
pub type FileMetadata = std::fs::Metadata;

/// count of anything
pub type Count = u64;

/// Size of a file in bytes
pub type FileSz = u64;

/// 0-based index of a line within one log source.
///
/// All event positions within a file refer to this, not to byte offsets;
/// smart-meter diagnostic logs are small enough to hold entirely in memory.
pub type LineIndex = usize;

/// Identifier for a processed path, unique within one run of the program.
///
/// The `smee` binary keys its collection maps with this.
pub type PathId = usize;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FileType
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// How a file path was classified by the
/// [`filepreprocessor`](crate::readers::filepreprocessor) functions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FileType {
    /// a line-oriented UTF-8(-compatible) text log; parseable
    Text,
    /// a known non-log file; not parseable
    Unparsable,
    /// an unset value; the default
    #[default]
    Unset,
}

impl FileType {
    /// Returns `true` if this is a parseable `FileType`.
    pub const fn is_supported(&self) -> bool {
        matches!(*self, FileType::Text)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            FileType::Text => write!(f, "TEXT"),
            FileType::Unparsable => write!(f, "UNPARSABLE"),
            FileType::Unset => write!(f, "UNSET"),
        }
    }
}
