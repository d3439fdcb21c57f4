//! Error types for the tilegraph library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when opening a tile archive or reading records out of it.
///
/// Tile lookups that miss are not errors: [`crate::TileStore::resolve_tile`]
/// returns `None` for them.
#[derive(Error, Debug)]
pub enum GraphError {
    /// IO error when opening or mapping the archive.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured tile archive does not exist.
    #[error("tile archive not found: {path}")]
    FileNotFound { path: PathBuf },

    /// No tile archive path was configured.
    #[error("no tile archive configured (set TILEGRAPH_TILE_FILE)")]
    MissingTileFile,

    /// The archive does not start with the expected magic bytes.
    #[error("not a tile archive: bad magic {found:02x?}")]
    BadMagic { found: [u8; 4] },

    /// The archive was written by an incompatible format version.
    #[error("unsupported tile archive version {version}")]
    UnsupportedVersion { version: u32 },

    /// The archive declares more hierarchy levels than identifiers can address.
    #[error("archive declares {levels} hierarchy levels (max {max})", max = crate::graph_id::MAX_HIERARCHY_LEVELS)]
    TooManyLevels { levels: u32 },

    /// A level declares more tiles than identifiers can address.
    #[error("level {level} declares {count} tiles (max {max})", max = crate::graph_id::MAX_TILE_INDEX as u64 + 1)]
    TooManyTiles { level: u8, count: u32 },

    /// The header or an index table runs past the end of the file.
    #[error("truncated tile archive: header needs {needed} bytes, file has {available}")]
    TruncatedHeader { needed: usize, available: usize },

    /// A tile index entry points outside the mapped file.
    #[error(
        "tile {level}/{index} at offset {offset} (+{size} bytes) lies outside the {file_len} byte archive"
    )]
    TileOutOfBounds {
        level: u8,
        index: u32,
        offset: u64,
        size: u32,
        file_len: usize,
    },

    /// Via index is past the record's via count.
    #[error("via index out of bounds: {index} >= {count}")]
    ViaIndexOutOfBounds { index: usize, count: usize },

    /// A restriction record needs more bytes than the slice holds.
    #[error("truncated restriction record: needs {needed} bytes, {available} available")]
    TruncatedRecord { needed: usize, available: usize },

    /// A value does not fit the bit width of its packed field.
    #[error("{field} value {value} does not fit in {bits} bits")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        bits: u32,
    },
}

impl GraphError {
    /// Returns true for errors that make an archive unusable at open time.
    ///
    /// Everything else is a bounds or format violation on an individual record.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GraphError::Io(_)
                | GraphError::FileNotFound { .. }
                | GraphError::MissingTileFile
                | GraphError::BadMagic { .. }
                | GraphError::UnsupportedVersion { .. }
                | GraphError::TooManyLevels { .. }
                | GraphError::TooManyTiles { .. }
                | GraphError::TruncatedHeader { .. }
                | GraphError::TileOutOfBounds { .. }
        )
    }
}

/// Result type alias using [`GraphError`].
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphError::ViaIndexOutOfBounds { index: 3, count: 2 };
        assert_eq!(err.to_string(), "via index out of bounds: 3 >= 2");

        let err = GraphError::TooManyLevels { levels: 9 };
        assert!(err.to_string().contains("max 8"));

        let err = GraphError::FileNotFound {
            path: PathBuf::from("graph.tgr"),
        };
        assert!(err.to_string().contains("graph.tgr"));

        let err = GraphError::BadMagic {
            found: *b"ABCD",
        };
        assert!(err.to_string().contains("41"));
    }

    #[test]
    fn test_error_classes() {
        assert!(GraphError::MissingTileFile.is_configuration());
        assert!(GraphError::TruncatedHeader {
            needed: 48,
            available: 10
        }
        .is_configuration());
        assert!(!GraphError::ViaIndexOutOfBounds { index: 0, count: 0 }.is_configuration());
        assert!(!GraphError::TruncatedRecord {
            needed: 24,
            available: 8
        }
        .is_configuration());
    }
}
