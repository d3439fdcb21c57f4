//! Memory-mapped tile archive.
//!
//! This module provides [`TileStore`], a read-only index over a single file
//! holding every tile of every hierarchy level. Opening the store maps the
//! file once and parses the per-level index tables; afterwards any
//! [`GraphId`] resolves in O(1) to the byte slice of its tile.
//!
//! # Archive Format
//!
//! All integers are little-endian:
//!
//! ```text
//! 0    magic "TGRF"
//! 4    u32 format version (1)
//! 8    u32 level count (<= 8)
//! 12   u32 reserved
//! 16   u32 tile count, one per possible level (8 entries)
//! 48   per level, in order: u64 offsets[tile count], u32 sizes[tile count]
//! ...  tile bodies
//! ```
//!
//! Offsets are absolute byte positions from the start of the file.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::bytes::{read_u32_le, read_u64_le};
use crate::config::TileStoreConfig;
use crate::error::{GraphError, Result};
use crate::graph_id::{GraphId, MAX_HIERARCHY_LEVELS, MAX_TILE_INDEX};

/// Magic bytes at the start of every archive.
pub const ARCHIVE_MAGIC: [u8; 4] = *b"TGRF";

/// Archive format version understood by this crate.
pub const ARCHIVE_VERSION: u32 = 1;

/// Length of the fixed header preceding the index tables.
pub const HEADER_LEN: usize = 16 + 4 * MAX_HIERARCHY_LEVELS;

/// Where one level's index tables live inside the mapping.
#[derive(Debug, Clone, Copy, Default)]
struct LevelIndex {
    tile_count: u32,
    offsets_at: usize,
    sizes_at: usize,
}

/// A read-only, memory-mapped tile archive.
///
/// The store is immutable once opened and is `Send + Sync`, so one instance
/// wrapped in an `Arc` serves every search thread. Slices handed out by
/// [`TileStore::resolve_tile`] borrow the store and cannot outlive it.
///
/// # Example
///
/// ```ignore
/// use tilegraph::{GraphId, TileStore};
///
/// let store = TileStore::from_path("/data/graph.tgr")?;
/// if let Some(tile) = store.resolve_tile(GraphId::new(2, 818_660, 0)) {
///     println!("tile holds {} bytes", tile.len());
/// }
/// ```
#[derive(Debug)]
pub struct TileStore {
    /// Memory-mapped archive
    data: Mmap,
    /// Path the archive was opened from
    path: PathBuf,
    /// Number of levels present in the archive
    level_count: usize,
    /// Index table locations, one per possible level
    levels: [LevelIndex; MAX_HIERARCHY_LEVELS],
}

impl TileStore {
    /// Open the archive at `path` with default configuration.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(&TileStoreConfig::new(path))
    }

    /// Map the configured archive and parse its per-level index tables.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// - The file does not exist, cannot be opened, or cannot be mapped
    /// - The file is shorter than the header, or an index table runs past its end
    /// - The magic, version, level count or a tile count is invalid
    /// - Validation is enabled and a tile entry points outside the file
    pub fn open(config: &TileStoreConfig) -> Result<Self> {
        let path = config.tile_file();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => GraphError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => GraphError::Io(e),
        })?;

        let file_len = file.metadata()?.len() as usize;
        if file_len < HEADER_LEN {
            return Err(GraphError::TruncatedHeader {
                needed: HEADER_LEN,
                available: file_len,
            });
        }

        // SAFETY: Memory mapping is safe as long as the file is not modified
        // while mapped. Archives are written once offline and only read here.
        let data = unsafe { Mmap::map(&file)? };

        let (level_count, levels) = parse_index(&data)?;

        let store = Self {
            data,
            path: path.to_path_buf(),
            level_count,
            levels,
        };

        if config.validates_tiles() {
            store.validate_tiles()?;
        }

        tracing::debug!(
            path = %store.path.display(),
            levels = store.level_count,
            tiles = ?store.tile_counts(),
            bytes = store.data.len(),
            "opened tile archive"
        );

        Ok(store)
    }

    /// Resolve the tile addressed by `id`'s level and tile index.
    ///
    /// Returns `None` if the level is not present in the archive, the tile
    /// index is at or beyond the level's tile count, or the entry does not fit
    /// inside the mapping. The object index of `id` is ignored.
    pub fn resolve_tile(&self, id: GraphId) -> Option<&[u8]> {
        let (offset, size) = self.entry(id.level(), id.tile_index())?;
        let start = usize::try_from(offset).ok()?;
        let end = start.checked_add(size as usize)?;
        self.data.get(start..end)
    }

    /// Byte length recorded for the tile addressed by `id`.
    pub fn tile_size(&self, id: GraphId) -> Option<u32> {
        self.entry(id.level(), id.tile_index()).map(|(_, size)| size)
    }

    /// Number of hierarchy levels in the archive.
    pub fn level_count(&self) -> usize {
        self.level_count
    }

    /// Number of tiles at `level` (0 for levels not in the archive).
    pub fn tile_count(&self, level: u8) -> u32 {
        self.level(level).map_or(0, |l| l.tile_count)
    }

    /// Tile counts of every level present in the archive.
    pub fn tile_counts(&self) -> Vec<u32> {
        self.levels[..self.level_count]
            .iter()
            .map(|l| l.tile_count)
            .collect()
    }

    /// Tile identifiers (object index 0) of every tile slot at `level`.
    pub fn tile_ids(&self, level: u8) -> impl Iterator<Item = GraphId> + '_ {
        (0..self.tile_count(level)).map(move |tile| GraphId::new(level, tile, 0))
    }

    /// Size of the mapped archive in bytes.
    pub fn mapped_len(&self) -> usize {
        self.data.len()
    }

    /// Path the archive was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn level(&self, level: u8) -> Option<&LevelIndex> {
        self.levels[..self.level_count].get(level as usize)
    }

    fn entry(&self, level: u8, tile_index: u32) -> Option<(u64, u32)> {
        let index = self.level(level)?;
        if tile_index >= index.tile_count {
            return None;
        }
        let i = tile_index as usize;
        let offset = read_u64_le(&self.data, index.offsets_at + i * 8)?;
        let size = read_u32_le(&self.data, index.sizes_at + i * 4)?;
        Some((offset, size))
    }

    fn validate_tiles(&self) -> Result<()> {
        let file_len = self.data.len();
        for level in 0..self.level_count as u8 {
            for tile in 0..self.tile_count(level) {
                let Some((offset, size)) = self.entry(level, tile) else {
                    continue;
                };
                let fits = offset
                    .checked_add(size as u64)
                    .is_some_and(|end| end <= file_len as u64);
                if !fits {
                    return Err(GraphError::TileOutOfBounds {
                        level,
                        index: tile,
                        offset,
                        size,
                        file_len,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Parse the fixed header and locate every level's index tables.
fn parse_index(data: &[u8]) -> Result<(usize, [LevelIndex; MAX_HIERARCHY_LEVELS])> {
    let truncated = |needed: usize| GraphError::TruncatedHeader {
        needed,
        available: data.len(),
    };

    let magic = data.get(0..4).ok_or_else(|| truncated(HEADER_LEN))?;
    if magic != ARCHIVE_MAGIC {
        return Err(GraphError::BadMagic {
            found: [magic[0], magic[1], magic[2], magic[3]],
        });
    }

    let version = read_u32_le(data, 4).ok_or_else(|| truncated(HEADER_LEN))?;
    if version != ARCHIVE_VERSION {
        return Err(GraphError::UnsupportedVersion { version });
    }

    let levels_declared = read_u32_le(data, 8).ok_or_else(|| truncated(HEADER_LEN))?;
    if levels_declared as usize > MAX_HIERARCHY_LEVELS {
        return Err(GraphError::TooManyLevels {
            levels: levels_declared,
        });
    }
    let level_count = levels_declared as usize;

    let mut levels = [LevelIndex::default(); MAX_HIERARCHY_LEVELS];
    let mut cursor = HEADER_LEN;
    for (level, index) in levels.iter_mut().enumerate().take(level_count) {
        let tile_count = read_u32_le(data, 16 + level * 4).ok_or_else(|| truncated(HEADER_LEN))?;
        if tile_count > MAX_TILE_INDEX + 1 {
            return Err(GraphError::TooManyTiles {
                level: level as u8,
                count: tile_count,
            });
        }

        let count = tile_count as usize;
        let offsets_at = cursor;
        let sizes_at = offsets_at + count * 8;
        cursor = sizes_at + count * 4;
        if cursor > data.len() {
            return Err(truncated(cursor));
        }

        *index = LevelIndex {
            tile_count,
            offsets_at,
            sizes_at,
        };
    }

    Ok((level_count, levels))
}
