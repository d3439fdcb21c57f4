//! Offline tile archive writer.
//!
//! [`TileArchiveBuilder`] collects tile bodies per level and serializes them in
//! the layout [`crate::TileStore`] maps. Archives are produced once by build
//! tooling; a mapped store is never written to.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{GraphError, Result};
use crate::graph_id::{GraphId, MAX_HIERARCHY_LEVELS, MAX_TILE_INDEX};
use crate::store::{ARCHIVE_MAGIC, ARCHIVE_VERSION, HEADER_LEN};

/// Tile bodies are padded to this alignment inside the archive.
const TILE_ALIGN: usize = 8;

/// Builds a tile archive in memory.
///
/// # Example
///
/// ```ignore
/// use tilegraph::{GraphId, TileArchiveBuilder};
///
/// let mut builder = TileArchiveBuilder::new();
/// builder
///     .add_tile(GraphId::new(0, 3, 0), tile_bytes)
///     .set_tile_count(2, 4096)?;
/// builder.write_to("/data/graph.tgr")?;
/// ```
#[derive(Debug, Default, Clone)]
pub struct TileArchiveBuilder {
    /// Tile slots per level; `None` slots are written as empty tiles.
    levels: Vec<Vec<Option<Vec<u8>>>>,
}

impl TileArchiveBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `count` tile slots at `level`, growing it if needed.
    ///
    /// Slots that never receive a tile are written with size 0 and resolve to an
    /// empty slice. A count smaller than the current one is ignored.
    pub fn set_tile_count(&mut self, level: u8, count: u32) -> Result<&mut Self> {
        if level as usize >= MAX_HIERARCHY_LEVELS {
            return Err(GraphError::TooManyLevels {
                levels: level as u32 + 1,
            });
        }
        if count > MAX_TILE_INDEX + 1 {
            return Err(GraphError::TooManyTiles { level, count });
        }

        let slots = self.level_mut(level);
        if slots.len() < count as usize {
            slots.resize(count as usize, None);
        }
        Ok(self)
    }

    /// Store the body of the tile addressed by `id`, replacing any earlier body.
    ///
    /// The tile count of the level grows to include the tile.
    pub fn add_tile(&mut self, id: GraphId, bytes: impl Into<Vec<u8>>) -> &mut Self {
        let tile = id.tile_index() as usize;
        let slots = self.level_mut(id.level());
        if slots.len() <= tile {
            slots.resize(tile + 1, None);
        }
        slots[tile] = Some(bytes.into());
        self
    }

    /// Number of levels the archive will declare.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Serialize the archive.
    pub fn to_bytes(&self) -> Vec<u8> {
        let tables_len: usize = self.levels.iter().map(|slots| slots.len() * 12).sum();
        let mut body_at = align_up(HEADER_LEN + tables_len);

        let mut out = Vec::with_capacity(body_at);
        out.extend_from_slice(&ARCHIVE_MAGIC);
        out.extend_from_slice(&ARCHIVE_VERSION.to_le_bytes());
        out.extend_from_slice(&(self.levels.len() as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        for level in 0..MAX_HIERARCHY_LEVELS {
            let count = self.levels.get(level).map_or(0, Vec::len) as u32;
            out.extend_from_slice(&count.to_le_bytes());
        }

        // Tile bodies follow the tables in level order, each aligned
        let mut placements = Vec::new();
        for slots in &self.levels {
            let mut offsets = Vec::with_capacity(slots.len());
            let mut sizes = Vec::with_capacity(slots.len());
            for slot in slots {
                match slot {
                    Some(bytes) if !bytes.is_empty() => {
                        offsets.push(body_at as u64);
                        sizes.push(bytes.len() as u32);
                        placements.push((body_at, bytes.as_slice()));
                        body_at = align_up(body_at + bytes.len());
                    }
                    _ => {
                        offsets.push(0);
                        sizes.push(0);
                    }
                }
            }
            for offset in offsets {
                out.extend_from_slice(&offset.to_le_bytes());
            }
            for size in sizes {
                out.extend_from_slice(&size.to_le_bytes());
            }
        }

        for (at, bytes) in placements {
            out.resize(at, 0);
            out.extend_from_slice(bytes);
        }

        out
    }

    /// Write the archive to `path`, replacing any existing file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;

        tracing::debug!(
            path = %path.as_ref().display(),
            levels = self.levels.len(),
            "wrote tile archive"
        );
        Ok(())
    }

    fn level_mut(&mut self, level: u8) -> &mut Vec<Option<Vec<u8>>> {
        let level = level as usize;
        if self.levels.len() <= level {
            self.levels.resize(level + 1, Vec::new());
        }
        &mut self.levels[level]
    }
}

fn align_up(at: usize) -> usize {
    at.div_ceil(TILE_ALIGN) * TILE_ALIGN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TileStore;
    use tempfile::TempDir;

    #[test]
    fn test_empty_archive() {
        let bytes = TileArchiveBuilder::new().to_bytes();
        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(&bytes[..4], b"TGRF");
    }

    #[test]
    fn test_tile_bodies_are_aligned() {
        let mut builder = TileArchiveBuilder::new();
        builder
            .add_tile(GraphId::new(0, 0, 0), vec![1u8; 3])
            .add_tile(GraphId::new(0, 1, 0), vec![2u8; 5]);
        let bytes = builder.to_bytes();

        let first = u64::from_le_bytes(bytes[HEADER_LEN..HEADER_LEN + 8].try_into().unwrap());
        let second =
            u64::from_le_bytes(bytes[HEADER_LEN + 8..HEADER_LEN + 16].try_into().unwrap());
        assert_eq!(first % TILE_ALIGN as u64, 0);
        assert_eq!(second % TILE_ALIGN as u64, 0);
        assert_eq!(second - first, 8);
    }

    #[test]
    fn test_sparse_levels_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.tgr");

        let mut builder = TileArchiveBuilder::new();
        builder.add_tile(GraphId::new(2, 4, 0), b"highway".to_vec());
        builder.set_tile_count(0, 10).unwrap();
        builder.write_to(&path).unwrap();

        let store = TileStore::from_path(&path).unwrap();
        assert_eq!(store.tile_counts(), vec![10, 0, 5]);
        assert_eq!(store.resolve_tile(GraphId::new(0, 9, 0)), Some(&b""[..]));
        assert!(store.resolve_tile(GraphId::new(0, 10, 0)).is_none());
        assert!(store.resolve_tile(GraphId::new(1, 0, 0)).is_none());
        assert_eq!(
            store.resolve_tile(GraphId::new(2, 4, 0)),
            Some(&b"highway"[..])
        );
    }

    #[test]
    fn test_replacing_a_tile() {
        let mut builder = TileArchiveBuilder::new();
        let id = GraphId::new(1, 0, 0);
        builder.add_tile(id, b"old".to_vec()).add_tile(id, b"new".to_vec());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.tgr");
        builder.write_to(&path).unwrap();

        let store = TileStore::from_path(&path).unwrap();
        assert_eq!(store.resolve_tile(id), Some(&b"new"[..]));
    }

    #[test]
    fn test_set_tile_count_limits() {
        let mut builder = TileArchiveBuilder::new();
        assert!(matches!(
            builder.set_tile_count(8, 1),
            Err(GraphError::TooManyLevels { levels: 9 })
        ));
        assert!(matches!(
            builder.set_tile_count(0, MAX_TILE_INDEX + 2),
            Err(GraphError::TooManyTiles { level: 0, .. })
        ));

        builder.set_tile_count(0, 5).unwrap();
        builder.set_tile_count(0, 2).unwrap();
        assert_eq!(builder.level_count(), 1);
        assert_eq!(builder.levels[0].len(), 5);
    }
}
