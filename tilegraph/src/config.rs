//! Tile store configuration.
//!
//! A [`TileStoreConfig`] names the archive to map and how strictly to check it
//! when it is opened. It is built explicitly or read from the environment.

use std::path::{Path, PathBuf};

use crate::error::{GraphError, Result};

/// Environment variable holding the tile archive path.
pub const ENV_TILE_FILE: &str = "TILEGRAPH_TILE_FILE";

/// Environment variable toggling the open-time per-tile bounds sweep.
pub const ENV_VALIDATE: &str = "TILEGRAPH_VALIDATE";

/// Configuration for [`crate::TileStore::open`].
///
/// # Example
///
/// ```ignore
/// use tilegraph::{TileStore, TileStoreConfig};
///
/// let config = TileStoreConfig::new("/data/graph.tgr").validate_tiles(false);
/// let store = TileStore::open(&config)?;
/// ```
#[derive(Debug, Clone)]
pub struct TileStoreConfig {
    tile_file: PathBuf,
    validate_tiles: bool,
}

impl TileStoreConfig {
    /// Configuration for the archive at `tile_file`, with validation enabled.
    pub fn new<P: AsRef<Path>>(tile_file: P) -> Self {
        Self {
            tile_file: tile_file.as_ref().to_path_buf(),
            validate_tiles: true,
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `TILEGRAPH_TILE_FILE` | Path of the tile archive | Required |
    /// | `TILEGRAPH_VALIDATE` | `0` or `false` skips the per-tile bounds sweep | true |
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingTileFile`] if `TILEGRAPH_TILE_FILE` is not set.
    pub fn from_env() -> Result<Self> {
        let tile_file = std::env::var_os(ENV_TILE_FILE)
            .filter(|v| !v.is_empty())
            .ok_or(GraphError::MissingTileFile)?;

        let validate_tiles = std::env::var(ENV_VALIDATE)
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        Ok(Self {
            tile_file: PathBuf::from(tile_file),
            validate_tiles,
        })
    }

    /// Whether to check every tile's offset and size against the file length at open.
    ///
    /// With validation off, a bad entry is only detected when it is looked up,
    /// and resolves to `None`.
    pub fn validate_tiles(mut self, validate: bool) -> Self {
        self.validate_tiles = validate;
        self
    }

    /// Path of the tile archive.
    pub fn tile_file(&self) -> &Path {
        &self.tile_file
    }

    /// Returns true if the open-time bounds sweep is enabled.
    pub fn validates_tiles(&self) -> bool {
        self.validate_tiles
    }
}
