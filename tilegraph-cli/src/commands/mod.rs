pub mod id;
pub mod info;
pub mod restrictions;
pub mod tile;

use anyhow::{Context, Result};
use std::path::PathBuf;
use tilegraph::{TileStore, TileStoreConfig};

/// Open the archive named on the command line, falling back to the environment.
pub fn open_store(tile_file: Option<PathBuf>, validate: bool) -> Result<TileStore> {
    let config = match tile_file {
        Some(path) => TileStoreConfig::new(path),
        None => TileStoreConfig::from_env().context(
            "TILEGRAPH_TILE_FILE environment variable not set. Use --tile-file or set TILEGRAPH_TILE_FILE",
        )?,
    }
    .validate_tiles(validate);

    TileStore::open(&config)
        .with_context(|| format!("Failed to open tile archive {}", config.tile_file().display()))
}

/// Human-readable byte count using binary units, e.g. `1.5 KiB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
        assert_eq!(format_size(5 << 40), "5.0 TiB");
    }
}
