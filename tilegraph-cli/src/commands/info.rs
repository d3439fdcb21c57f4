use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use super::{format_size, open_store};

#[derive(Serialize)]
struct LevelInfo {
    level: u8,
    tiles: u32,
    populated: u32,
    bytes: u64,
}

#[derive(Serialize)]
struct ArchiveInfo {
    path: String,
    mapped_bytes: usize,
    levels: Vec<LevelInfo>,
}

pub fn run(tile_file: Option<PathBuf>, validate: bool, json: bool) -> Result<()> {
    let store = open_store(tile_file, validate)?;

    let levels: Vec<LevelInfo> = (0..store.level_count() as u8)
        .map(|level| {
            let (mut populated, mut bytes) = (0u32, 0u64);
            for id in store.tile_ids(level) {
                let size = store.tile_size(id).unwrap_or(0);
                if size > 0 {
                    populated += 1;
                    bytes += size as u64;
                }
            }
            LevelInfo {
                level,
                tiles: store.tile_count(level),
                populated,
                bytes,
            }
        })
        .collect();

    let info = ArchiveInfo {
        path: store.path().display().to_string(),
        mapped_bytes: store.mapped_len(),
        levels,
    };

    if json {
        println!("{}", serde_json::to_string(&info)?);
        return Ok(());
    }

    println!("Archive: {}", info.path);
    println!("Size: {}", format_size(info.mapped_bytes as u64));
    println!();
    println!("{:<6} {:>10} {:>10} {:>12}", "LEVEL", "TILES", "POPULATED", "BYTES");
    println!("{}", "-".repeat(41));
    for level in &info.levels {
        println!(
            "{:<6} {:>10} {:>10} {:>12}",
            level.level,
            level.tiles,
            level.populated,
            format_size(level.bytes)
        );
    }

    Ok(())
}
