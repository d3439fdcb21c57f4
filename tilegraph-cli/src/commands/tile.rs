use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use tilegraph::GraphId;

use super::{format_size, open_store};

#[derive(Serialize)]
struct TileResponse {
    tile: String,
    present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<usize>,
}

pub fn run(tile_file: Option<PathBuf>, validate: bool, id: GraphId, json: bool) -> Result<()> {
    let store = open_store(tile_file, validate)?;
    let tile = id.tile_base();
    let bytes = store.resolve_tile(tile).map(<[u8]>::len);

    if json {
        let response = TileResponse {
            tile: tile.to_string(),
            present: bytes.is_some(),
            bytes,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        match bytes {
            Some(len) => println!("{}: {}", tile, format_size(len as u64)),
            None => println!(
                "{}: absent (level {} has {} tiles)",
                tile,
                tile.level(),
                store.tile_count(tile.level())
            ),
        }
    }

    Ok(())
}
