use anyhow::Result;
use serde::Serialize;
use tilegraph::GraphId;

#[derive(Serialize)]
struct IdResponse {
    value: u64,
    level: u8,
    tile: u32,
    index: u32,
    valid: bool,
}

pub fn run(id: GraphId, json: bool) -> Result<()> {
    let (level, tile, index) = id.decode();

    if json {
        let response = IdResponse {
            value: id.value(),
            level,
            tile,
            index,
            valid: id.is_valid(),
        };
        println!("{}", serde_json::to_string(&response)?);
    } else if !id.is_valid() {
        println!("invalid ({:#x})", id.value());
    } else {
        println!("{} = {} (tile base {})", id, id.value(), id.tile_base().value());
    }

    Ok(())
}
