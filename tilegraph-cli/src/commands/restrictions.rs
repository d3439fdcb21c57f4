use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tilegraph::{restrictions, GraphId, RestrictionView};

use super::open_store;

#[derive(Serialize)]
struct RestrictionResponse {
    from: String,
    to: String,
    vias: Vec<String>,
    #[serde(rename = "type")]
    kind: u16,
    modes: u16,
    begin_day: u8,
    end_day: u8,
    begin_time: u32,
    end_time: u32,
}

impl From<&RestrictionView<'_>> for RestrictionResponse {
    fn from(view: &RestrictionView<'_>) -> Self {
        Self {
            from: view.from_id().to_string(),
            to: view.to_id().to_string(),
            vias: view.ordered_vias().iter().map(GraphId::to_string).collect(),
            kind: view.kind(),
            modes: view.modes(),
            begin_day: view.begin_day(),
            end_day: view.end_day(),
            begin_time: view.begin_time(),
            end_time: view.end_time(),
        }
    }
}

pub fn run(
    tile_file: Option<PathBuf>,
    validate: bool,
    id: GraphId,
    offset: usize,
    reverse: bool,
    json: bool,
) -> Result<()> {
    let store = open_store(tile_file, validate)?;

    let Some(tile) = store.resolve_tile(id) else {
        bail!("Tile {} is not in the archive", id.tile_base());
    };
    let Some(records) = tile.get(offset..) else {
        bail!("Offset {} is past the end of the {} byte tile", offset, tile.len());
    };

    let mut decoded = Vec::new();
    for view in restrictions(records) {
        let view = view.context("Failed to decode restriction")?;
        decoded.push(if reverse { view.with_reversed(true) } else { view });
    }
    tracing::debug!(tile = %id.tile_base(), count = decoded.len(), "decoded restrictions");

    if json {
        let response: Vec<RestrictionResponse> =
            decoded.iter().map(RestrictionResponse::from).collect();
        println!("{}", serde_json::to_string(&response)?);
        return Ok(());
    }

    for view in &decoded {
        let kind = view
            .restriction_type()
            .map(|t| format!("{:?}", t))
            .unwrap_or_else(|| format!("type {}", view.kind()));
        let vias: Vec<String> = view.ordered_vias().iter().map(GraphId::to_string).collect();
        println!(
            "{} -> {} via [{}] {} modes={:#05x} days={}-{} time={}-{}",
            view.from_id(),
            view.to_id(),
            vias.join(", "),
            kind,
            view.modes(),
            view.begin_day(),
            view.end_day(),
            view.begin_time(),
            view.end_time()
        );
    }
    println!("{} restrictions", decoded.len());

    Ok(())
}
