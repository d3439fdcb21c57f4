use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tilegraph::GraphId;
use tracing_subscriber::EnvFilter;

mod commands;

/// Tiled road graph inspection tool
#[derive(Parser)]
#[command(name = "tilegraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tile archive to open
    #[arg(short = 'f', long, env = "TILEGRAPH_TILE_FILE", global = true)]
    tile_file: Option<PathBuf>,

    /// Skip the per-tile bounds check when opening the archive
    #[arg(long, global = true)]
    no_validate: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the levels and tile counts of an archive
    Info {
        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Decode a graph id (raw integer or level/tile/index)
    Id {
        id: GraphId,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Resolve the tile holding a graph id
    Tile {
        id: GraphId,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Decode the restriction records stored in a tile
    Restrictions {
        /// Any id inside the tile
        id: GraphId,

        /// Byte offset of the first record within the tile
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Present vias in reverse-search order
        #[arg(short, long)]
        reverse: bool,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let validate = !cli.no_validate;

    match cli.command {
        Commands::Info { json } => commands::info::run(cli.tile_file, validate, json),
        Commands::Id { id, json } => commands::id::run(id, json),
        Commands::Tile { id, json } => commands::tile::run(cli.tile_file, validate, id, json),
        Commands::Restrictions {
            id,
            offset,
            reverse,
            json,
        } => commands::restrictions::run(cli.tile_file, validate, id, offset, reverse, json),
    }
}
