//! # tilegraph - Tiled Road Graph Substrate
//!
//! Low-level building blocks for a road network route planner: a read-only,
//! memory-mapped store of graph tiles and the bucket-sorted frontier used to
//! walk that graph during shortest-path search.
//!
//! ## Features
//!
//! - **O(1) tile lookup**: a [`GraphId`] resolves to its tile's byte slice
//!   through per-level index tables, with no copying
//! - **Zero-copy restrictions**: [`RestrictionView`] reads bit-packed turn
//!   restrictions straight out of mapped tile bytes
//! - **Bucket queue**: [`BucketQueue`] orders search labels by cost with
//!   amortized O(1) insert and extract
//! - **Shareable**: a [`TileStore`] is immutable after opening and can serve
//!   many search threads at once
//!
//! ## Quick Start
//!
//! ```ignore
//! use tilegraph::{restrictions, BucketQueue, GraphId, TileStore, TileStoreConfig};
//!
//! let store = TileStore::open(&TileStoreConfig::from_env()?)?;
//!
//! let tile = store.resolve_tile(GraphId::new(2, 818_660, 0)).unwrap_or_default();
//! for restriction in restrictions(tile) {
//!     let restriction = restriction?;
//!     println!("{} -> {} via {:?}", restriction.from_id(), restriction.to_id(),
//!         restriction.ordered_vias());
//! }
//!
//! let mut frontier = BucketQueue::new(0.0, 20_000.0, 1.0, |label: u32| costs[label as usize]);
//! frontier.add(0, 0.0);
//! while let Some(label) = frontier.pop() {
//!     // expand label
//! }
//! ```

pub mod bucket_queue;
pub mod builder;
mod bytes;
pub mod config;
pub mod error;
pub mod graph_id;
pub mod restriction;
pub mod store;

// Re-export main types at crate root for convenience
pub use bucket_queue::{BucketQueue, Label};
pub use builder::TileArchiveBuilder;
pub use config::TileStoreConfig;
pub use error::{GraphError, Result};
pub use graph_id::{GraphId, ParseGraphIdError, MAX_HIERARCHY_LEVELS};
pub use restriction::{
    dedup_restrictions, restrictions, DayOfWeek, RestrictionIter, RestrictionRecord,
    RestrictionType, RestrictionView, MAX_VIAS_PER_RESTRICTION,
};
pub use store::TileStore;
