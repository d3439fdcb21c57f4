//! Graph identifier codec.
//!
//! Every object in the tiled graph (edge, node, restriction) is addressed by a
//! [`GraphId`]: a 64-bit value packing the hierarchy level, the tile index
//! within that level, and the object index within the tile.
//!
//! # Bit Layout
//!
//! | Bits  | Field        | Width |
//! |-------|--------------|-------|
//! | 0-2   | level        | 3     |
//! | 3-24  | tile index   | 22    |
//! | 25-45 | object index | 21    |
//!
//! The upper 18 bits are always zero. Encoding a field wider than its slot is a
//! caller bug: debug builds assert, release builds truncate to the field width.

use std::fmt;
use std::str::FromStr;

/// Number of hierarchy levels an identifier can address.
pub const MAX_HIERARCHY_LEVELS: usize = 8;

const LEVEL_BITS: u32 = 3;
const TILE_BITS: u32 = 22;
const INDEX_BITS: u32 = 21;

const LEVEL_MASK: u64 = (1 << LEVEL_BITS) - 1;
const TILE_MASK: u64 = (1 << TILE_BITS) - 1;
const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;

const TILE_SHIFT: u32 = LEVEL_BITS;
const INDEX_SHIFT: u32 = LEVEL_BITS + TILE_BITS;

/// Largest encodable tile index.
pub const MAX_TILE_INDEX: u32 = TILE_MASK as u32;

/// Largest encodable object index.
pub const MAX_OBJECT_INDEX: u32 = INDEX_MASK as u32;

const _: () = assert!(1 << LEVEL_BITS == MAX_HIERARCHY_LEVELS);

/// A compact identifier for an object in the tiled graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u64);

impl GraphId {
    /// All 46 identifier bits set. Never refers to a real object.
    pub const INVALID: GraphId = GraphId((1 << (LEVEL_BITS + TILE_BITS + INDEX_BITS)) - 1);

    /// Pack a level, tile index and object index into an identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilegraph::GraphId;
    ///
    /// let id = GraphId::new(2, 7_000, 15);
    /// assert_eq!(id.level(), 2);
    /// assert_eq!(id.tile_index(), 7_000);
    /// assert_eq!(id.index(), 15);
    /// ```
    pub fn new(level: u8, tile_index: u32, index: u32) -> Self {
        debug_assert!((level as u64) <= LEVEL_MASK, "level {level} exceeds 3 bits");
        debug_assert!(tile_index <= MAX_TILE_INDEX, "tile index {tile_index} exceeds 22 bits");
        debug_assert!(index <= MAX_OBJECT_INDEX, "object index {index} exceeds 21 bits");

        GraphId(
            (level as u64 & LEVEL_MASK)
                | ((tile_index as u64 & TILE_MASK) << TILE_SHIFT)
                | ((index as u64 & INDEX_MASK) << INDEX_SHIFT),
        )
    }

    /// Wrap a raw 64-bit value read from a tile.
    pub const fn from_raw(value: u64) -> Self {
        GraphId(value)
    }

    /// The raw 64-bit value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Hierarchy level.
    pub fn level(self) -> u8 {
        (self.0 & LEVEL_MASK) as u8
    }

    /// Tile index within the level.
    pub fn tile_index(self) -> u32 {
        ((self.0 >> TILE_SHIFT) & TILE_MASK) as u32
    }

    /// Object index within the tile.
    pub fn index(self) -> u32 {
        ((self.0 >> INDEX_SHIFT) & INDEX_MASK) as u32
    }

    /// Split the identifier back into `(level, tile_index, index)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilegraph::GraphId;
    ///
    /// assert_eq!(GraphId::new(1, 42, 9).decode(), (1, 42, 9));
    /// ```
    pub fn decode(self) -> (u8, u32, u32) {
        (self.level(), self.tile_index(), self.index())
    }

    /// The identifier of the tile holding this object (object index zeroed).
    pub fn tile_base(self) -> Self {
        GraphId(self.0 & ((TILE_MASK << TILE_SHIFT) | LEVEL_MASK))
    }

    /// Another object in the same tile.
    pub fn with_index(self, index: u32) -> Self {
        GraphId::new(self.level(), self.tile_index(), index)
    }

    /// False for [`GraphId::INVALID`] and for values using bits above bit 45.
    pub fn is_valid(self) -> bool {
        self.0 < GraphId::INVALID.0
    }
}

impl Default for GraphId {
    fn default() -> Self {
        GraphId::INVALID
    }
}

impl From<GraphId> for u64 {
    fn from(id: GraphId) -> Self {
        id.0
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.level(), self.tile_index(), self.index())
    }
}

impl fmt::Debug for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "GraphId({self})")
        } else {
            write!(f, "GraphId(invalid {:#x})", self.0)
        }
    }
}

/// Error returned when a string is not a `level/tile/index` triple or a raw id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid graph id {0:?}: expected level/tile/index or a raw integer")]
pub struct ParseGraphIdError(String);

impl FromStr for GraphId {
    type Err = ParseGraphIdError;

    /// Parse either `level/tile/index` or a raw decimal value.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilegraph::GraphId;
    ///
    /// let id: GraphId = "2/7000/15".parse().unwrap();
    /// assert_eq!(id, GraphId::new(2, 7000, 15));
    ///
    /// let raw: GraphId = id.value().to_string().parse().unwrap();
    /// assert_eq!(raw, id);
    ///
    /// assert!("8/0/0".parse::<GraphId>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseGraphIdError(s.to_string());
        let s = s.trim();

        if !s.contains('/') {
            return s.parse::<u64>().map(GraphId::from_raw).map_err(|_| err());
        }

        let mut parts = s.split('/');
        let (Some(level), Some(tile), Some(index), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };

        let level: u8 = level.parse().map_err(|_| err())?;
        let tile: u32 = tile.parse().map_err(|_| err())?;
        let index: u32 = index.parse().map_err(|_| err())?;

        if level as usize >= MAX_HIERARCHY_LEVELS
            || tile > MAX_TILE_INDEX
            || index > MAX_OBJECT_INDEX
        {
            return Err(err());
        }

        Ok(GraphId::new(level, tile, index))
    }
}
