//! Complex turn restrictions stored inside tiles.
//!
//! A record is two 64-bit edge identifiers (from, to), one bit-packed 64-bit
//! word, and `via_count` trailing 64-bit via identifiers, all little-endian:
//!
//! ```text
//! 0   u64 from edge id
//! 8   u64 to edge id
//! 16  u64 packed word
//! 24  u64 via ids[via_count]
//! ```
//!
//! Packed word layout, least significant bit first:
//!
//! | Bits  | Field        | Width |
//! |-------|--------------|-------|
//! | 0-9   | type         | 10    |
//! | 10-21 | modes        | 12    |
//! | 22-24 | begin day    | 3     |
//! | 25-27 | end day      | 3     |
//! | 28-44 | begin time   | 17    |
//! | 45-59 | elapsed time | 15    |
//! | 60    | reverse      | 1     |
//! | 61-63 | via count    | 3     |
//!
//! [`RestrictionView`] reads a record in place out of a borrowed tile slice.
//! [`RestrictionRecord`] is the owned form used by tile build tooling.

use std::fmt;

use crate::bytes::read_u64_le;
use crate::error::{GraphError, Result};
use crate::graph_id::GraphId;

/// Maximum number of vias a restriction may carry.
pub const MAX_VIAS_PER_RESTRICTION: usize = 8;

/// Largest via count the packed 3-bit field can hold.
pub const MAX_VIA_COUNT: usize = 7;

// The via count field cannot exceed the per-restriction maximum, so there is
// no runtime check against it.
const _: () = assert!(MAX_VIA_COUNT <= MAX_VIAS_PER_RESTRICTION);

/// Bytes before the via list: from id, to id, packed word.
pub const RECORD_HEADER_LEN: usize = 24;

const VIA_LEN: usize = 8;

#[derive(Clone, Copy)]
struct Field {
    name: &'static str,
    shift: u32,
    bits: u32,
}

impl Field {
    const fn new(name: &'static str, shift: u32, bits: u32) -> Self {
        Field { name, shift, bits }
    }

    const fn mask(self) -> u64 {
        (1 << self.bits) - 1
    }

    fn get(self, word: u64) -> u64 {
        (word >> self.shift) & self.mask()
    }

    fn put(self, word: &mut u64, value: u64) -> Result<()> {
        if value > self.mask() {
            return Err(GraphError::FieldOverflow {
                field: self.name,
                value,
                bits: self.bits,
            });
        }
        *word |= value << self.shift;
        Ok(())
    }
}

const TYPE: Field = Field::new("type", 0, 10);
const MODES: Field = Field::new("modes", 10, 12);
const BEGIN_DAY: Field = Field::new("begin_day", 22, 3);
const END_DAY: Field = Field::new("end_day", 25, 3);
const BEGIN_TIME: Field = Field::new("begin_time", 28, 17);
const ELAPSED_TIME: Field = Field::new("elapsed_time", 45, 15);
const REVERSE: Field = Field::new("reverse", 60, 1);
const VIA_COUNT: Field = Field::new("via_count", 61, 3);

const _: () = assert!(VIA_COUNT.shift + VIA_COUNT.bits == 64);
const _: () = assert!(VIA_COUNT.mask() as usize == MAX_VIA_COUNT);

/// Access mode bits carried in a restriction's `modes` field.
pub mod access {
    pub const AUTO: u16 = 1;
    pub const PEDESTRIAN: u16 = 1 << 1;
    pub const BICYCLE: u16 = 1 << 2;
    pub const TRUCK: u16 = 1 << 3;
    pub const EMERGENCY: u16 = 1 << 4;
    pub const TAXI: u16 = 1 << 5;
    pub const BUS: u16 = 1 << 6;
    pub const HOV: u16 = 1 << 7;
    pub const WHEELCHAIR: u16 = 1 << 8;
    pub const MOPED: u16 = 1 << 9;
    pub const MOTORCYCLE: u16 = 1 << 10;
    pub const ALL: u16 = (1 << 11) - 1;
}

/// Known restriction types. The packed field is wider than this list, so
/// unknown values are preserved as raw integers by [`RestrictionView::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum RestrictionType {
    NoLeftTurn = 0,
    NoRightTurn = 1,
    NoStraightOn = 2,
    NoUTurn = 3,
    OnlyRightTurn = 4,
    OnlyLeftTurn = 5,
    OnlyStraightOn = 6,
    NoEntry = 7,
    NoExit = 8,
    NoTurn = 9,
}

impl RestrictionType {
    /// Map a raw type value to a known restriction type.
    pub fn from_raw(value: u16) -> Option<Self> {
        use RestrictionType::*;
        Some(match value {
            0 => NoLeftTurn,
            1 => NoRightTurn,
            2 => NoStraightOn,
            3 => NoUTurn,
            4 => OnlyRightTurn,
            5 => OnlyLeftTurn,
            6 => OnlyStraightOn,
            7 => NoEntry,
            8 => NoExit,
            9 => NoTurn,
            _ => return None,
        })
    }

    /// True for "only" restrictions, which forbid every other maneuver.
    pub fn is_mandatory(self) -> bool {
        matches!(
            self,
            RestrictionType::OnlyRightTurn
                | RestrictionType::OnlyLeftTurn
                | RestrictionType::OnlyStraightOn
        )
    }
}

/// Day of week as stored in the 3-bit day fields. `Unspecified` means no day limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayOfWeek {
    Unspecified = 0,
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl DayOfWeek {
    fn from_bits(value: u8) -> Self {
        match value & 0x7 {
            0 => DayOfWeek::Unspecified,
            1 => DayOfWeek::Sunday,
            2 => DayOfWeek::Monday,
            3 => DayOfWeek::Tuesday,
            4 => DayOfWeek::Wednesday,
            5 => DayOfWeek::Thursday,
            6 => DayOfWeek::Friday,
            _ => DayOfWeek::Saturday,
        }
    }
}

/// A zero-copy view of one restriction record inside a tile.
///
/// The view borrows the tile bytes and cannot outlive the
/// [`crate::TileStore`] they came from.
#[derive(Clone, Copy)]
pub struct RestrictionView<'a> {
    /// Exactly the bytes of this record
    bytes: &'a [u8],
    word: u64,
    reversed: bool,
}

impl<'a> RestrictionView<'a> {
    /// Read the record starting at the beginning of `bytes`.
    ///
    /// `bytes` may extend past the record; the view covers only
    /// [`Self::encoded_len`] bytes of it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TruncatedRecord`] if `bytes` is shorter than the
    /// fixed header or than the via list the header declares.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let word = read_u64_le(bytes, 16).ok_or(GraphError::TruncatedRecord {
            needed: RECORD_HEADER_LEN,
            available: bytes.len(),
        })?;

        let needed = RECORD_HEADER_LEN + VIA_COUNT.get(word) as usize * VIA_LEN;
        let bytes = bytes.get(..needed).ok_or(GraphError::TruncatedRecord {
            needed,
            available: bytes.len(),
        })?;

        Ok(Self {
            bytes,
            word,
            reversed: REVERSE.get(word) == 1,
        })
    }

    /// The same record with its effective reversal flag overridden.
    ///
    /// The mapped bytes are untouched; only this view's via order changes.
    /// Reverse searches use this to see vias in their direction of travel.
    pub fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// Edge the restriction starts from.
    pub fn from_id(&self) -> GraphId {
        GraphId::from_raw(self.read_u64(0))
    }

    /// Edge the restriction leads to.
    pub fn to_id(&self) -> GraphId {
        GraphId::from_raw(self.read_u64(8))
    }

    /// Number of vias (0-7).
    pub fn via_count(&self) -> usize {
        VIA_COUNT.get(self.word) as usize
    }

    /// Via at `index` in storage order.
    pub fn via_id(&self, index: usize) -> Result<GraphId> {
        if index >= self.via_count() {
            return Err(GraphError::ViaIndexOutOfBounds {
                index,
                count: self.via_count(),
            });
        }
        Ok(GraphId::from_raw(
            self.read_u64(RECORD_HEADER_LEN + index * VIA_LEN),
        ))
    }

    /// Vias in storage order.
    pub fn vias(&self) -> impl DoubleEndedIterator<Item = GraphId> + 'a {
        self.bytes[RECORD_HEADER_LEN..]
            .chunks_exact(VIA_LEN)
            .map(|chunk| {
                let mut raw = [0u8; VIA_LEN];
                raw.copy_from_slice(chunk);
                GraphId::from_raw(u64::from_le_bytes(raw))
            })
    }

    /// Vias in travel order: storage order, reversed when the reversal flag is set.
    pub fn ordered_vias(&self) -> Vec<GraphId> {
        if self.reversed {
            self.vias().rev().collect()
        } else {
            self.vias().collect()
        }
    }

    /// Raw 10-bit restriction type.
    pub fn kind(&self) -> u16 {
        TYPE.get(self.word) as u16
    }

    /// Restriction type, if it is one of the known values.
    pub fn restriction_type(&self) -> Option<RestrictionType> {
        RestrictionType::from_raw(self.kind())
    }

    /// Access modes bitmask (see [`access`]).
    pub fn modes(&self) -> u16 {
        MODES.get(self.word) as u16
    }

    /// True if the restriction applies to any of the modes in `mode_mask`.
    pub fn applies_to(&self, mode_mask: u16) -> bool {
        self.modes() & mode_mask != 0
    }

    /// Raw begin day (0-7).
    pub fn begin_day(&self) -> u8 {
        BEGIN_DAY.get(self.word) as u8
    }

    /// Raw end day (0-7).
    pub fn end_day(&self) -> u8 {
        END_DAY.get(self.word) as u8
    }

    pub fn begin_dow(&self) -> DayOfWeek {
        DayOfWeek::from_bits(self.begin_day())
    }

    pub fn end_dow(&self) -> DayOfWeek {
        DayOfWeek::from_bits(self.end_day())
    }

    /// Begin time in seconds from midnight.
    pub fn begin_time(&self) -> u32 {
        BEGIN_TIME.get(self.word) as u32
    }

    /// Duration in seconds.
    pub fn elapsed_time(&self) -> u32 {
        ELAPSED_TIME.get(self.word) as u32
    }

    /// Begin time plus elapsed time. Not wrapped at midnight, so it can exceed 86399.
    pub fn end_time(&self) -> u32 {
        self.begin_time() + self.elapsed_time()
    }

    /// Effective reversal flag.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Size of this record in bytes.
    pub fn encoded_len(&self) -> usize {
        self.bytes.len()
    }

    /// The record's bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    fn read_u64(&self, at: usize) -> u64 {
        // Offsets are within the length checked in `new`
        read_u64_le(self.bytes, at).unwrap_or_default()
    }
}

/// Equal when they describe the same restriction: same edges, same vias in
/// travel order, same type, modes and time window. Raw bytes and the raw
/// reversal bit are not compared.
impl PartialEq for RestrictionView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.from_id() == other.from_id()
            && self.to_id() == other.to_id()
            && self.kind() == other.kind()
            && self.modes() == other.modes()
            && self.begin_day() == other.begin_day()
            && self.end_day() == other.end_day()
            && self.begin_time() == other.begin_time()
            && self.elapsed_time() == other.elapsed_time()
            && self.via_count() == other.via_count()
            && self.ordered_vias() == other.ordered_vias()
    }
}

impl Eq for RestrictionView<'_> {}

impl fmt::Debug for RestrictionView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestrictionView")
            .field("from_id", &self.from_id())
            .field("to_id", &self.to_id())
            .field("vias", &self.ordered_vias())
            .field("kind", &self.kind())
            .field("modes", &format_args!("{:#05x}", self.modes()))
            .field("begin_day", &self.begin_day())
            .field("end_day", &self.end_day())
            .field("begin_time", &self.begin_time())
            .field("elapsed_time", &self.elapsed_time())
            .field("reversed", &self.reversed)
            .finish()
    }
}

/// Iterator over consecutive restriction records in a byte slice.
///
/// Yields an error once for a truncated trailing record, then stops.
#[derive(Debug, Clone)]
pub struct RestrictionIter<'a> {
    remaining: &'a [u8],
}

/// Iterate the restriction records packed back to back in `bytes`.
pub fn restrictions(bytes: &[u8]) -> RestrictionIter<'_> {
    RestrictionIter { remaining: bytes }
}

impl<'a> Iterator for RestrictionIter<'a> {
    type Item = Result<RestrictionView<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        match RestrictionView::new(self.remaining) {
            Ok(view) => {
                self.remaining = &self.remaining[view.encoded_len()..];
                Some(Ok(view))
            }
            Err(e) => {
                self.remaining = &[];
                Some(Err(e))
            }
        }
    }
}

/// An owned restriction, as assembled by tile build tooling.
///
/// `vias` are in storage order; `reverse` is written to the reversal bit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RestrictionRecord {
    pub from_id: GraphId,
    pub to_id: GraphId,
    pub vias: Vec<GraphId>,
    pub kind: u16,
    pub modes: u16,
    pub begin_day: u8,
    pub end_day: u8,
    pub begin_time: u32,
    pub elapsed_time: u32,
    pub reverse: bool,
}

impl RestrictionRecord {
    /// Copy a view into an owned record, keeping its effective reversal flag.
    pub fn from_view(view: &RestrictionView<'_>) -> Self {
        Self {
            from_id: view.from_id(),
            to_id: view.to_id(),
            vias: view.vias().collect(),
            kind: view.kind(),
            modes: view.modes(),
            begin_day: view.begin_day(),
            end_day: view.end_day(),
            begin_time: view.begin_time(),
            elapsed_time: view.elapsed_time(),
            reverse: view.is_reversed(),
        }
    }

    /// Size of the encoded record in bytes.
    pub fn encoded_len(&self) -> usize {
        RECORD_HEADER_LEN + self.vias.len() * VIA_LEN
    }

    /// Pack the record's fields into the 64-bit word.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::FieldOverflow`] for a value wider than its field,
    /// including more than [`MAX_VIA_COUNT`] vias.
    pub fn packed_word(&self) -> Result<u64> {
        let mut word = 0u64;
        TYPE.put(&mut word, self.kind as u64)?;
        MODES.put(&mut word, self.modes as u64)?;
        BEGIN_DAY.put(&mut word, self.begin_day as u64)?;
        END_DAY.put(&mut word, self.end_day as u64)?;
        BEGIN_TIME.put(&mut word, self.begin_time as u64)?;
        ELAPSED_TIME.put(&mut word, self.elapsed_time as u64)?;
        REVERSE.put(&mut word, self.reverse as u64)?;
        VIA_COUNT.put(&mut word, self.vias.len() as u64)?;
        Ok(word)
    }

    /// Append the encoded record to `out`. Nothing is written on error.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        let word = self.packed_word()?;
        out.reserve(self.encoded_len());
        out.extend_from_slice(&self.from_id.value().to_le_bytes());
        out.extend_from_slice(&self.to_id.value().to_le_bytes());
        out.extend_from_slice(&word.to_le_bytes());
        for via in &self.vias {
            out.extend_from_slice(&via.value().to_le_bytes());
        }
        Ok(())
    }

    /// Encode the record into a new buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out)?;
        Ok(out)
    }
}

/// Collect the records in `bytes`, dropping any equal to an earlier one.
///
/// Equality is [`RestrictionView`]'s, so a record whose vias are stored
/// reversed with the reversal bit set duplicates one stored forward.
pub fn dedup_restrictions(bytes: &[u8]) -> Result<Vec<RestrictionRecord>> {
    let mut kept: Vec<RestrictionView<'_>> = Vec::new();
    let mut dropped = 0usize;
    for view in restrictions(bytes) {
        let view = view?;
        if kept.contains(&view) {
            dropped += 1;
        } else {
            kept.push(view);
        }
    }

    if dropped > 0 {
        tracing::debug!(kept = kept.len(), dropped, "removed duplicate restrictions");
    }

    Ok(kept.iter().map(RestrictionRecord::from_view).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> GraphId {
        GraphId::new(2, 100, n)
    }

    fn record(vias: &[u32], reverse: bool) -> RestrictionRecord {
        RestrictionRecord {
            from_id: id(1),
            to_id: id(2),
            vias: vias.iter().map(|&n| id(n)).collect(),
            kind: RestrictionType::NoLeftTurn as u16,
            modes: access::AUTO | access::TRUCK,
            begin_day: DayOfWeek::Monday as u8,
            end_day: DayOfWeek::Friday as u8,
            begin_time: 7 * 3600,
            elapsed_time: 2 * 3600,
            reverse,
        }
    }

    #[test]
    fn test_read_fields() {
        let bytes = record(&[10, 11], false).encode().unwrap();
        let view = RestrictionView::new(&bytes).unwrap();

        assert_eq!(view.from_id(), id(1));
        assert_eq!(view.to_id(), id(2));
        assert_eq!(view.via_count(), 2);
        assert_eq!(view.restriction_type(), Some(RestrictionType::NoLeftTurn));
        assert_eq!(view.modes(), access::AUTO | access::TRUCK);
        assert!(view.applies_to(access::TRUCK));
        assert!(!view.applies_to(access::PEDESTRIAN | access::BICYCLE));
        assert_eq!(view.begin_dow(), DayOfWeek::Monday);
        assert_eq!(view.end_dow(), DayOfWeek::Friday);
        assert_eq!(view.begin_time(), 25_200);
        assert_eq!(view.elapsed_time(), 7_200);
        assert_eq!(view.end_time(), 32_400);
        assert_eq!(view.encoded_len(), 40);
        assert!(!view.is_reversed());
    }

    #[test]
    fn test_bit_exact_word() {
        let rec = RestrictionRecord {
            kind: 0x3ff,
            modes: 0,
            begin_day: 0,
            end_day: 0,
            begin_time: 0,
            elapsed_time: 0,
            reverse: true,
            vias: vec![id(1); 7],
            ..Default::default()
        };
        let word = rec.packed_word().unwrap();
        assert_eq!(word, 0x3ff | (1 << 60) | (0b111 << 61));

        let rec = RestrictionRecord {
            modes: 0xfff,
            begin_time: 86_399,
            elapsed_time: 0x7fff,
            ..Default::default()
        };
        let word = rec.packed_word().unwrap();
        assert_eq!(word, (0xfff << 10) | (86_399 << 28) | (0x7fff << 45));
    }

    #[test]
    fn test_reads_externally_packed_bytes() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&5u64.to_le_bytes());
        bytes.extend_from_slice(&6u64.to_le_bytes());
        let word: u64 = 9 | (3 << 22) | (4 << 25) | (100 << 28) | (50 << 45) | (1 << 61);
        bytes.extend_from_slice(&word.to_le_bytes());
        bytes.extend_from_slice(&77u64.to_le_bytes());

        let view = RestrictionView::new(&bytes).unwrap();
        assert_eq!(view.from_id().value(), 5);
        assert_eq!(view.to_id().value(), 6);
        assert_eq!(view.restriction_type(), Some(RestrictionType::NoTurn));
        assert_eq!(view.begin_day(), 3);
        assert_eq!(view.end_day(), 4);
        assert_eq!(view.begin_time(), 100);
        assert_eq!(view.end_time(), 150);
        assert_eq!(view.via_id(0).unwrap().value(), 77);
    }

    #[test]
    fn test_via_index_out_of_bounds() {
        let bytes = record(&[10, 11], false).encode().unwrap();
        let view = RestrictionView::new(&bytes).unwrap();

        assert_eq!(view.via_id(1).unwrap(), id(11));
        assert!(matches!(
            view.via_id(2),
            Err(GraphError::ViaIndexOutOfBounds { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_ordered_vias() {
        let forward = record(&[10, 11, 12], false).encode().unwrap();
        let view = RestrictionView::new(&forward).unwrap();
        assert_eq!(view.ordered_vias(), vec![id(10), id(11), id(12)]);

        let reversed = record(&[10, 11, 12], true).encode().unwrap();
        let view = RestrictionView::new(&reversed).unwrap();
        assert_eq!(view.ordered_vias(), vec![id(12), id(11), id(10)]);
        // Storage order is unaffected
        assert_eq!(view.via_id(0).unwrap(), id(10));
    }

    #[test]
    fn test_with_reversed_override() {
        let bytes = record(&[10, 11], false).encode().unwrap();
        let view = RestrictionView::new(&bytes).unwrap().with_reversed(true);
        assert!(view.is_reversed());
        assert_eq!(view.ordered_vias(), vec![id(11), id(10)]);
        assert_eq!(bytes, record(&[10, 11], false).encode().unwrap());
    }

    #[test]
    fn test_end_time_does_not_wrap() {
        let mut rec = record(&[], false);
        rec.begin_time = 86_000;
        rec.elapsed_time = 1_000;
        let bytes = rec.encode().unwrap();
        let view = RestrictionView::new(&bytes).unwrap();
        assert_eq!(view.end_time(), 87_000);
    }

    #[test]
    fn test_equality_uses_travel_order() {
        let forward = record(&[10, 11, 12], false).encode().unwrap();
        let backward = record(&[12, 11, 10], true).encode().unwrap();
        assert_ne!(forward, backward);

        let a = RestrictionView::new(&forward).unwrap();
        let b = RestrictionView::new(&backward).unwrap();
        assert_eq!(a, b);

        let same_storage_flipped = record(&[10, 11, 12], true).encode().unwrap();
        assert_ne!(a, RestrictionView::new(&same_storage_flipped).unwrap());
    }

    #[test]
    fn test_equality_field_by_field() {
        let base = record(&[10], false);
        let base_bytes = base.encode().unwrap();
        let base_view = RestrictionView::new(&base_bytes).unwrap();

        let edits: [fn(&mut RestrictionRecord); 10] = [
            |r| r.from_id = id(9),
            |r| r.to_id = id(9),
            |r| r.vias = vec![id(99)],
            |r| r.vias.clear(),
            |r| r.kind = 3,
            |r| r.modes = access::BUS,
            |r| r.begin_day = 1,
            |r| r.end_day = 7,
            |r| r.begin_time = 1,
            |r| r.elapsed_time = 1,
        ];

        for edit in edits {
            let mut variant = base.clone();
            edit(&mut variant);
            let bytes = variant.encode().unwrap();
            let view = RestrictionView::new(&bytes).unwrap();
            assert_ne!(view, base_view, "{:?} should differ", variant);
        }
    }

    #[test]
    fn test_truncated_record() {
        let bytes = record(&[10, 11], false).encode().unwrap();

        match RestrictionView::new(&bytes[..20]) {
            Err(GraphError::TruncatedRecord { needed, available }) => {
                assert_eq!(needed, RECORD_HEADER_LEN);
                assert_eq!(available, 20);
            }
            other => panic!("Expected TruncatedRecord, got {:?}", other),
        }

        match RestrictionView::new(&bytes[..35]) {
            Err(GraphError::TruncatedRecord { needed, available }) => {
                assert_eq!(needed, 40);
                assert_eq!(available, 35);
            }
            other => panic!("Expected TruncatedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_field_overflow() {
        let mut rec = record(&[], false);
        rec.begin_time = 1 << 17;
        assert!(matches!(
            rec.encode(),
            Err(GraphError::FieldOverflow { field: "begin_time", bits: 17, .. })
        ));

        let rec = record(&[1, 2, 3, 4, 5, 6, 7, 8], false);
        let mut out = vec![0xaa];
        assert!(matches!(
            rec.encode_into(&mut out),
            Err(GraphError::FieldOverflow { field: "via_count", value: 8, .. })
        ));
        assert_eq!(out, vec![0xaa]);
    }

    #[test]
    fn test_iterate_records() {
        let mut bytes = Vec::new();
        record(&[], false).encode_into(&mut bytes).unwrap();
        record(&[10, 11, 12], true).encode_into(&mut bytes).unwrap();
        record(&[13], false).encode_into(&mut bytes).unwrap();

        let views: Vec<_> = restrictions(&bytes).collect::<Result<_>>().unwrap();
        assert_eq!(views.len(), 3);
        assert_eq!(views[1].ordered_vias(), vec![id(12), id(11), id(10)]);
        assert_eq!(views[2].via_count(), 1);
    }

    #[test]
    fn test_iterate_truncated_tail() {
        let mut bytes = Vec::new();
        record(&[10], false).encode_into(&mut bytes).unwrap();
        bytes.extend_from_slice(&[0u8; 10]);

        let mut iter = restrictions(&bytes);
        assert!(iter.next().unwrap().is_ok());
        assert!(matches!(
            iter.next(),
            Some(Err(GraphError::TruncatedRecord { .. }))
        ));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_dedup_restrictions() {
        let mut bytes = Vec::new();
        record(&[10, 11], false).encode_into(&mut bytes).unwrap();
        record(&[11, 10], true).encode_into(&mut bytes).unwrap();
        record(&[10, 11], true).encode_into(&mut bytes).unwrap();
        record(&[10, 11], false).encode_into(&mut bytes).unwrap();

        let unique = dedup_restrictions(&bytes).unwrap();
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0], record(&[10, 11], false));
        assert_eq!(unique[1], record(&[10, 11], true));
    }

    #[test]
    fn test_dedup_fails_on_truncated_tail() {
        let mut bytes = Vec::new();
        record(&[10], false).encode_into(&mut bytes).unwrap();
        record(&[10], false).encode_into(&mut bytes).unwrap();
        bytes.extend_from_slice(&[0u8; 5]);

        assert!(matches!(
            dedup_restrictions(&bytes),
            Err(GraphError::TruncatedRecord { .. })
        ));
    }

    #[test]
    fn test_record_from_view_round_trip() {
        let rec = record(&[10, 11, 12], true);
        let bytes = rec.encode().unwrap();
        let view = RestrictionView::new(&bytes).unwrap();
        assert_eq!(RestrictionRecord::from_view(&view), rec);
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let mut rec = record(&[], false);
        rec.kind = 500;
        let bytes = rec.encode().unwrap();
        let view = RestrictionView::new(&bytes).unwrap();
        assert_eq!(view.kind(), 500);
        assert_eq!(view.restriction_type(), None);
    }
}
