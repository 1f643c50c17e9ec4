//! Builders for small, hand-described block streams.

use strata_blockstream::{
    BlockRef, FieldType, PositionBlock, TupleLayout, ValueBlock, VecBlockStream,
};
use strata_ranges::RowRange;

/// The value stored at position `pos` by [`value_block`].
#[inline]
pub fn value_at(pos: u64) -> i64 {
    pos as i64 * 10
}

/// Layout of the blocks produced by [`value_block`].
pub fn int_layout() -> TupleLayout {
    TupleLayout::single(FieldType::Int64)
}

/// Dense single-column `Int64` block over `[start..end]`; the value at each
/// position is [`value_at`] of that position.
///
/// # Panics
///
/// Panics if `start > end`.
pub fn value_block(start: u64, end: u64) -> BlockRef {
    assert!(start <= end, "inverted value block [{start}..{end}]");
    ValueBlock::from_i64s(start, (start..=end).map(value_at))
        .expect("value block")
        .into_ref()
}

/// Position block over `[start..end]` carrying `positions`.
///
/// # Panics
///
/// Panics if the positions are unsorted or fall outside the range.
pub fn position_block(start: u64, end: u64, positions: &[u64]) -> BlockRef {
    PositionBlock::new(RowRange::new(start, end), positions.to_vec())
        .expect("position block")
        .into_ref()
}

/// Stream of dense value blocks, one per `(start, end)` pair.
///
/// Ordering is not validated, so malformed streams can be built on purpose.
pub fn value_stream(ranges: &[(u64, u64)]) -> VecBlockStream {
    let blocks: Vec<BlockRef> = ranges
        .iter()
        .map(|&(start, end)| value_block(start, end))
        .collect();
    VecBlockStream::new(int_layout(), blocks)
}

/// Stream of position blocks, one per `((start, end), positions)` entry.
///
/// Ordering is not validated, so malformed streams can be built on purpose.
pub fn position_stream(blocks: &[((u64, u64), &[u64])]) -> VecBlockStream {
    let blocks: Vec<BlockRef> = blocks
        .iter()
        .map(|&((start, end), positions)| position_block(start, end, positions))
        .collect();
    VecBlockStream::new(TupleLayout::empty(), blocks)
}
