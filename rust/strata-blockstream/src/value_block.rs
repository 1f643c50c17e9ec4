//! Dense value blocks: one encoded tuple per position of the block range.

use std::{any::Any, sync::Arc};

use strata_common::{Result, error::Error, verify_arg};
use strata_ranges::RowRange;

use crate::{
    block::{Block, BlockCursor, BlockRef, CursorState, check_seek},
    layout::TupleLayout,
    tuple_data::{TupleData, TupleRef},
};

/// A dense block of tuples covering every position of its range.
///
/// The tuple at position `p` is `data.tuple(p - range.start())`. Cursors share
/// the tuple data with the block and never copy it.
pub struct ValueBlock {
    range: RowRange,
    data: Arc<TupleData>,
}

impl ValueBlock {
    /// Creates a value block whose first tuple sits at position `start`.
    ///
    /// # Errors
    ///
    /// Fails if `data` holds no tuples, or if the block would extend past
    /// `u64::MAX`.
    pub fn new(start: u64, data: impl Into<Arc<TupleData>>) -> Result<ValueBlock> {
        let data = data.into();
        verify_arg!(data, !data.is_empty());
        let end = start
            .checked_add(data.tuple_count() as u64 - 1)
            .ok_or_else(|| Error::invalid_arg("start", "block range overflows u64"))?;
        Ok(ValueBlock {
            range: RowRange::new(start, end),
            data,
        })
    }

    /// Creates a single-field `Int64` value block starting at `start`.
    pub fn from_i64s(start: u64, values: impl IntoIterator<Item = i64>) -> Result<ValueBlock> {
        ValueBlock::new(start, TupleData::from_i64s(values))
    }

    #[inline]
    pub fn data(&self) -> &Arc<TupleData> {
        &self.data
    }

    /// Returns the tuple at the absolute position `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the block range.
    pub fn tuple_at(&self, pos: u64) -> TupleRef<'_> {
        assert!(
            self.range.contains(pos),
            "position {pos} outside block range {}",
            self.range
        );
        self.data.tuple((pos - self.range.start()) as usize)
    }

    pub fn into_ref(self) -> BlockRef {
        Arc::new(self)
    }
}

impl Block for ValueBlock {
    fn as_any(&self) -> &(dyn Any + Send + Sync + 'static) {
        self
    }

    fn range(&self) -> RowRange {
        self.range
    }

    fn layout(&self) -> &TupleLayout {
        self.data.layout()
    }

    fn position_count(&self) -> u64 {
        self.range.length()
    }

    fn cursor(&self) -> Box<dyn BlockCursor> {
        Box::new(ValueBlockCursor {
            range: self.range,
            data: self.data.clone(),
            state: CursorState::BeforeFirst,
        })
    }
}

/// Cursor over a [`ValueBlock`]. Seeking is O(1).
pub struct ValueBlockCursor {
    range: RowRange,
    data: Arc<TupleData>,
    state: CursorState,
}

impl BlockCursor for ValueBlockCursor {
    fn range(&self) -> RowRange {
        self.range
    }

    fn layout(&self) -> &TupleLayout {
        self.data.layout()
    }

    fn state(&self) -> CursorState {
        self.state
    }

    fn advance_next_position(&mut self) -> bool {
        self.state = match self.state {
            CursorState::BeforeFirst => CursorState::At(self.range.start()),
            CursorState::At(pos) if pos < self.range.end() => CursorState::At(pos + 1),
            _ => CursorState::Finished,
        };
        self.is_positioned()
    }

    fn advance_to_position(&mut self, pos: u64) -> bool {
        if self.state == CursorState::Finished {
            return false;
        }
        check_seek(&self.range, self.state, pos);
        if pos > self.range.end() {
            self.state = CursorState::Finished;
            return false;
        }
        self.state = CursorState::At(pos);
        true
    }

    fn tuple(&self) -> TupleRef<'_> {
        let pos = self.position();
        self.data.tuple((pos - self.range.start()) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::ValueBlock;
    use crate::block::{Block, CursorState, collect_positions};
    use strata_ranges::RowRange;

    #[test]
    fn test_value_block_range() {
        let block = ValueBlock::from_i64s(10, (10..20).map(|i| i * 100)).unwrap();
        assert_eq!(block.range(), RowRange::new(10, 19));
        assert_eq!(block.position_count(), 10);
        assert_eq!(block.tuple_at(13).get_i64(0), 1300);
        assert_eq!(collect_positions(&block), (10..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_value_block_rejected() {
        assert!(ValueBlock::from_i64s(0, std::iter::empty()).is_err());
        assert!(ValueBlock::from_i64s(u64::MAX, [1, 2]).is_err());
        assert!(ValueBlock::from_i64s(u64::MAX, [1]).is_ok());
    }

    #[test]
    fn test_cursor_advance() {
        let block = ValueBlock::from_i64s(5, [50, 60, 70]).unwrap();
        let mut cursor = block.cursor();
        assert_eq!(cursor.state(), CursorState::BeforeFirst);
        assert!(!cursor.is_positioned());
        assert!(cursor.advance_next_position());
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.get_i64(0), 50);
        assert!(cursor.advance_next_position());
        assert!(cursor.advance_next_position());
        assert_eq!(cursor.position(), 7);
        assert_eq!(cursor.get_i64(0), 70);
        assert!(!cursor.advance_next_position());
        assert!(cursor.is_finished());
        assert!(!cursor.advance_next_position());
    }

    #[test]
    fn test_cursor_seek() {
        let block = ValueBlock::from_i64s(0, 0..10).unwrap();
        let mut cursor = block.cursor();
        assert!(cursor.advance_to_position(3));
        assert_eq!(cursor.get_i64(0), 3);
        assert!(cursor.advance_to_position(3));
        assert!(cursor.advance_to_position(9));
        assert!(!cursor.advance_next_position());

        let mut cursor = block.cursor();
        assert!(cursor.advance_next_position());
        assert!(!cursor.advance_to_position(10));
        assert!(cursor.is_finished());
        assert!(!cursor.advance_next_position());
        assert!(!cursor.advance_to_position(12));
    }

    #[test]
    #[should_panic(expected = "backward seek")]
    fn test_backward_seek_panics() {
        let block = ValueBlock::from_i64s(0, 0..10).unwrap();
        let mut cursor = block.cursor();
        cursor.advance_to_position(5);
        cursor.advance_to_position(4);
    }

    #[test]
    #[should_panic(expected = "below block range")]
    fn test_seek_below_range_panics() {
        let block = ValueBlock::from_i64s(10, 0..10).unwrap();
        block.cursor().advance_to_position(9);
    }

    #[test]
    #[should_panic(expected = "not positioned")]
    fn test_position_before_first_panics() {
        let block = ValueBlock::from_i64s(0, [1]).unwrap();
        block.cursor().position();
    }
}
