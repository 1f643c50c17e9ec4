//! The [`Block`] and [`BlockCursor`] contracts.

use std::{any::Any, fmt, sync::Arc};

use strata_ranges::RowRange;

use crate::{layout::TupleLayout, tuple_data::TupleRef};

/// A range-tagged, immutable slice of columnar tuple data.
///
/// A block covers the contiguous, non-empty [`RowRange`] reported by
/// [`range()`](Block::range). The positions it actually holds are a subset of
/// that range (all of it for a dense value block) and are walked through a
/// [`BlockCursor`].
///
/// Blocks are shared through [`BlockRef`] and are never mutated once handed
/// out, so concurrent readers of the same block are safe.
pub trait Block: Send + Sync + 'static {
    /// Returns a reference to this block as a type-erased `Any` trait object.
    ///
    /// Enables dynamic downcasting to concrete block types.
    fn as_any(&self) -> &(dyn Any + Send + Sync + 'static);

    /// The range of row positions covered by this block.
    fn range(&self) -> RowRange;

    /// The layout of the tuples exposed by this block's cursors.
    fn layout(&self) -> &TupleLayout;

    /// Number of positions a cursor over this block visits.
    fn position_count(&self) -> u64;

    /// Creates a fresh cursor positioned before the first position.
    fn cursor(&self) -> Box<dyn BlockCursor>;
}

/// Shared ownership handle of a block.
pub type BlockRef = Arc<dyn Block>;

impl fmt::Debug for dyn Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("range", &self.range())
            .field("positions", &self.position_count())
            .field("layout", self.layout())
            .finish()
    }
}

/// Position state of a [`BlockCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Not advanced yet ("one before the first position").
    BeforeFirst,
    /// Positioned at the given absolute row position.
    At(u64),
    /// Past the last position of the block.
    Finished,
}

/// A forward iterator over the positions of a single block.
///
/// After every successful advance, [`position()`](BlockCursor::position) lies
/// within [`range()`](BlockCursor::range), and successive positions never
/// decrease.
pub trait BlockCursor: Send {
    /// The range of the block this cursor walks.
    fn range(&self) -> RowRange;

    fn layout(&self) -> &TupleLayout;

    fn state(&self) -> CursorState;

    /// Moves to the next position of the block. Returns `false` once the block
    /// is exhausted; the cursor is then finished.
    fn advance_next_position(&mut self) -> bool;

    /// Moves forward to `pos`, possibly skipping intermediate positions
    /// without decoding them.
    ///
    /// If `pos` lies past the end of the block, the cursor becomes finished.
    /// On a sparse block the cursor lands on the first position `>= pos`.
    /// Returns `true` iff the cursor ends up exactly at `pos`. A finished
    /// cursor stays finished and returns `false`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is below the block range start or below the current
    /// position. Both are programming errors.
    fn advance_to_position(&mut self, pos: u64) -> bool;

    /// The tuple at the current position.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not positioned.
    fn tuple(&self) -> TupleRef<'_>;

    /// The current absolute row position.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not positioned (not advanced yet, or finished).
    #[inline]
    fn position(&self) -> u64 {
        match self.state() {
            CursorState::At(pos) => pos,
            state => panic!(
                "cursor over block {} is not positioned ({state:?})",
                self.range()
            ),
        }
    }

    #[inline]
    fn is_positioned(&self) -> bool {
        matches!(self.state(), CursorState::At(_))
    }

    #[inline]
    fn is_finished(&self) -> bool {
        self.state() == CursorState::Finished
    }

    fn get_i64(&self, field: usize) -> i64 {
        self.tuple().get_i64(field)
    }

    fn get_f64(&self, field: usize) -> f64 {
        self.tuple().get_f64(field)
    }

    fn get_bytes(&self, field: usize) -> &[u8] {
        self.tuple().get_bytes(field)
    }
}

/// Verifies the preconditions of [`BlockCursor::advance_to_position`].
#[inline]
pub(crate) fn check_seek(range: &RowRange, state: CursorState, pos: u64) {
    assert!(
        pos >= range.start(),
        "seek to position {pos} below block range {range}"
    );
    if let CursorState::At(current) = state {
        assert!(
            pos >= current,
            "backward seek from position {current} to {pos} in block {range}"
        );
    }
}

/// Collects the positions visited by a fresh cursor over `block`.
pub fn collect_positions(block: &dyn Block) -> Vec<u64> {
    let mut cursor = block.cursor();
    let mut positions = Vec::with_capacity(block.position_count() as usize);
    while cursor.advance_next_position() {
        positions.push(cursor.position());
    }
    positions
}
