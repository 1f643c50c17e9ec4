//! Position blocks: sorted row positions selected by an upstream filter.

use std::{any::Any, sync::Arc};

use strata_common::{Result, error::Error};
use strata_ranges::RowRange;

use crate::{
    block::{Block, BlockCursor, BlockRef, CursorState, check_seek},
    layout::TupleLayout,
    tuple_data::TupleRef,
};

/// A block carrying only row positions, without tuple data.
///
/// The positions are sorted in non-decreasing order and all lie within the
/// block range. The range may be wider than the positions it holds (a filter
/// that evaluated rows `[0..99]` but selected only a few of them still reports
/// `[0..99]`), and the position list may be empty.
pub struct PositionBlock {
    range: RowRange,
    positions: Arc<[u64]>,
    layout: TupleLayout,
}

impl PositionBlock {
    /// Creates a position block over `range`.
    ///
    /// # Errors
    ///
    /// Fails if the positions are not sorted or if any of them falls outside
    /// `range`.
    pub fn new(range: RowRange, positions: impl Into<Arc<[u64]>>) -> Result<PositionBlock> {
        let positions = positions.into();
        if let Some(i) = positions.windows(2).position(|w| w[0] > w[1]) {
            return Err(Error::invalid_arg(
                "positions",
                format!(
                    "positions must be sorted, found {} followed by {}",
                    positions[i],
                    positions[i + 1]
                ),
            ));
        }
        if let (Some(&first), Some(&last)) = (positions.first(), positions.last()) {
            if !range.contains(first) || !range.contains(last) {
                return Err(Error::invalid_arg(
                    "positions",
                    format!("positions [{first}..{last}] exceed block range {range}"),
                ));
            }
        }
        Ok(PositionBlock {
            range,
            positions,
            layout: TupleLayout::empty(),
        })
    }

    /// Creates a position block whose range spans exactly from the first to
    /// the last position.
    ///
    /// # Errors
    ///
    /// Fails if `positions` is empty or unsorted.
    pub fn from_positions(positions: impl Into<Arc<[u64]>>) -> Result<PositionBlock> {
        let positions = positions.into();
        let range = match (positions.first(), positions.last()) {
            (Some(&first), Some(&last)) => RowRange::try_new(first, last),
            _ => None,
        }
        .ok_or_else(|| {
            Error::invalid_arg("positions", "cannot derive a range from unsorted or empty positions")
        })?;
        PositionBlock::new(range, positions)
    }

    #[inline]
    pub fn positions(&self) -> &[u64] {
        &self.positions
    }

    pub fn into_ref(self) -> BlockRef {
        Arc::new(self)
    }
}

impl Block for PositionBlock {
    fn as_any(&self) -> &(dyn Any + Send + Sync + 'static) {
        self
    }

    fn range(&self) -> RowRange {
        self.range
    }

    fn layout(&self) -> &TupleLayout {
        &self.layout
    }

    fn position_count(&self) -> u64 {
        self.positions.len() as u64
    }

    fn cursor(&self) -> Box<dyn BlockCursor> {
        Box::new(PositionBlockCursor {
            range: self.range,
            positions: self.positions.clone(),
            layout: self.layout.clone(),
            next: 0,
            state: CursorState::BeforeFirst,
        })
    }
}

/// Cursor over a [`PositionBlock`]. Seeking binary-searches the remaining
/// positions.
pub struct PositionBlockCursor {
    range: RowRange,
    positions: Arc<[u64]>,
    layout: TupleLayout,
    /// Index of the next position to visit.
    next: usize,
    state: CursorState,
}

impl PositionBlockCursor {
    fn land(&mut self, index: usize) -> bool {
        match self.positions.get(index) {
            Some(&pos) => {
                self.next = index + 1;
                self.state = CursorState::At(pos);
                true
            }
            None => {
                self.next = self.positions.len();
                self.state = CursorState::Finished;
                false
            }
        }
    }
}

impl BlockCursor for PositionBlockCursor {
    fn range(&self) -> RowRange {
        self.range
    }

    fn layout(&self) -> &TupleLayout {
        &self.layout
    }

    fn state(&self) -> CursorState {
        self.state
    }

    fn advance_next_position(&mut self) -> bool {
        if self.state == CursorState::Finished {
            return false;
        }
        self.land(self.next)
    }

    fn advance_to_position(&mut self, pos: u64) -> bool {
        if self.state == CursorState::Finished {
            return false;
        }
        check_seek(&self.range, self.state, pos);
        if self.state == CursorState::At(pos) {
            return true;
        }
        if pos > self.range.end() {
            return self.land(self.positions.len());
        }
        let index = self.next + self.positions[self.next..].partition_point(|&p| p < pos);
        self.land(index) && self.position() == pos
    }

    fn tuple(&self) -> TupleRef<'_> {
        debug_assert!(self.is_positioned());
        TupleRef::empty(&self.layout)
    }
}
