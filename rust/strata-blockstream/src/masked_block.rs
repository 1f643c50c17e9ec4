//! Masked value blocks: a decorator exposing a selected subset of the positions
//! of an underlying block.

use std::{any::Any, sync::Arc};

use strata_common::{Result, error::Error, verify_arg};
use strata_ranges::RowRange;

use crate::{
    block::{Block, BlockCursor, BlockRef, CursorState, check_seek},
    layout::TupleLayout,
    tuple_data::TupleRef,
};

/// A block that exposes only the selected positions of an underlying block.
///
/// The mask is an ordered, deduplicated list of absolute positions, all within
/// the underlying block's range, and each present in the underlying block.
/// The masked block reports the underlying range (not the span of the selected
/// positions), so downstream operators stay aligned with the original row space.
///
/// Field accessors delegate to the underlying block, after seeking its cursor
/// to the selected position. Nothing is copied: the masked block shares the
/// underlying block and the position list.
pub struct MaskedValueBlock {
    underlying: BlockRef,
    positions: Arc<[u64]>,
}

impl MaskedValueBlock {
    /// Creates a masked view of `underlying` selecting `positions`.
    ///
    /// # Errors
    ///
    /// Fails if `positions` is empty, not strictly ascending, or reaches outside
    /// the underlying block's range.
    pub fn new(underlying: BlockRef, positions: impl Into<Arc<[u64]>>) -> Result<MaskedValueBlock> {
        let positions = positions.into();
        verify_arg!(positions, !positions.is_empty());
        if let Some(i) = positions.windows(2).position(|w| w[0] >= w[1]) {
            return Err(Error::invalid_arg(
                "positions",
                format!(
                    "mask positions must be strictly ascending, found {} followed by {}",
                    positions[i],
                    positions[i + 1]
                ),
            ));
        }
        let range = underlying.range();
        let (first, last) = (positions[0], positions[positions.len() - 1]);
        if !range.contains(first) || !range.contains(last) {
            return Err(Error::invalid_arg(
                "positions",
                format!("mask positions [{first}..{last}] exceed underlying block range {range}"),
            ));
        }
        Ok(MaskedValueBlock {
            underlying,
            positions,
        })
    }

    #[inline]
    pub fn underlying(&self) -> &BlockRef {
        &self.underlying
    }

    /// The selected positions, strictly ascending.
    #[inline]
    pub fn positions(&self) -> &[u64] {
        &self.positions
    }

    pub fn into_ref(self) -> BlockRef {
        Arc::new(self)
    }
}

impl Block for MaskedValueBlock {
    fn as_any(&self) -> &(dyn Any + Send + Sync + 'static) {
        self
    }

    fn range(&self) -> RowRange {
        self.underlying.range()
    }

    fn layout(&self) -> &TupleLayout {
        self.underlying.layout()
    }

    fn position_count(&self) -> u64 {
        self.positions.len() as u64
    }

    fn cursor(&self) -> Box<dyn BlockCursor> {
        Box::new(MaskedValueBlockCursor {
            underlying: self.underlying.cursor(),
            positions: self.positions.clone(),
            next: 0,
            state: CursorState::BeforeFirst,
        })
    }
}

/// Cursor walking the selected positions of a [`MaskedValueBlock`].
pub struct MaskedValueBlockCursor {
    underlying: Box<dyn BlockCursor>,
    positions: Arc<[u64]>,
    /// Index of the next selected position to visit.
    next: usize,
    state: CursorState,
}

impl MaskedValueBlockCursor {
    fn land(&mut self, index: usize) -> bool {
        match self.positions.get(index) {
            Some(&pos) => {
                let landed = self.underlying.advance_to_position(pos);
                assert!(
                    landed,
                    "masked position {pos} is absent from the underlying block {}",
                    self.underlying.range()
                );
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

impl BlockCursor for MaskedValueBlockCursor {
    fn range(&self) -> RowRange {
        self.underlying.range()
    }

    fn layout(&self) -> &TupleLayout {
        self.underlying.layout()
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
        let range = self.range();
        check_seek(&range, self.state, pos);
        if self.state == CursorState::At(pos) {
            return true;
        }
        if pos > range.end() {
            return self.land(self.positions.len());
        }
        let index = self.next + self.positions[self.next..].partition_point(|&p| p < pos);
        self.land(index) && self.position() == pos
    }

    fn tuple(&self) -> TupleRef<'_> {
        debug_assert!(self.is_positioned());
        self.underlying.tuple()
    }
}
