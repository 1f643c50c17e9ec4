//! Position-level cursor over a whole block stream.

use strata_common::Result;
use strata_ranges::RowRange;

use crate::{
    block::BlockCursor,
    checked::CheckedBlocks,
    layout::TupleLayout,
    stream::BlockIter,
    tuple_data::TupleRef,
};

/// A cursor over all positions of a block stream, transparently advancing
/// across block boundaries.
///
/// Blocks are pulled lazily as the cursor moves, so advancing may fail with an
/// upstream error or a contract violation of the stream; once that happens the
/// cursor is finished.
pub struct StreamCursor {
    layout: TupleLayout,
    blocks: CheckedBlocks,
    current: Option<Box<dyn BlockCursor>>,
    finished: bool,
}

impl StreamCursor {
    pub fn new(layout: TupleLayout, blocks: BlockIter) -> StreamCursor {
        StreamCursor {
            blocks: CheckedBlocks::new(blocks, layout.clone(), "cursor"),
            layout,
            current: None,
            finished: false,
        }
    }

    #[inline]
    pub fn layout(&self) -> &TupleLayout {
        &self.layout
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_positioned(&self) -> bool {
        !self.finished && self.current.as_ref().is_some_and(|c| c.is_positioned())
    }

    /// Moves to the next position of the stream, pulling blocks as needed.
    /// Returns `Ok(false)` once the stream is exhausted.
    pub fn advance_next_position(&mut self) -> Result<bool> {
        loop {
            if self.finished {
                return Ok(false);
            }
            if let Some(cursor) = self.current.as_mut() {
                if cursor.advance_next_position() {
                    return Ok(true);
                }
            }
            self.load_next_block()?;
        }
    }

    /// Moves forward to `pos`, skipping whole blocks that end before it.
    ///
    /// If `pos` falls into a gap between blocks, or on a position the
    /// containing block does not hold, the cursor lands on the next available
    /// position and `Ok(false)` is returned. `Ok(false)` is also returned when
    /// the stream is exhausted before reaching `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is below the current position.
    pub fn advance_to_position(&mut self, pos: u64) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        if let Some(cursor) = self.current.as_ref().filter(|c| c.is_positioned()) {
            let current = cursor.position();
            assert!(
                pos >= current,
                "backward seek from position {current} to {pos} in stream cursor"
            );
        }
        loop {
            if let Some(cursor) = self.current.as_mut() {
                let range = cursor.range();
                if !cursor.is_finished() && pos <= range.end() {
                    if pos < range.start() {
                        // gap before this block
                        if cursor.advance_next_position() {
                            return Ok(false);
                        }
                    } else if cursor.advance_to_position(pos) {
                        return Ok(true);
                    } else if !cursor.is_finished() {
                        return Ok(false);
                    }
                }
            }
            if !self.load_next_block()? {
                return Ok(false);
            }
        }
    }

    /// The current absolute row position.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not positioned.
    pub fn position(&self) -> u64 {
        self.positioned_cursor().position()
    }

    /// The range of the block the cursor is currently in.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not positioned.
    pub fn range(&self) -> RowRange {
        self.positioned_cursor().range()
    }

    pub fn tuple(&self) -> TupleRef<'_> {
        self.positioned_cursor().tuple()
    }

    pub fn get_i64(&self, field: usize) -> i64 {
        self.positioned_cursor().get_i64(field)
    }

    pub fn get_f64(&self, field: usize) -> f64 {
        self.positioned_cursor().get_f64(field)
    }

    pub fn get_bytes(&self, field: usize) -> &[u8] {
        self.positioned_cursor().get_bytes(field)
    }

    fn positioned_cursor(&self) -> &dyn BlockCursor {
        match self.current.as_deref() {
            Some(cursor) if !self.finished && cursor.is_positioned() => cursor,
            _ => panic!("stream cursor is not positioned"),
        }
    }

    /// Pulls the next block and makes it current. Returns `Ok(false)` when the
    /// stream is exhausted.
    fn load_next_block(&mut self) -> Result<bool> {
        match self.blocks.next() {
            Some(Ok(block)) => {
                self.current = Some(block.cursor());
                Ok(true)
            }
            Some(Err(e)) => {
                self.current = None;
                self.finished = true;
                Err(e)
            }
            None => {
                self.current = None;
                self.finished = true;
                Ok(false)
            }
        }
    }
}
