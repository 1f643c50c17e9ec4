//! Positional scan: emits the values of a value stream at the positions
//! selected by a position stream.
//!
//! Both inputs are block streams ordered by row position. The scan walks the
//! value stream one block at a time and keeps a one-block lookahead on the
//! position stream. For each value block `V` it:
//!
//! 1. discards position blocks that end before `V` starts,
//! 2. collects the position blocks overlapping `V`, keeping the last one (which
//!    may straddle into the next value block) as the lookahead,
//! 3. intersects the collected positions with the positions of `V`, seeking a
//!    single value cursor forward,
//! 4. emits a [`MaskedValueBlock`] over `V` with the matching positions, or
//!    drops `V` if nothing matched.
//!
//! Blocks of either stream are pulled only when needed, and pulling stops as
//! soon as the position stream is known to be exhausted.

use std::{mem, sync::Arc};

use log::{debug, error, trace};
use strata_blockstream::{
    BlockIter, BlockRef, BlockStream, BlockStreamRef, CheckedBlocks, MaskedValueBlock, TupleLayout,
};
use strata_common::{Result, try_or_ret_some_err};

/// Options controlling a [`PositionalScan`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
    verify_ordering: bool,
    collect_capacity: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            verify_ordering: true,
            collect_capacity: 4,
        }
    }
}

impl ScanOptions {
    pub fn new() -> ScanOptions {
        Default::default()
    }

    /// Whether both inputs are checked for block ordering and layout while
    /// they are pulled. A violation surfaces as a contract violation error
    /// and terminates the scan.
    ///
    /// Enabled by default. Disable only for inputs known to be well formed.
    pub fn verify_ordering(mut self, verify: bool) -> Self {
        self.verify_ordering = verify;
        self
    }

    /// Initial capacity of the list of position blocks collected for a value
    /// block.
    pub fn collect_capacity(mut self, capacity: usize) -> Self {
        self.collect_capacity = capacity;
        self
    }

    #[inline]
    pub fn is_verifying_ordering(&self) -> bool {
        self.verify_ordering
    }
}

/// Counters describing the work performed by one pass of a positional scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Value blocks pulled from the source stream.
    pub value_blocks: u64,
    /// Position blocks pulled from the position stream.
    pub position_blocks: u64,
    /// Masked blocks produced.
    pub emitted_blocks: u64,
    /// Value blocks with no selected position.
    pub dropped_blocks: u64,
    /// Total number of positions across the produced blocks.
    pub selected_positions: u64,
}

/// A block stream selecting the rows of `source` at the positions produced by
/// `positions`.
///
/// The output has the layout of the source. Each output block is a
/// [`MaskedValueBlock`] reporting the full range of its source block, with at
/// least one selected position. Positions that fall outside every source
/// block, or that the source block does not hold, are skipped. Duplicate
/// positions select the row once.
///
/// The scan is restartable: every [`iter()`](BlockStream::iter) starts fresh
/// passes over both inputs.
#[derive(Clone)]
pub struct PositionalScan {
    source: BlockStreamRef,
    positions: BlockStreamRef,
    options: ScanOptions,
}

impl PositionalScan {
    pub fn new(source: BlockStreamRef, positions: BlockStreamRef) -> PositionalScan {
        PositionalScan::with_options(source, positions, ScanOptions::default())
    }

    pub fn with_options(
        source: BlockStreamRef,
        positions: BlockStreamRef,
        options: ScanOptions,
    ) -> PositionalScan {
        PositionalScan {
            source,
            positions,
            options,
        }
    }

    #[inline]
    pub fn source(&self) -> &BlockStreamRef {
        &self.source
    }

    #[inline]
    pub fn positions(&self) -> &BlockStreamRef {
        &self.positions
    }

    #[inline]
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn into_ref(self) -> BlockStreamRef {
        Arc::new(self)
    }

    /// Starts a pass over the scan, returning the concrete iterator so that
    /// its [`stats()`](PositionalScanIter::stats) can be inspected.
    pub fn scan(&self) -> PositionalScanIter {
        let (values, positions) = if self.options.verify_ordering {
            (
                Box::new(CheckedBlocks::new(
                    self.source.iter(),
                    self.source.layout().clone(),
                    "values",
                )) as BlockIter,
                Box::new(CheckedBlocks::new(
                    self.positions.iter(),
                    self.positions.layout().clone(),
                    "positions",
                )) as BlockIter,
            )
        } else {
            (self.source.iter(), self.positions.iter())
        };
        PositionalScanIter {
            values,
            positions,
            current: None,
            positions_exhausted: false,
            collected: Vec::with_capacity(self.options.collect_capacity),
            state: ScanState::Start,
            stats: ScanStats::default(),
            reported: false,
        }
    }
}

impl BlockStream for PositionalScan {
    fn layout(&self) -> &TupleLayout {
        self.source.layout()
    }

    fn iter(&self) -> BlockIter {
        Box::new(self.scan())
    }
}

enum ScanState {
    /// The position lookahead has not been loaded yet.
    Start,
    /// Ready to pull the next value block.
    NeedValue,
    /// Skipping position blocks that end before the value block.
    AlignPositions(BlockRef),
    /// Gathering the position blocks that overlap the value block.
    Collect(BlockRef),
    /// Matching the collected positions against the value block.
    Intersect(BlockRef),
    /// A masked block is ready to be produced.
    Emit(BlockRef, Vec<u64>),
    Done,
}

/// One pass of a [`PositionalScan`].
///
/// Yields masked value blocks in source order. The first error (an upstream
/// failure or a contract violation of either input) is yielded once, after
/// which the iterator returns `None`.
pub struct PositionalScanIter {
    values: BlockIter,
    positions: BlockIter,
    /// Lookahead position block. Set once the first pull loads it, and kept
    /// until the scan completes.
    current: Option<BlockRef>,
    positions_exhausted: bool,
    /// Position blocks overlapping the value block being processed.
    collected: Vec<BlockRef>,
    state: ScanState,
    stats: ScanStats,
    reported: bool,
}

impl PositionalScanIter {
    #[inline]
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    fn load_lookahead(&mut self) -> Result<ScanState> {
        self.current = self.pull_position()?;
        if self.current.is_none() {
            debug!("positional scan: position stream is empty");
            return Ok(ScanState::Done);
        }
        Ok(ScanState::NeedValue)
    }

    fn pull_value(&mut self) -> Result<ScanState> {
        match self.values.next() {
            Some(block) => {
                let block = block?;
                self.stats.value_blocks += 1;
                Ok(ScanState::AlignPositions(block))
            }
            None => Ok(ScanState::Done),
        }
    }

    /// Pulls the next position block, or returns `None` once the position
    /// stream is exhausted.
    fn pull_position(&mut self) -> Result<Option<BlockRef>> {
        if self.positions_exhausted {
            return Ok(None);
        }
        match self.positions.next() {
            Some(block) => {
                let block = block?;
                self.stats.position_blocks += 1;
                Ok(Some(block))
            }
            None => {
                self.positions_exhausted = true;
                Ok(None)
            }
        }
    }

    fn align_positions(&mut self, value: BlockRef) -> Result<ScanState> {
        let range = value.range();
        loop {
            let Some(current) = self.current.as_ref() else {
                return Ok(ScanState::Done);
            };
            let current_range = current.range();
            if current_range.end() >= range.start() {
                return Ok(ScanState::Collect(value));
            }
            match self.pull_position()? {
                Some(next) => {
                    trace!("positional scan: position block {current_range} precedes {range}");
                    self.current = Some(next);
                }
                None => {
                    debug!(
                        "positional scan: position stream ends at {current_range}, \
                         before value block {range}"
                    );
                    self.current = None;
                    return Ok(ScanState::Done);
                }
            }
        }
    }

    fn collect_positions(&mut self, value: BlockRef) -> Result<ScanState> {
        let range = value.range();
        self.collected.clear();
        while let Some(current) = self.current.clone() {
            if current.range().end() >= range.end() {
                break;
            }
            match self.pull_position()? {
                Some(next) => {
                    self.collected.push(current);
                    self.current = Some(next);
                }
                None => break,
            }
        }
        // The lookahead may reach past the value block; it is matched here and
        // stays current for the next value block.
        if let Some(current) = &self.current {
            if current.range().overlaps(&range) {
                self.collected.push(current.clone());
            }
        }
        Ok(ScanState::Intersect(value))
    }

    fn intersect(&mut self, value: BlockRef) -> ScanState {
        let range = value.range();
        let mut selected: Vec<u64> = Vec::new();
        let mut value_cursor = value.cursor();
        if value_cursor.advance_next_position() {
            'blocks: for block in self.collected.drain(..) {
                let mut cursor = block.cursor();
                while cursor.advance_next_position() {
                    let pos = cursor.position();
                    if pos > range.end() {
                        break;
                    }
                    if pos > value_cursor.position() && !value_cursor.advance_to_position(pos) {
                        if value_cursor.is_finished() {
                            break 'blocks;
                        }
                        continue;
                    }
                    if value_cursor.position() == pos && selected.last() != Some(&pos) {
                        selected.push(pos);
                    }
                }
            }
        }
        self.collected.clear();

        if selected.is_empty() {
            self.stats.dropped_blocks += 1;
            trace!("positional scan: no positions selected in value block {range}");
            ScanState::NeedValue
        } else {
            ScanState::Emit(value, selected)
        }
    }

    fn emit(&mut self, value: BlockRef, selected: Vec<u64>) -> Result<BlockRef> {
        trace!(
            "positional scan: {} positions selected in value block {}",
            selected.len(),
            value.range()
        );
        self.stats.emitted_blocks += 1;
        self.stats.selected_positions += selected.len() as u64;
        Ok(MaskedValueBlock::new(value, selected)?.into_ref())
    }

    fn report_completion(&mut self) {
        if !self.reported {
            self.reported = true;
            debug!("positional scan completed: {:?}", self.stats);
        }
    }
}

impl Iterator for PositionalScanIter {
    type Item = Result<BlockRef>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let step = match mem::replace(&mut self.state, ScanState::Done) {
                ScanState::Start => self.load_lookahead(),
                ScanState::NeedValue => self.pull_value(),
                ScanState::AlignPositions(value) => self.align_positions(value),
                ScanState::Collect(value) => self.collect_positions(value),
                ScanState::Intersect(value) => Ok(self.intersect(value)),
                ScanState::Emit(value, selected) => {
                    let block = try_or_ret_some_err!(self.emit(value, selected));
                    self.state = ScanState::NeedValue;
                    return Some(Ok(block));
                }
                ScanState::Done => {
                    self.report_completion();
                    return None;
                }
            };
            match step {
                Ok(state) => self.state = state,
                Err(e) => {
                    error!("positional scan failed: {e}");
                    self.current = None;
                    self.collected.clear();
                    self.reported = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
