//! Stream contract validation.

use std::sync::Arc;

use strata_common::{Result, error::Error};
use strata_ranges::RowRange;

use crate::{block::BlockRef, layout::TupleLayout, stream::BlockIter};

/// Iterator adapter that validates the [`BlockStream`](crate::BlockStream)
/// contract while blocks are pulled.
///
/// Each block must start strictly after the previous block ends, and must carry
/// the stream layout. The first violation is reported as a contract violation
/// error naming the stream and the offending ranges; the adapter yields nothing
/// afterwards. Upstream errors are passed through and terminate the adapter as
/// well.
pub struct CheckedBlocks {
    inner: BlockIter,
    layout: TupleLayout,
    name: Arc<str>,
    last: Option<RowRange>,
    done: bool,
}

impl CheckedBlocks {
    pub fn new(inner: BlockIter, layout: TupleLayout, name: impl Into<Arc<str>>) -> CheckedBlocks {
        CheckedBlocks {
            inner,
            layout,
            name: name.into(),
            last: None,
            done: false,
        }
    }

    /// Range of the most recently yielded block.
    #[inline]
    pub fn last_range(&self) -> Option<RowRange> {
        self.last
    }

    /// Returns `true` once the underlying iterator is exhausted or failed.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    fn check(&self, block: &BlockRef) -> Result<()> {
        let range = block.range();
        if let Some(last) = self.last {
            if !last.precedes(&range) {
                return Err(Error::contract_violation(
                    format!("{} stream", self.name),
                    format!("block {range} does not follow block {last}"),
                ));
            }
        }
        if *block.layout() != self.layout {
            return Err(Error::contract_violation(
                format!("{} stream", self.name),
                format!(
                    "block {range} has layout {}, expected {}",
                    block.layout(),
                    self.layout
                ),
            ));
        }
        Ok(())
    }
}

impl Iterator for CheckedBlocks {
    type Item = Result<BlockRef>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let block = match self.inner.next() {
            Some(Ok(block)) => block,
            Some(Err(e)) => {
                self.done = true;
                return Some(Err(e));
            }
            None => {
                self.done = true;
                return None;
            }
        };
        if let Err(e) = self.check(&block) {
            self.done = true;
            return Some(Err(e));
        }
        self.last = Some(block.range());
        Some(Ok(block))
    }
}
