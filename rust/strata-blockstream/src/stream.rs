//! The [`BlockStream`] contract and basic stream sources.

use std::sync::Arc;

use strata_common::Result;

use crate::{
    block::BlockRef,
    checked::CheckedBlocks,
    layout::TupleLayout,
    stream_cursor::StreamCursor,
};

/// A lazy iterator over the blocks of a stream.
///
/// Pulling a block may fail (for example when an upstream decoder hits an I/O
/// error); such failures propagate through the pull call.
pub type BlockIter = Box<dyn Iterator<Item = Result<BlockRef>> + Send>;

/// A lazy, finite and restartable sequence of blocks sharing a tuple layout.
///
/// Every call to [`iter()`](BlockStream::iter) starts a fresh pass over the
/// stream; blocks are not materialized until they are pulled. Within a pass:
/// - blocks are produced in strictly increasing order of their range start,
/// - the ranges of successive blocks do not overlap (they may or may not
///   abut; gaps are legal in position streams),
/// - every block has the stream's [`layout()`](BlockStream::layout).
///
/// Consumers that cannot trust their input wrap the iterator in
/// [`CheckedBlocks`].
pub trait BlockStream: Send + Sync {
    /// The tuple layout shared by all blocks of the stream.
    fn layout(&self) -> &TupleLayout;

    /// Starts a fresh pass over the stream.
    fn iter(&self) -> BlockIter;

    /// Returns a position-level cursor that advances across block boundaries.
    fn cursor(&self) -> StreamCursor {
        StreamCursor::new(self.layout().clone(), self.iter())
    }
}

/// Shared ownership handle of a block stream.
pub type BlockStreamRef = Arc<dyn BlockStream>;

/// A restartable stream over an in-memory list of blocks.
///
/// Construction does not validate block ordering; use
/// [`VecBlockStream::try_new`] for an eagerly validated stream.
#[derive(Clone)]
pub struct VecBlockStream {
    layout: TupleLayout,
    blocks: Arc<[BlockRef]>,
}

impl VecBlockStream {
    pub fn new(layout: TupleLayout, blocks: impl Into<Arc<[BlockRef]>>) -> VecBlockStream {
        VecBlockStream {
            layout,
            blocks: blocks.into(),
        }
    }

    /// Creates the stream, verifying block ordering and layouts up front.
    pub fn try_new(
        layout: TupleLayout,
        blocks: impl Into<Arc<[BlockRef]>>,
    ) -> Result<VecBlockStream> {
        let stream = VecBlockStream::new(layout, blocks);
        for block in CheckedBlocks::new(stream.iter(), stream.layout.clone(), "stream") {
            block?;
        }
        Ok(stream)
    }

    pub fn empty(layout: TupleLayout) -> VecBlockStream {
        VecBlockStream::new(layout, Vec::<BlockRef>::new())
    }

    #[inline]
    pub fn blocks(&self) -> &[BlockRef] {
        &self.blocks
    }

    pub fn into_ref(self) -> BlockStreamRef {
        Arc::new(self)
    }
}

impl BlockStream for VecBlockStream {
    fn layout(&self) -> &TupleLayout {
        &self.layout
    }

    fn iter(&self) -> BlockIter {
        let blocks = self.blocks.clone();
        Box::new((0..blocks.len()).map(move |i| Ok(blocks[i].clone())))
    }
}

/// A stream whose passes are produced on demand by a factory closure.
///
/// Models lazy upstream producers (decoders, filters): the factory is invoked
/// once per [`iter()`](BlockStream::iter) call and the blocks are created as the
/// returned iterator is pulled.
pub struct LazyBlockStream<F> {
    layout: TupleLayout,
    factory: F,
}

impl<F> LazyBlockStream<F>
where
    F: Fn() -> BlockIter + Send + Sync,
{
    pub fn new(layout: TupleLayout, factory: F) -> LazyBlockStream<F> {
        LazyBlockStream { layout, factory }
    }
}

impl<F> BlockStream for LazyBlockStream<F>
where
    F: Fn() -> BlockIter + Send + Sync,
{
    fn layout(&self) -> &TupleLayout {
        &self.layout
    }

    fn iter(&self) -> BlockIter {
        (self.factory)()
    }
}
