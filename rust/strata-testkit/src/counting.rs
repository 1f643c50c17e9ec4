//! A block stream wrapper that counts pulled blocks.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use strata_blockstream::{BlockIter, BlockStream, BlockStreamRef, TupleLayout};

/// Wraps a stream and counts the blocks pulled from it across all passes.
///
/// Used to verify that consumers pull lazily and stop pulling once they know
/// no further output is possible.
pub struct CountingStream {
    inner: BlockStreamRef,
    pulled: Arc<AtomicUsize>,
}

impl CountingStream {
    pub fn new(inner: BlockStreamRef) -> CountingStream {
        CountingStream {
            inner,
            pulled: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of blocks pulled so far, including failed pulls.
    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.pulled.store(0, Ordering::SeqCst);
    }
}

impl BlockStream for CountingStream {
    fn layout(&self) -> &TupleLayout {
        self.inner.layout()
    }

    fn iter(&self) -> BlockIter {
        let pulled = self.pulled.clone();
        Box::new(self.inner.iter().inspect(move |_| {
            pulled.fetch_add(1, Ordering::SeqCst);
        }))
    }
}

#[cfg(test)]
mod tests {
    use strata_blockstream::BlockStream;

    use super::CountingStream;
    use crate::value_stream;

    #[test]
    fn test_counts_pulls() {
        let stream = CountingStream::new(value_stream(&[(0, 9), (10, 19), (20, 29)]).into_ref());
        let mut iter = stream.iter();
        assert!(iter.next().is_some());
        assert_eq!(stream.pulled(), 1);
        assert_eq!(iter.count(), 2);
        assert_eq!(stream.pulled(), 3);

        stream.reset();
        assert_eq!(stream.iter().take(1).count(), 1);
        assert_eq!(stream.pulled(), 1);
    }
}
