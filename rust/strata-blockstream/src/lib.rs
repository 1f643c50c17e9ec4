//! Range-tagged columnar blocks and lazy block streams.
//!
//! A block stream is a finite, restartable sequence of blocks sharing a single
//! [`TupleLayout`]. Each block covers a contiguous [`RowRange`] of absolute row
//! positions and hands out cursors that walk its positions in ascending order,
//! with the ability to seek forward to a given position.
//!
//! # Main Components
//!
//! - [`layout`]: field types and the tuple layout carried by every stream
//! - [`tuple_data`]: the encoded storage backing value blocks
//! - [`block`]: the [`Block`] and [`BlockCursor`] contracts
//! - [`value_block`], [`position_block`], [`masked_block`]: the block variants
//! - [`stream`]: the [`BlockStream`] contract and in-memory / lazy sources
//! - [`checked`]: an adapter validating block ordering and layout on the fly
//! - [`stream_cursor`]: a position-level cursor flattening block boundaries
//!
//! [`RowRange`]: strata_ranges::RowRange

pub mod block;
pub mod checked;
pub mod layout;
pub mod masked_block;
pub mod position_block;
pub mod stream;
pub mod stream_cursor;
pub mod tuple_data;
pub mod value_block;


pub use block::{Block, BlockCursor, BlockRef, CursorState, collect_positions};
pub use checked::CheckedBlocks;
pub use layout::{FieldType, TupleLayout};
pub use masked_block::MaskedValueBlock;
pub use position_block::PositionBlock;
pub use stream::{BlockIter, BlockStream, BlockStreamRef, LazyBlockStream, VecBlockStream};
pub use stream_cursor::StreamCursor;
pub use tuple_data::{FieldValue, TupleData, TupleDataBuilder, TupleRef};
pub use value_block::ValueBlock;
