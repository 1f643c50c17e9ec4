//! Seeded generation of random value/position stream pairs.

use strata_blockstream::{BlockRef, TupleLayout, VecBlockStream};

use crate::{int_layout, position_block, value_block};

/// Shape parameters for [`random_streams`].
#[derive(Debug, Clone)]
pub struct RandomStreamConfig {
    /// Approximate number of rows covered by the value stream.
    pub span: u64,
    /// Maximum number of rows in a value block.
    pub max_value_block: u64,
    /// Maximum number of rows skipped between value blocks.
    pub max_value_gap: u64,
    /// Maximum number of rows covered by a position block.
    pub max_position_block: u64,
    /// Maximum number of rows skipped between position blocks.
    pub max_position_gap: u64,
    /// Probability that a row of a position block is selected.
    pub density: f64,
    /// Probability that a selected row is repeated.
    pub duplicate_rate: f64,
}

impl Default for RandomStreamConfig {
    fn default() -> Self {
        RandomStreamConfig {
            span: 400,
            max_value_block: 25,
            max_value_gap: 0,
            max_position_block: 40,
            max_position_gap: 15,
            density: 0.3,
            duplicate_rate: 0.05,
        }
    }
}

impl RandomStreamConfig {
    /// Value blocks with gaps between them, as produced by a filtered source.
    pub fn sparse_values() -> RandomStreamConfig {
        RandomStreamConfig {
            max_value_gap: 12,
            ..Default::default()
        }
    }

    /// Small position blocks, each selecting most of its rows.
    pub fn dense_positions() -> RandomStreamConfig {
        RandomStreamConfig {
            max_position_block: 6,
            max_position_gap: 2,
            density: 0.8,
            ..Default::default()
        }
    }
}

/// Generates a well-formed value stream and position stream over roughly the
/// same row space.
///
/// Value blocks are built by [`value_block`]. Position blocks may be empty,
/// may straddle value block boundaries, and may start before or end after the
/// value stream.
pub fn random_streams(
    rng: &mut fastrand::Rng,
    config: &RandomStreamConfig,
) -> (VecBlockStream, VecBlockStream) {
    assert!(config.max_value_block > 0 && config.max_position_block > 0);

    let mut values: Vec<BlockRef> = Vec::new();
    let mut start = rng.u64(0..20);
    while start < config.span {
        let end = start + rng.u64(1..=config.max_value_block) - 1;
        values.push(value_block(start, end));
        start = end + 1 + rng.u64(0..=config.max_value_gap);
    }

    let mut positions: Vec<BlockRef> = Vec::new();
    let mut start = rng.u64(0..30);
    while start < config.span + 20 {
        let end = start + rng.u64(1..=config.max_position_block) - 1;
        let mut selected = Vec::new();
        for pos in start..=end {
            if rng.f64() < config.density {
                selected.push(pos);
                if rng.f64() < config.duplicate_rate {
                    selected.push(pos);
                }
            }
        }
        positions.push(position_block(start, end, &selected));
        start = end + 1 + rng.u64(0..=config.max_position_gap);
    }

    (
        VecBlockStream::new(int_layout(), values),
        VecBlockStream::new(TupleLayout::empty(), positions),
    )
}
