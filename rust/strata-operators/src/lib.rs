//! Block stream operators.
//!
//! Operators consume one or more [`BlockStream`]s and are themselves exposed as
//! block streams, so they compose. All operators are pull-driven and
//! single-threaded: work happens only while the consumer pulls the next block.
//!
//! - [`PositionalScan`] - emits the values of a value stream at the positions
//!   selected by a position stream
//!
//! [`BlockStream`]: strata_blockstream::BlockStream

pub mod positional_scan;

#[cfg(test)]
mod tests;

pub use positional_scan::{PositionalScan, PositionalScanIter, ScanOptions, ScanStats};
