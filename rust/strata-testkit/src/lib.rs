//! Test utilities for the Strata crates.
//!
//! This crate provides:
//! - Builders for value and position streams from compact range descriptions
//! - Seeded random generation of aligned value/position stream pairs
//! - A reference model of the positional selection, used as a test oracle
//! - A stream wrapper that counts pulled blocks, for laziness checks
//!
//! # Usage
//!
//! This crate is intended for use as a dev-dependency within the Strata
//! workspace.

pub mod counting;
pub mod oracle;
pub mod random;
pub mod stream_gen;

pub use counting::CountingStream;
pub use oracle::{Selection, collect_selection, expected_selection};
pub use random::{RandomStreamConfig, random_streams};
pub use stream_gen::{
    int_layout, position_block, position_stream, value_block, value_at, value_stream,
};
