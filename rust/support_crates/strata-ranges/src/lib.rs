//! Row ranges and ordered position sequences.
//!
//! This crate provides the leaf value types shared by every block stream:
//!
//! - [`RowRange`] - an inclusive interval of absolute row positions that tags
//!   each block and cursor
//! - [`intersect`] - a streaming set intersection of two ascending position
//!   sequences

pub mod intersection;
pub mod row_range;

pub use intersection::{Intersection, intersect};
pub use row_range::RowRange;
