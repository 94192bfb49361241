//! Building blocks for a single feed row
//!
//! - [`KillRow`] - segments of one kill line with measured widths
//! - [`colors`] - RGBA palette per segment role

pub mod colors;
mod kill_row;

pub use kill_row::{KillRow, Segment, SegmentRole};
