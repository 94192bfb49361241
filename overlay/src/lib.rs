//! Presentation adapter for the kill feed.
//!
//! Turns a [`FeedSnapshot`](killfeed_core::FeedSnapshot) into positioned,
//! colored [`RenderSpec`]s. Pixel drawing is left to whatever surface the
//! application owns; nothing here does I/O or keeps state between calls.

pub mod layout;
pub mod measure;
pub mod widgets;

pub use layout::{RenderSpec, RowMetrics, render, render_snapshot};
pub use measure::{MonospaceMetrics, TextMeasure};
pub use widgets::{KillRow, Segment, SegmentRole};
