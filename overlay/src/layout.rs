//! Feed layout: stacks measured rows bottom-up, newest at the bottom.
//!
//! Every row has the same height regardless of its content. Row `i` from
//! the bottom sits at
//!
//! ```text
//! y = height - margin_bottom - (i + 1) * pitch      pitch = row_height + interline
//! ```
//!
//! Rows that land above the top edge are still returned with a negative
//! `y`; clipping is the drawing surface's job.

use killfeed_core::{FeedSnapshot, SnapshotEntry};
use killfeed_types::{FeedLabels, FeedLayout};

use crate::measure::TextMeasure;
use crate::widgets::colors::{self, Rgba};
use crate::widgets::{KillRow, Segment};

/// Vertical metrics shared by every row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMetrics {
    pub row_height: f32,
    /// Row height plus interline spacing
    pub pitch: f32,
    pub bubble_height: f32,
}

impl RowMetrics {
    pub fn new(layout: &FeedLayout, measure: &impl TextMeasure) -> Self {
        let row_height = (measure.line_height() * 1.35).ceil() + layout.pad_y * 2.0;
        Self {
            row_height,
            pitch: row_height + layout.interline,
            bubble_height: (row_height - 2.0).max(0.0),
        }
    }
}

/// Everything a surface needs to draw one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSpec {
    pub entry_id: u64,
    /// Bubble origin in feed coordinates
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    /// Background alpha for this tick
    pub opacity: u8,
    pub background: Rgba,
    /// Segment `x` values are relative to the bubble; text baseline offset is `pad_y`
    pub segments: Vec<Segment>,
    pub text_offset_y: f32,
    pub self_event: bool,
}

/// Lay out `entries` (oldest first) for drawing.
///
/// Output keeps the input order, so the last `RenderSpec` is the newest entry and
/// sits on the bottom row.
pub fn render(
    entries: &[SnapshotEntry],
    layout: &FeedLayout,
    labels: &FeedLabels,
    measure: &impl TextMeasure,
) -> Vec<RenderSpec> {
    let metrics = RowMetrics::new(layout, measure);
    let count = entries.len();

    entries
        .iter()
        .enumerate()
        .map(|(i, snap)| {
            let event = snap.entry.event();
            let row = KillRow::build(event, labels, layout, measure);
            let from_bottom = (count - 1 - i) as f32;
            let y = layout.height - layout.margin_bottom - (from_bottom + 1.0) * metrics.pitch;

            RenderSpec {
                entry_id: snap.entry.id(),
                x: layout.margin_left,
                y,
                width: row.width,
                height: metrics.bubble_height,
                corner_radius: layout.corner_radius,
                opacity: snap.opacity,
                background: colors::bubble(snap.opacity),
                segments: row.segments,
                text_offset_y: layout.pad_y,
                self_event: event.is_self_event,
            }
        })
        .collect()
}

/// Lay out a published snapshot. A hidden feed renders nothing.
pub fn render_snapshot(
    snapshot: &FeedSnapshot,
    layout: &FeedLayout,
    labels: &FeedLabels,
    measure: &impl TextMeasure,
) -> Vec<RenderSpec> {
    if !snapshot.shown {
        return Vec::new();
    }
    render(&snapshot.entries, layout, labels, measure)
}
