//! Kill row widget
//!
//! Lays out one kill as a run of colored segments inside a rounded bubble:
//! `[10:00] Bob killed Alice`, or `[10:00] Alice died (suicide)` when the
//! actor killed itself.

use killfeed_core::KillEvent;
use killfeed_types::{FeedLabels, FeedLayout, formatting};

use super::colors::{self, Rgba};
use crate::measure::TextMeasure;

/// Semantic role of a text segment, used to pick its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentRole {
    Timestamp,
    /// Causing actor
    Killer,
    Verb,
    /// Verb of a self-event
    SelfVerb,
    /// Affected actor
    Victim,
}

/// One measured run of text. `x` is relative to the bubble's left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub role: SegmentRole,
    pub color: Rgba,
    pub x: f32,
    pub width: f32,
}

/// A measured row: segments plus the bubble width that wraps them.
#[derive(Debug, Clone, PartialEq)]
pub struct KillRow {
    pub segments: Vec<Segment>,
    pub width: f32,
}

impl KillRow {
    /// Build and measure the row for `event`.
    ///
    /// Segment widths are rounded up to whole pixels. The bubble is the sum
    /// of widths, one gap between neighbouring segments, and horizontal
    /// padding on both sides, capped at the layout's max bubble width.
    pub fn build(
        event: &KillEvent,
        labels: &FeedLabels,
        layout: &FeedLayout,
        measure: &impl TextMeasure,
    ) -> Self {
        let parts = Self::parts(event, labels);

        let mut segments = Vec::with_capacity(parts.len());
        let mut x = layout.pad_x;
        for (i, (text, role)) in parts.into_iter().enumerate() {
            if i > 0 {
                x += layout.segment_gap;
            }
            let width = measure.text_width(&text).ceil();
            segments.push(Segment {
                color: colors::for_role(role),
                text,
                role,
                x,
                width,
            });
            x += width;
        }

        let content = x - layout.pad_x;
        let width = (content + layout.pad_x * 2.0).min(layout.max_bubble_width());
        Self { segments, width }
    }

    fn parts(event: &KillEvent, labels: &FeedLabels) -> Vec<(String, SegmentRole)> {
        let time = (
            formatting::format_time_tag(&event.display_time),
            SegmentRole::Timestamp,
        );
        if event.is_self_event {
            vec![
                time,
                (event.victim.clone(), SegmentRole::Victim),
                (labels.self_verb.clone(), SegmentRole::SelfVerb),
            ]
        } else {
            vec![
                time,
                (event.killer.clone(), SegmentRole::Killer),
                (labels.kill_verb.clone(), SegmentRole::Verb),
                (event.victim.clone(), SegmentRole::Victim),
            ]
        }
    }

    /// Segments joined with single spaces
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Right edge of the last segment, before padding and capping
    pub fn content_right(&self) -> f32 {
        self.segments.last().map(|s| s.x + s.width).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::MonospaceMetrics;
    use chrono::Utc;

    fn event(killer: &str, victim: &str) -> KillEvent {
        KillEvent {
            occurred_at: Utc::now(),
            display_time: "10:00".to_string(),
            killer: killer.to_string(),
            victim: victim.to_string(),
            is_self_event: killer == victim,
        }
    }

    #[test]
    fn test_kill_segments_and_width() {
        let m = MonospaceMetrics::new(9.0, 19.0);
        let row = KillRow::build(
            &event("Bob", "Alice"),
            &FeedLabels::default(),
            &FeedLayout::default(),
            &m,
        );

        let roles: Vec<_> = row.segments.iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            [
                SegmentRole::Timestamp,
                SegmentRole::Killer,
                SegmentRole::Verb,
                SegmentRole::Victim
            ]
        );
        assert_eq!(row.plain_text(), "[10:00] Bob killed Alice");

        // 7 + 3 + 6 + 5 chars, three gaps, padding both sides
        assert_eq!(row.width, 189.0 + 24.0 + 20.0);
        assert_eq!(row.segments[0].x, 10.0);
        assert_eq!(row.segments[1].x, 10.0 + 63.0 + 8.0);
        assert_eq!(row.content_right(), 10.0 + 189.0 + 24.0);
    }

    #[test]
    fn test_self_event_uses_self_verb() {
        let m = MonospaceMetrics::default();
        let row = KillRow::build(
            &event("Alice", "Alice"),
            &FeedLabels::default(),
            &FeedLayout::default(),
            &m,
        );

        assert_eq!(row.segments.len(), 3);
        assert_eq!(row.segments[2].role, SegmentRole::SelfVerb);
        assert_eq!(row.segments[2].color, colors::self_verb());
        assert_eq!(row.plain_text(), "[10:00] Alice died (suicide)");
    }

    #[test]
    fn test_width_capped_at_layout_max() {
        let m = MonospaceMetrics::new(9.0, 19.0);
        let long = "X".repeat(80);
        let layout = FeedLayout::default();
        let row = KillRow::build(&event(&long, "Alice"), &FeedLabels::default(), &layout, &m);

        assert_eq!(row.width, layout.max_bubble_width());
        assert!(row.content_right() > row.width);
    }

    #[test]
    fn test_custom_labels() {
        let m = MonospaceMetrics::default();
        let labels = FeedLabels {
            kill_verb: "вбив".to_string(),
            self_verb: "помер".to_string(),
        };
        let row = KillRow::build(&event("Bob", "Alice"), &labels, &FeedLayout::default(), &m);
        assert_eq!(row.plain_text(), "[10:00] Bob вбив Alice");
    }
}
