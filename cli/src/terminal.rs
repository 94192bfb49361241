//! Paints the feed into a truecolor terminal.
//!
//! Opacity changes every tick while something fades, so the painter only
//! redraws when the set of rows, their Visible/Fading state, or visibility
//! changes. Fading rows are drawn dim.

use killfeed_core::{EntryState, FeedSnapshot};
use killfeed_overlay::{MonospaceMetrics, RenderSpec, render_snapshot};
use killfeed_types::{FeedLabels, FeedLayout};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const BELL: char = '\x07';

type FrameKey = (bool, Vec<(u64, EntryState)>);

pub struct TerminalPainter {
    layout: FeedLayout,
    labels: FeedLabels,
    metrics: MonospaceMetrics,
    bell: bool,
    last: Option<FrameKey>,
    newest_seen: Option<u64>,
}

impl TerminalPainter {
    pub fn new(layout: FeedLayout, labels: FeedLabels) -> Self {
        Self {
            layout,
            labels,
            metrics: MonospaceMetrics::default(),
            bell: false,
            last: None,
            newest_seen: None,
        }
    }

    /// Ring the terminal bell when a new kill shows up on a shown feed.
    pub fn with_bell(mut self, bell: bool) -> Self {
        self.bell = bell;
        self
    }

    /// Frame to print for `snapshot`, or `None` if nothing visible changed.
    pub fn paint(&mut self, snapshot: &FeedSnapshot) -> Option<String> {
        // Kills that arrive while hidden never ring later
        let newest = snapshot.entries.last().map(|e| e.entry.id());
        let is_new = newest > self.newest_seen;
        self.newest_seen = self.newest_seen.max(newest);

        let key = (
            snapshot.shown,
            snapshot
                .entries
                .iter()
                .map(|e| (e.entry.id(), e.entry.state()))
                .collect::<Vec<_>>(),
        );
        if self.last.as_ref() == Some(&key) {
            return None;
        }
        self.last = Some(key);

        if !snapshot.shown {
            return Some("── feed hidden ──\n".to_string());
        }

        let mut frame = String::new();
        if self.bell && is_new {
            frame.push(BELL);
        }
        frame.push_str("── kill feed ──\n");

        let specs = render_snapshot(snapshot, &self.layout, &self.labels, &self.metrics);
        for (spec, entry) in specs.iter().zip(&snapshot.entries) {
            let fading = entry.entry.state() != EntryState::Visible;
            frame.push_str(&paint_row(spec, fading));
            frame.push('\n');
        }
        Some(frame)
    }
}

fn paint_row(spec: &RenderSpec, fading: bool) -> String {
    let weight = if fading { DIM } else { BOLD };
    spec.segments
        .iter()
        .map(|segment| {
            let [r, g, b, _] = segment.color;
            format!("{weight}\x1b[38;2;{r};{g};{b}m{}{RESET}", segment.text)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
