use std::collections::VecDeque;
use std::time::Instant;

use killfeed_types::FeedConfig;

use super::entry::{EntryState, FeedEntry, FeedTiming};
use super::opacity::{BaseAlpha, current_opacity};
use crate::parser::KillEvent;

/// Fading entries kept beyond `max_visible` before the oldest are dropped
/// early. Only reached when events arrive faster than fades complete.
const FADING_HEADROOM_FACTOR: usize = 2;

/// An entry paired with the opacity computed for it on the last tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    pub entry: FeedEntry,
    pub opacity: u8,
}

/// Consistent view of the feed handed to renderers after each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    /// Oldest first
    pub entries: Vec<SnapshotEntry>,
    /// Feed toggled on; hidden feeds keep ticking but are not drawn
    pub shown: bool,
    pub base_alpha: u8,
}

impl Default for FeedSnapshot {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            shown: true,
            base_alpha: BaseAlpha::default().value(),
        }
    }
}

/// Bounded, ordered queue of feed entries and their lifecycle.
#[derive(Debug, Clone)]
pub struct KillFeed {
    entries: VecDeque<FeedEntry>,
    /// Opacity per entry as of the last tick, parallel to `entries`
    opacities: VecDeque<u8>,
    timing: FeedTiming,
    alpha: BaseAlpha,
    shown: bool,
    next_id: u64,
    last_tick: Option<Instant>,
}

impl KillFeed {
    pub fn new(timing: FeedTiming, alpha: BaseAlpha) -> Self {
        Self {
            entries: VecDeque::with_capacity(timing.max_visible * FADING_HEADROOM_FACTOR + 1),
            opacities: VecDeque::with_capacity(timing.max_visible * FADING_HEADROOM_FACTOR + 1),
            timing,
            alpha,
            shown: true,
            next_id: 0,
            last_tick: None,
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(FeedTiming::from(config), BaseAlpha::from(config))
    }

    pub fn timing(&self) -> &FeedTiming {
        &self.timing
    }

    /// Append a Visible entry born at `now`.
    ///
    /// If that leaves more than `max_visible` Visible entries, the oldest
    /// Visible one is forced into Fading. The new entry is never rejected.
    pub fn add_event(&mut self, event: KillEvent, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.entries.push_back(FeedEntry::new(id, event, now));
        self.opacities.push_back(self.alpha.shown());

        while self.visible_count() > self.timing.max_visible {
            let Some(oldest) = self
                .entries
                .iter_mut()
                .find(|e| e.state() == EntryState::Visible)
            else {
                break;
            };
            oldest.start_fade(now, true);
            tracing::debug!(entry_id = oldest.id(), "Capacity exceeded, forcing fade");
        }

        self.drop_excess_fading();
        id
    }

    /// One animation tick.
    ///
    /// 1. drop entries whose fade has completed
    /// 2. start at most one new fade, for the oldest overdue Visible entry
    /// 3. recompute every entry's opacity
    ///
    /// Repeating a tick at the same instant (or an earlier one) starts no
    /// new fade.
    pub fn advance(&mut self, now: Instant) {
        let repeated = self.last_tick.is_some_and(|last| now <= last);
        self.last_tick = Some(self.last_tick.map_or(now, |last| last.max(now)));

        let fade_duration = self.timing.fade_duration;
        for entry in self.entries.iter_mut() {
            entry.expire_if_faded(now, fade_duration);
        }
        self.remove_expired();

        if !repeated {
            let show_duration = self.timing.show_duration;
            if let Some(entry) = self
                .entries
                .iter_mut()
                .find(|e| e.state() == EntryState::Visible && e.age(now) >= show_duration)
            {
                entry.start_fade(now, false);
            }
        }

        self.opacities = self
            .entries
            .iter()
            .map(|e| current_opacity(e, now, fade_duration, &self.alpha))
            .collect();
    }

    /// Opacity of `entry` at `now` under this feed's timing and alpha.
    pub fn current_opacity(&self, entry: &FeedEntry, now: Instant) -> u8 {
        current_opacity(entry, now, self.timing.fade_duration, &self.alpha)
    }

    /// Entries oldest first
    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: u64) -> Option<&FeedEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.count_in(EntryState::Visible)
    }

    pub fn fading_count(&self) -> usize {
        self.count_in(EntryState::Fading)
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            entries: self
                .entries
                .iter()
                .zip(self.opacities.iter())
                .map(|(entry, &opacity)| SnapshotEntry {
                    entry: entry.clone(),
                    opacity,
                })
                .collect(),
            shown: self.shown,
            base_alpha: self.alpha.value(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Boundary signals
    // ─────────────────────────────────────────────────────────────────────────

    /// Show/hide the whole feed. Entries keep ageing while hidden.
    pub fn toggle_visibility(&mut self) -> bool {
        self.shown = !self.shown;
        self.shown
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn base_alpha(&self) -> u8 {
        self.alpha.value()
    }

    pub fn increase_alpha(&mut self) -> u8 {
        self.alpha.increase()
    }

    pub fn decrease_alpha(&mut self) -> u8 {
        self.alpha.decrease()
    }

    fn count_in(&self, state: EntryState) -> usize {
        self.entries.iter().filter(|e| e.state() == state).count()
    }

    fn remove_expired(&mut self) {
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].state() == EntryState::Expired {
                self.entries.remove(i);
                self.opacities.remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Bound the queue when bursts outpace fades: the oldest Fading entries
    /// finish early.
    fn drop_excess_fading(&mut self) {
        let limit = self.timing.max_visible * FADING_HEADROOM_FACTOR;
        let mut excess = self.entries.len().saturating_sub(limit);
        if excess == 0 {
            return;
        }
        for entry in self.entries.iter_mut() {
            if excess == 0 {
                break;
            }
            if entry.state() == EntryState::Fading {
                entry.expire_now();
                excess -= 1;
            }
        }
        tracing::debug!(limit, "Feed burst exceeded fading headroom");
        self.remove_expired();
    }
}

impl Default for KillFeed {
    fn default() -> Self {
        Self::new(FeedTiming::default(), BaseAlpha::default())
    }
}
