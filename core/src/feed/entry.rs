use std::time::{Duration, Instant};

use killfeed_types::FeedConfig;

use crate::parser::KillEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Visible,
    Fading,
    Expired,
}

/// Timing and capacity rules for the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedTiming {
    pub show_duration: Duration,
    pub fade_duration: Duration,
    pub max_visible: usize,
}

impl Default for FeedTiming {
    fn default() -> Self {
        Self::from(&FeedConfig::default())
    }
}

impl From<&FeedConfig> for FeedTiming {
    fn from(config: &FeedConfig) -> Self {
        Self {
            show_duration: Duration::from_millis(config.show_duration_ms),
            fade_duration: Duration::from_millis(config.fade_duration_ms),
            max_visible: config.max_visible_entries.max(1),
        }
    }
}

/// One displayed line's lifecycle record.
///
/// Only [`KillFeed`](super::KillFeed) mutates entries; everyone else sees
/// them through snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    id: u64,
    event: KillEvent,
    born_at: Instant,
    fade_started_at: Option<Instant>,
    state: EntryState,
    forced: bool,
}

impl FeedEntry {
    pub(crate) fn new(id: u64, event: KillEvent, born_at: Instant) -> Self {
        Self {
            id,
            event,
            born_at,
            fade_started_at: None,
            state: EntryState::Visible,
            forced: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn event(&self) -> &KillEvent {
        &self.event
    }

    pub fn born_at(&self) -> Instant {
        self.born_at
    }

    pub fn fade_started_at(&self) -> Option<Instant> {
        self.fade_started_at
    }

    pub fn state(&self) -> EntryState {
        self.state
    }

    /// Fade was started by a capacity overflow rather than by age
    pub fn was_forced(&self) -> bool {
        self.forced
    }

    /// Time since the entry was added, zero if the clock went backwards
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.born_at)
    }

    /// Time spent fading, `None` while still Visible
    pub fn fade_elapsed(&self, now: Instant) -> Option<Duration> {
        self.fade_started_at
            .map(|start| now.saturating_duration_since(start))
    }

    /// Visible → Fading. Returns false if the entry was not Visible.
    pub(crate) fn start_fade(&mut self, now: Instant, forced: bool) -> bool {
        if self.state != EntryState::Visible {
            return false;
        }
        self.state = EntryState::Fading;
        self.fade_started_at = Some(now);
        self.forced = forced;
        true
    }

    /// Fading → Expired once the fade has run its full length.
    pub(crate) fn expire_if_faded(&mut self, now: Instant, fade_duration: Duration) -> bool {
        match self.fade_elapsed(now) {
            Some(elapsed) if self.state == EntryState::Fading && elapsed >= fade_duration => {
                self.state = EntryState::Expired;
                true
            }
            _ => false,
        }
    }

    /// Fading → Expired regardless of fade progress.
    pub(crate) fn expire_now(&mut self) {
        if self.state == EntryState::Fading {
            self.state = EntryState::Expired;
        }
    }

    #[cfg(test)]
    pub(crate) fn with_state(mut self, state: EntryState, fade_started_at: Option<Instant>) -> Self {
        self.state = state;
        self.fade_started_at = fade_started_at;
        self
    }
}
