//! Tests for the feed lifecycle
//!
//! Capacity, fade staggering, timing and opacity behaviour of `KillFeed`.

use std::time::{Duration, Instant};

use chrono::Utc;

use super::entry::{EntryState, FeedTiming};
use super::manager::KillFeed;
use super::opacity::BaseAlpha;
use crate::parser::KillEvent;

const SHOW: Duration = Duration::from_millis(7500);
const FADE: Duration = Duration::from_millis(1800);
const TICK: Duration = Duration::from_millis(33);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn kill(n: usize) -> KillEvent {
    KillEvent {
        occurred_at: Utc::now(),
        display_time: "10:00".to_string(),
        killer: format!("Killer{n}"),
        victim: format!("Victim{n}"),
        is_self_event: false,
    }
}

fn make_feed(max_visible: usize) -> KillFeed {
    KillFeed::new(
        FeedTiming {
            show_duration: SHOW,
            fade_duration: FADE,
            max_visible,
        },
        BaseAlpha::new(170, 40, 20),
    )
}

fn states(feed: &KillFeed) -> Vec<EntryState> {
    feed.entries().map(|e| e.state()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Capacity
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_overflow_forces_oldest_into_fading() {
    let mut feed = make_feed(5);
    let t0 = Instant::now();

    for i in 0..7 {
        feed.add_event(kill(i), t0 + ms(i as u64));
    }

    assert_eq!(feed.len(), 7);
    assert_eq!(feed.visible_count(), 5);
    assert_eq!(
        states(&feed),
        vec![
            EntryState::Fading,
            EntryState::Fading,
            EntryState::Visible,
            EntryState::Visible,
            EntryState::Visible,
            EntryState::Visible,
            EntryState::Visible,
        ]
    );

    let forced: Vec<bool> = feed.entries().map(|e| e.was_forced()).collect();
    assert_eq!(forced, vec![true, true, false, false, false, false, false]);

    // The newest five are the ones still shown
    let shown: Vec<&str> = feed
        .entries()
        .filter(|e| e.state() == EntryState::Visible)
        .map(|e| e.event().killer.as_str())
        .collect();
    assert_eq!(shown, vec!["Killer2", "Killer3", "Killer4", "Killer5", "Killer6"]);
}

#[test]
fn test_visible_count_never_exceeds_capacity() {
    let t0 = Instant::now();
    for max_visible in 1..=6 {
        let mut feed = make_feed(max_visible);
        for i in 0..40 {
            let now = t0 + ms(i as u64 * 250);
            feed.add_event(kill(i), now);
            assert!(
                feed.visible_count() <= max_visible,
                "visible {} > {} after add {}",
                feed.visible_count(),
                max_visible,
                i
            );
            if i % 3 == 0 {
                feed.advance(now);
            }
        }
    }
}

#[test]
fn test_forced_fade_skips_entries_already_fading() {
    let mut feed = make_feed(3);
    let t0 = Instant::now();

    for i in 0..3 {
        feed.add_event(kill(i), t0);
    }
    feed.advance(t0 + SHOW);
    assert_eq!(states(&feed)[0], EntryState::Fading);
    let first_fade = feed.entries().next().unwrap().fade_started_at();

    feed.add_event(kill(3), t0 + SHOW + ms(10));
    assert_eq!(
        states(&feed),
        vec![
            EntryState::Fading,
            EntryState::Visible,
            EntryState::Visible,
            EntryState::Visible,
        ]
    );

    feed.add_event(kill(4), t0 + SHOW + ms(20));
    assert_eq!(
        states(&feed),
        vec![
            EntryState::Fading,
            EntryState::Fading,
            EntryState::Visible,
            EntryState::Visible,
            EntryState::Visible,
        ]
    );
    // The first fade was not restarted
    assert_eq!(feed.entries().next().unwrap().fade_started_at(), first_fade);
    assert!(!feed.entries().next().unwrap().was_forced());
    assert!(feed.entries().nth(1).unwrap().was_forced());
}

#[test]
fn test_burst_without_ticks_stays_bounded() {
    let mut feed = make_feed(5);
    let t0 = Instant::now();

    for i in 0..100 {
        feed.add_event(kill(i), t0);
    }

    assert_eq!(feed.visible_count(), 5);
    assert!(feed.len() <= 10, "len {}", feed.len());
    // Newest entry always survives
    assert_eq!(feed.entries().last().unwrap().event().killer, "Killer99");
}

// ─────────────────────────────────────────────────────────────────────────────
// Timing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_entry_fades_then_is_removed() {
    let mut feed = make_feed(5);
    let born = Instant::now();
    let id = feed.add_event(kill(0), born);

    feed.advance(born + ms(7000));
    assert_eq!(feed.get(id).unwrap().state(), EntryState::Visible);

    let fade_at = born + ms(7501);
    feed.advance(fade_at);
    let entry = feed.get(id).unwrap();
    assert_eq!(entry.state(), EntryState::Fading);
    assert_eq!(entry.fade_started_at(), Some(fade_at));

    feed.advance(fade_at + ms(1000));
    assert!(feed.get(id).is_some());

    feed.advance(fade_at + ms(1801));
    assert!(feed.get(id).is_none());
    assert!(feed.is_empty());
}

#[test]
fn test_removal_happens_exactly_at_fade_end() {
    let mut feed = make_feed(5);
    let born = Instant::now();
    feed.add_event(kill(0), born);

    feed.advance(born + SHOW);
    assert_eq!(feed.fading_count(), 1);

    feed.advance(born + SHOW + FADE - ms(1));
    assert_eq!(feed.len(), 1);

    feed.advance(born + SHOW + FADE);
    assert!(feed.is_empty());
}

#[test]
fn test_at_most_one_new_fade_per_tick() {
    let mut feed = make_feed(5);
    let t0 = Instant::now();
    for i in 0..3 {
        feed.add_event(kill(i), t0);
    }

    let t1 = t0 + SHOW + ms(1);
    feed.advance(t1);
    assert_eq!(feed.fading_count(), 1);

    feed.advance(t1 + TICK);
    assert_eq!(feed.fading_count(), 2);

    feed.advance(t1 + TICK * 2);
    assert_eq!(feed.fading_count(), 3);

    // Fades were started oldest first
    let starts: Vec<Instant> = feed
        .entries()
        .map(|e| e.fade_started_at().unwrap())
        .collect();
    assert_eq!(starts, vec![t1, t1 + TICK, t1 + TICK * 2]);
}

#[test]
fn test_repeated_tick_at_same_instant_is_idempotent() {
    let mut feed = make_feed(5);
    let t0 = Instant::now();
    for i in 0..3 {
        feed.add_event(kill(i), t0);
    }

    let t1 = t0 + SHOW + ms(1);
    feed.advance(t1);
    let first = feed.snapshot();

    feed.advance(t1);
    assert_eq!(feed.snapshot(), first);
    assert_eq!(feed.fading_count(), 1);
}

#[test]
fn test_existing_fades_progress_while_new_ones_are_throttled() {
    let mut feed = make_feed(5);
    let t0 = Instant::now();
    feed.add_event(kill(0), t0);
    feed.add_event(kill(1), t0 + ms(100));

    // Both overdue; only the oldest starts
    let t1 = t0 + SHOW + ms(500);
    feed.advance(t1);
    let first_opacity = feed.snapshot().entries[0].opacity;
    assert_eq!(states(&feed), vec![EntryState::Fading, EntryState::Visible]);

    let t2 = t1 + ms(900);
    feed.advance(t2);
    let snap = feed.snapshot();
    assert_eq!(states(&feed), vec![EntryState::Fading, EntryState::Fading]);
    assert!(snap.entries[0].opacity < first_opacity);
    assert_eq!(snap.entries[1].opacity, 170);
}

#[test]
fn test_states_never_skip_fading() {
    let mut feed = make_feed(2);
    let t0 = Instant::now();
    let mut seen: std::collections::HashMap<u64, Vec<EntryState>> = Default::default();

    let mut now = t0;
    for step in 0..600u64 {
        if step % 40 == 0 {
            feed.add_event(kill(step as usize), now);
        }
        feed.advance(now);
        for entry in feed.entries() {
            let history = seen.entry(entry.id()).or_default();
            if history.last() != Some(&entry.state()) {
                history.push(entry.state());
            }
        }
        now += TICK * 3;
    }

    for (id, history) in seen {
        assert_eq!(history[0], EntryState::Visible, "entry {id}: {history:?}");
        for pair in history.windows(2) {
            assert_eq!(
                (pair[0], pair[1]),
                (EntryState::Visible, EntryState::Fading),
                "entry {id}: {history:?}"
            );
        }
    }
}

#[test]
fn test_clock_going_backwards_is_tolerated() {
    let mut feed = make_feed(5);
    let born = Instant::now() + Duration::from_secs(60);
    let id = feed.add_event(kill(0), born);

    let earlier = born - Duration::from_secs(30);
    feed.advance(earlier);
    let entry = feed.get(id).unwrap();
    assert_eq!(entry.state(), EntryState::Visible);
    assert_eq!(entry.age(earlier), Duration::ZERO);
    assert_eq!(feed.current_opacity(entry, earlier), 170);

    // Fade started, then a tick from before the fade began
    feed.advance(born + SHOW);
    feed.advance(born);
    let entry = feed.get(id).unwrap();
    assert_eq!(entry.state(), EntryState::Fading);
    assert_eq!(feed.current_opacity(entry, born), 170);
}

// ─────────────────────────────────────────────────────────────────────────────
// Opacity
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_opacity_falls_monotonically_to_zero() {
    let mut feed = make_feed(5);
    let born = Instant::now();
    let id = feed.add_event(kill(0), born);
    let fade_start = born + SHOW;
    feed.advance(fade_start);

    let entry = feed.get(id).unwrap().clone();
    let mut previous = feed.current_opacity(&entry, fade_start);
    assert_eq!(previous, 170);

    let mut t = fade_start;
    while t < fade_start + FADE {
        t += TICK;
        let opacity = feed.current_opacity(&entry, t);
        assert!(opacity <= previous, "{opacity} > {previous}");
        previous = opacity;
    }
    assert_eq!(feed.current_opacity(&entry, fade_start + FADE), 0);
}

#[test]
fn test_snapshot_carries_tick_opacity() {
    let mut feed = make_feed(5);
    let born = Instant::now();
    feed.add_event(kill(0), born);
    feed.add_event(kill(1), born);

    feed.advance(born + SHOW);
    feed.advance(born + SHOW + FADE / 2);

    let snap = feed.snapshot();
    assert_eq!(snap.entries.len(), 2);
    assert_eq!(snap.entries[0].opacity, 85);
    assert_eq!(snap.entries[1].entry.state(), EntryState::Fading);
    assert!(snap.shown);
    assert_eq!(snap.base_alpha, 170);
}

#[test]
fn test_alpha_adjustments_apply_on_next_tick() {
    let mut feed = make_feed(5);
    let t0 = Instant::now();
    feed.add_event(kill(0), t0);

    assert_eq!(feed.increase_alpha(), 190);
    assert_eq!(feed.snapshot().entries[0].opacity, 170);

    feed.advance(t0 + TICK);
    assert_eq!(feed.snapshot().entries[0].opacity, 190);

    for _ in 0..20 {
        feed.decrease_alpha();
    }
    assert_eq!(feed.base_alpha(), 40);
}

#[test]
fn test_low_base_alpha_is_floored_while_visible() {
    let mut feed = KillFeed::new(FeedTiming::default(), BaseAlpha::new(10, 40, 20));
    let t0 = Instant::now();
    let id = feed.add_event(kill(0), t0);
    assert_eq!(feed.current_opacity(feed.get(id).unwrap(), t0), 40);
}

#[test]
fn test_toggle_visibility_keeps_ageing() {
    let mut feed = make_feed(5);
    let t0 = Instant::now();
    feed.add_event(kill(0), t0);

    assert!(!feed.toggle_visibility());
    assert!(!feed.snapshot().shown);

    feed.advance(t0 + SHOW);
    feed.advance(t0 + SHOW + FADE);
    assert!(feed.is_empty());

    assert!(feed.toggle_visibility());
}
