use std::time::{Duration, Instant};

use killfeed_types::{ALPHA_ADJUST_MAX, ALPHA_ADJUST_MIN, FeedConfig};

use super::entry::{EntryState, FeedEntry};

/// Bubble alpha while shown, adjustable at runtime in fixed steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseAlpha {
    value: u8,
    floor: u8,
    step: u8,
}

impl BaseAlpha {
    pub fn new(value: u8, floor: u8, step: u8) -> Self {
        Self { value, floor, step }
    }

    /// Configured base alpha, before the floor
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Alpha of a Visible entry: never below the floor
    pub fn shown(&self) -> u8 {
        self.value.max(self.floor)
    }

    pub fn increase(&mut self) -> u8 {
        self.adjust(i16::from(self.step))
    }

    pub fn decrease(&mut self) -> u8 {
        self.adjust(-i16::from(self.step))
    }

    fn adjust(&mut self, delta: i16) -> u8 {
        let next = (i16::from(self.value) + delta)
            .clamp(i16::from(ALPHA_ADJUST_MIN), i16::from(ALPHA_ADJUST_MAX));
        self.value = next as u8;
        self.value
    }
}

impl Default for BaseAlpha {
    fn default() -> Self {
        Self::from(&FeedConfig::default())
    }
}

impl From<&FeedConfig> for BaseAlpha {
    fn from(config: &FeedConfig) -> Self {
        Self::new(config.base_alpha, config.min_visible_alpha, config.alpha_step)
    }
}

/// Bubble alpha of `entry` at `now`.
///
/// Visible entries hold [`BaseAlpha::shown`]. Fading entries fall linearly
/// from there to exactly 0 at `fade_started_at + fade_duration`.
pub fn current_opacity(
    entry: &FeedEntry,
    now: Instant,
    fade_duration: Duration,
    alpha: &BaseAlpha,
) -> u8 {
    let start = alpha.shown();
    match entry.state() {
        EntryState::Visible => start,
        EntryState::Expired => 0,
        EntryState::Fading => {
            let elapsed = entry.fade_elapsed(now).unwrap_or_default();
            if elapsed >= fade_duration {
                return 0;
            }
            let t = elapsed.as_secs_f64() / fade_duration.as_secs_f64();
            (f64::from(start) * (1.0 - t)).clamp(0.0, f64::from(start)) as u8
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::KillEvent;
    use chrono::Utc;

    fn entry(born_at: Instant) -> FeedEntry {
        let event = KillEvent {
            occurred_at: Utc::now(),
            display_time: "10:00".to_string(),
            killer: "Bob".to_string(),
            victim: "Alice".to_string(),
            is_self_event: false,
        };
        FeedEntry::new(1, event, born_at)
    }

    #[test]
    fn test_adjust_clamps_to_range() {
        let mut alpha = BaseAlpha::new(170, 40, 20);
        assert_eq!(alpha.increase(), 190);
        for _ in 0..10 {
            alpha.increase();
        }
        assert_eq!(alpha.value(), 240);

        for _ in 0..20 {
            alpha.decrease();
        }
        assert_eq!(alpha.value(), 40);
    }

    #[test]
    fn test_adjust_from_out_of_range_config() {
        let mut alpha = BaseAlpha::new(255, 40, 20);
        assert_eq!(alpha.decrease(), 235);

        let mut alpha = BaseAlpha::new(0, 40, 20);
        assert_eq!(alpha.increase(), 40);
    }

    #[test]
    fn test_shown_respects_floor() {
        assert_eq!(BaseAlpha::new(170, 40, 20).shown(), 170);
        assert_eq!(BaseAlpha::new(10, 40, 20).shown(), 40);
    }

    #[test]
    fn test_visible_and_expired_opacity() {
        let now = Instant::now();
        let alpha = BaseAlpha::new(170, 40, 20);
        let fade = Duration::from_millis(1800);

        assert_eq!(current_opacity(&entry(now), now, fade, &alpha), 170);

        let expired = entry(now).with_state(EntryState::Expired, Some(now));
        assert_eq!(current_opacity(&expired, now, fade, &alpha), 0);
    }

    #[test]
    fn test_fading_opacity_is_linear() {
        let now = Instant::now();
        let alpha = BaseAlpha::new(200, 40, 20);
        let fade = Duration::from_millis(1000);
        let fading = entry(now).with_state(EntryState::Fading, Some(now));

        assert_eq!(current_opacity(&fading, now, fade, &alpha), 200);
        assert_eq!(
            current_opacity(&fading, now + Duration::from_millis(500), fade, &alpha),
            100
        );
        assert_eq!(
            current_opacity(&fading, now + Duration::from_millis(1000), fade, &alpha),
            0
        );
        assert_eq!(
            current_opacity(&fading, now + Duration::from_secs(60), fade, &alpha),
            0
        );
    }

    #[test]
    fn test_fading_before_start_clamps_to_shown() {
        let now = Instant::now() + Duration::from_secs(10);
        let alpha = BaseAlpha::new(170, 40, 20);
        let fading = entry(now).with_state(EntryState::Fading, Some(now));
        let earlier = now - Duration::from_secs(5);
        assert_eq!(
            current_opacity(&fading, earlier, Duration::from_millis(1800), &alpha),
            170
        );
    }

    #[test]
    fn test_zero_fade_duration() {
        let now = Instant::now();
        let alpha = BaseAlpha::default();
        let fading = entry(now).with_state(EntryState::Fading, Some(now));
        assert_eq!(current_opacity(&fading, now, Duration::ZERO, &alpha), 0);
    }
}
