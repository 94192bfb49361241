//! Kill feed configuration.
//!
//! Stored as TOML with snake_case keys. Every field has a default, so a
//! config file only needs to name the options it changes:
//!
//! ```toml
//! log_file_path = "C:/Games/StarCitizen/LIVE"
//! max_visible_entries = 4
//! base_alpha = 200
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the game log inside the game directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "Game.log";

/// Lowest base alpha reachable through the runtime adjust signals.
pub const ALPHA_ADJUST_MIN: u8 = 40;
/// Highest base alpha reachable through the runtime adjust signals.
pub const ALPHA_ADJUST_MAX: u8 = 240;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Log file to tail, or the directory holding `Game.log`
    pub log_file_path: PathBuf,
    pub max_visible_entries: usize,
    pub show_duration_ms: u64,
    pub fade_duration_ms: u64,
    pub tick_interval_ms: u64,
    /// Surface environment-generated actors (NPCs) too
    pub include_non_qualifying_actors: bool,
    pub strip_actor_numeric_suffix: bool,
    /// Bubble background alpha while an entry is fully shown
    pub base_alpha: u8,
    /// Floor applied to the bubble alpha while an entry is still Visible
    pub min_visible_alpha: u8,
    /// Step applied by one alpha adjust signal
    pub alpha_step: u8,
    pub replay_from_file_start: bool,
    /// Backoff between reads when the log has no new data
    pub poll_interval_ms: u64,
    /// Audible cue for each new kill while the feed is shown
    pub sound_on_kill: bool,
    pub labels: FeedLabels,
    pub layout: FeedLayout,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            log_file_path: PathBuf::new(),
            max_visible_entries: 5,
            show_duration_ms: 7500,
            fade_duration_ms: 1800,
            tick_interval_ms: 33,
            include_non_qualifying_actors: false,
            strip_actor_numeric_suffix: true,
            base_alpha: 170,
            min_visible_alpha: ALPHA_ADJUST_MIN,
            alpha_step: 20,
            replay_from_file_start: false,
            poll_interval_ms: 100,
            sound_on_kill: true,
            labels: FeedLabels::default(),
            layout: FeedLayout::default(),
        }
    }
}

/// Verb text shown between the actor names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedLabels {
    pub kill_verb: String,
    pub self_verb: String,
}

impl Default for FeedLabels {
    fn default() -> Self {
        Self {
            kill_verb: "killed".to_string(),
            self_verb: "died (suicide)".to_string(),
        }
    }
}

/// Fixed feed geometry in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedLayout {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_bottom: f32,
    /// Vertical gap between two rows
    pub interline: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    /// Horizontal gap between two text segments
    pub segment_gap: f32,
    pub corner_radius: f32,
}

impl Default for FeedLayout {
    fn default() -> Self {
        Self {
            width: 420.0,
            height: 160.0,
            margin_left: 8.0,
            margin_bottom: 8.0,
            interline: 2.0,
            pad_x: 10.0,
            pad_y: 5.0,
            segment_gap: 8.0,
            corner_radius: 6.0,
        }
    }
}

impl FeedLayout {
    /// Widest a bubble may grow before it is capped
    pub fn max_bubble_width(&self) -> f32 {
        (self.width - self.margin_left * 2.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_feed_constants() {
        let config = FeedConfig::default();
        assert_eq!(config.max_visible_entries, 5);
        assert_eq!(config.show_duration_ms, 7500);
        assert_eq!(config.fade_duration_ms, 1800);
        assert_eq!(config.tick_interval_ms, 33);
        assert_eq!(config.base_alpha, 170);
        assert!(!config.include_non_qualifying_actors);
        assert!(config.strip_actor_numeric_suffix);
        assert!(!config.replay_from_file_start);
        assert!(config.sound_on_kill);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml = r#"
log_file_path = "/games/sc/Game.log"
max_visible_entries = 3
base_alpha = 200

[labels]
kill_verb = "вбив"
"#;

        let config: FeedConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.log_file_path, PathBuf::from("/games/sc/Game.log"));
        assert_eq!(config.max_visible_entries, 3);
        assert_eq!(config.base_alpha, 200);
        assert_eq!(config.show_duration_ms, 7500);
        assert_eq!(config.labels.kill_verb, "вбив");
        assert_eq!(config.labels.self_verb, "died (suicide)");
        assert_eq!(config.layout, FeedLayout::default());
    }

    #[test]
    fn test_max_bubble_width() {
        let layout = FeedLayout::default();
        assert_eq!(layout.max_bubble_width(), 404.0);

        let narrow = FeedLayout {
            width: 10.0,
            margin_left: 8.0,
            ..FeedLayout::default()
        };
        assert_eq!(narrow.max_bubble_width(), 0.0);
    }
}
