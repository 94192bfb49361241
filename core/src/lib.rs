//! Kill feed engine: tails the game log, parses kill lines, and keeps the
//! bounded, fading list of recent kills that an overlay draws.

pub mod clock;
pub mod config;
pub mod feed;
pub mod log_source;
pub mod parser;
pub mod service;

// Re-exports for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, load_config, resolve_log_path, validate};
pub use feed::{EntryState, FeedEntry, FeedSnapshot, FeedTiming, KillFeed, SnapshotEntry};
pub use log_source::{LineSource, RawLine, SourceError, SourceOptions};
pub use parser::{KillEvent, ParseOptions, parse_line, parse_line_in};
pub use service::{FeedClosed, FeedCommand, FeedHandle, SourceStatus, spawn_feed};
