//! Shared configuration types for the kill feed.
//!
//! Everything here is plain serde data so the core, the overlay and the CLI
//! agree on one definition of the on-disk configuration.

pub mod config;
pub mod formatting;

pub use config::{
    FeedConfig, FeedLabels, FeedLayout, ALPHA_ADJUST_MAX, ALPHA_ADJUST_MIN, DEFAULT_LOG_FILE_NAME,
};
