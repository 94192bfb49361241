//! Feed Lifecycle Manager
//!
//! Owns the bounded, insertion-ordered queue of on-screen entries and the
//! state machine each entry walks through:
//!
//! ```text
//!            age >= show_duration (at most one new fade per tick)
//!  Visible ─────────────────────────────────────────────▶ Fading
//!     │                                                     │
//!     └──── forced: capacity exceeded on add ───────────────┤
//!                                                           │ fade elapsed >= fade_duration
//!                                                           ▼
//!                                                        Expired (removed)
//! ```
//!
//! All operations take `now` explicitly and never fail. A clock that runs
//! backwards is clamped to zero elapsed time.

mod entry;
mod manager;
mod opacity;

#[cfg(test)]
mod manager_tests;

pub use entry::{EntryState, FeedEntry, FeedTiming};
pub use manager::{FeedSnapshot, KillFeed, SnapshotEntry};
pub use opacity::{BaseAlpha, current_opacity};
