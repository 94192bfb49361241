use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One kill extracted from the log. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillEvent {
    pub occurred_at: DateTime<Utc>,
    /// `HH:MM` in the display zone
    pub display_time: String,
    /// Causing actor
    pub killer: String,
    /// Affected actor
    pub victim: String,
    /// Killer and victim are the same actor
    pub is_self_event: bool,
}
