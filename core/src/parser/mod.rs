//! Event Parser: raw log line → [`KillEvent`].
//!
//! Expected shape (other fields vary and are ignored):
//!
//! ```text
//! <2024-01-01T10:00:00.000Z> [Notice] <Actor Death> CActor::Kill: 'Alice' [201] in zone '...' killed by 'Bob' [202] using '...'
//! ```
//!
//! Most lines in the game log are unrelated noise, so rejection is a plain
//! `None` rather than an error.

mod event;

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use killfeed_types::FeedConfig;
use regex::Regex;

pub use event::KillEvent;

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d{1,9})?)Z?>")
        .expect("timestamp pattern is valid")
});

/// `'<victim>' ... killed by '<killer>'`
static KILL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'([^']*)'.*?(?i:killed by) '([^']*)'").expect("kill pattern is valid")
});

/// Environment actors carry a 13 digit entity id at the end of their name
static NUMERIC_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{13}$").expect("suffix pattern is valid"));

static STRIP_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_\d{13}$").expect("strip pattern is valid"));

const UNKNOWN_ACTOR: &str = "unknown";
const NPC_MARKER: &str = "npc";

/// Filtering switches taken from the feed config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub include_non_qualifying_actors: bool,
    pub strip_actor_numeric_suffix: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            include_non_qualifying_actors: false,
            strip_actor_numeric_suffix: true,
        }
    }
}

impl From<&FeedConfig> for ParseOptions {
    fn from(config: &FeedConfig) -> Self {
        Self {
            include_non_qualifying_actors: config.include_non_qualifying_actors,
            strip_actor_numeric_suffix: config.strip_actor_numeric_suffix,
        }
    }
}

/// Parse a line, formatting the display time in the local zone.
pub fn parse_line(line: &str, options: &ParseOptions) -> Option<KillEvent> {
    parse_line_in(line, options, &Local)
}

/// Parse a line, formatting the display time in `zone`.
pub fn parse_line_in<Tz>(line: &str, options: &ParseOptions, zone: &Tz) -> Option<KillEvent>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let occurred_at = parse_timestamp(line)?;

    let caps = KILL_RE.captures(line)?;
    let victim = caps.get(1)?.as_str();
    let killer = caps.get(2)?.as_str();

    // Only the causing side is checked: an unknown victim still carries a killer
    if killer.eq_ignore_ascii_case(UNKNOWN_ACTOR) {
        return None;
    }

    if is_empty_actor(killer) || is_empty_actor(victim) {
        return None;
    }

    if !options.include_non_qualifying_actors
        && (is_non_qualifying(killer) || is_non_qualifying(victim))
    {
        return None;
    }

    let display_name = |name: &str| {
        if options.strip_actor_numeric_suffix {
            STRIP_SUFFIX_RE.replace(name, "").into_owned()
        } else {
            name.to_string()
        }
    };
    let killer = display_name(killer);
    let victim = display_name(victim);

    // Compared after stripping: the flag describes the names the event carries
    Some(KillEvent {
        display_time: occurred_at.with_timezone(zone).format("%H:%M").to_string(),
        occurred_at,
        is_self_event: killer == victim,
        killer,
        victim,
    })
}

/// Extract the `<...>` timestamp token as UTC.
pub fn parse_timestamp(line: &str) -> Option<DateTime<Utc>> {
    let token = TIMESTAMP_RE.captures(line)?.get(1)?.as_str();
    NaiveDateTime::parse_from_str(token, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Actors generated by the environment rather than a human player.
pub fn is_non_qualifying(name: &str) -> bool {
    name.to_ascii_lowercase().contains(NPC_MARKER) || NUMERIC_SUFFIX_RE.is_match(name)
}

fn is_empty_actor(name: &str) -> bool {
    name.trim().is_empty()
}
