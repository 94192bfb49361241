//! Line Source: tails an append-only log written by another process.
//!
//! [`LineSource`] yields complete lines lazily; the caller drives iteration
//! with [`LineSource::next_line`]. The sequence never ends on its own.
//!
//! Failure split:
//! - opening errors (missing file, no permission) are fatal and returned once
//! - sharing violations and "no data yet" are absorbed with a fixed backoff

mod tail;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub use tail::LineSource;

/// A complete line plus the byte offset its first byte was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub text: String,
    pub offset: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOptions {
    /// Surface lines already in the file instead of starting at its end
    pub replay_from_start: bool,
    /// Delay before re-checking when no complete line is available
    pub backoff: Duration,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            replay_from_start: false,
            backoff: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("log file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied opening {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    fn from_open(path: PathBuf, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source: err },
        }
    }
}

#[cfg(windows)]
const ERROR_SHARING_VIOLATION: i32 = 32;
#[cfg(windows)]
const ERROR_LOCK_VIOLATION: i32 = 33;

/// Read errors that go away on their own while the writer holds the file.
pub(crate) fn is_transient(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    ) {
        return true;
    }
    #[cfg(windows)]
    if matches!(
        err.raw_os_error(),
        Some(ERROR_SHARING_VIOLATION) | Some(ERROR_LOCK_VIOLATION)
    ) {
        return true;
    }
    false
}
