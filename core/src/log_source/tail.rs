use std::fs::Metadata;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::time::sleep;

use super::{RawLine, SourceError, SourceOptions, is_transient};

/// Restartable reader over a growing log file.
///
/// The file is opened read-only with the platform's default sharing, which
/// on Windows allows the game to keep writing while we read.
pub struct LineSource {
    path: PathBuf,
    reader: BufReader<File>,
    options: SourceOptions,
    /// Offset of the first byte in `pending`
    line_start: u64,
    /// Bytes of a line whose newline has not been written yet
    pending: Vec<u8>,
}

impl LineSource {
    /// Open `path` and position at its end (or its start when replaying).
    pub async fn open(path: impl AsRef<Path>, options: SourceOptions) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .await
            .map_err(|e| SourceError::from_open(path.clone(), e))?;
        let mut reader = BufReader::new(file);

        let line_start = if options.replay_from_start {
            0
        } else {
            reader
                .seek(SeekFrom::End(0))
                .await
                .map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })?
        };

        tracing::info!(
            path = %path.display(),
            offset = line_start,
            replay = options.replay_from_start,
            "Log source opened"
        );

        Ok(Self {
            path,
            reader,
            options,
            line_start,
            pending: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Offset of the next byte that will be read from the file.
    pub fn position(&self) -> u64 {
        self.line_start + self.pending.len() as u64
    }

    /// Wait for the next complete line.
    ///
    /// Backs off for `options.backoff` whenever no complete line is
    /// available. Only non-transient read failures end the wait with an error.
    pub async fn next_line(&mut self) -> Result<RawLine, SourceError> {
        loop {
            if let Some(line) = self.try_next_line().await? {
                return Ok(line);
            }
            sleep(self.options.backoff).await;
        }
    }

    /// One read attempt. `Ok(None)` means no complete line is available yet.
    pub async fn try_next_line(&mut self) -> Result<Option<RawLine>, SourceError> {
        loop {
            return match self.reader.read_until(b'\n', &mut self.pending).await {
                Ok(0) => {
                    // A fresh file may already hold lines
                    if self.reopen_if_replaced().await? {
                        continue;
                    }
                    self.rewind_if_truncated().await?;
                    Ok(None)
                }
                // Partial line at EOF: keep the bytes, finish it on a later poll
                Ok(_) if self.pending.last() != Some(&b'\n') => Ok(None),
                Ok(_) => Ok(Some(self.take_line())),
                Err(e) if is_transient(&e) => {
                    tracing::debug!(error = %e, "Transient read failure, retrying");
                    Ok(None)
                }
                Err(source) => Err(SourceError::Io {
                    path: self.path.clone(),
                    source,
                }),
            };
        }
    }

    fn take_line(&mut self) -> RawLine {
        let offset = self.line_start;
        self.line_start += self.pending.len() as u64;
        let text = decode_line(&self.pending);
        self.pending.clear();
        RawLine { text, offset }
    }

    /// On launch the game moves the old log aside and creates a new one at
    /// the same path. When the path no longer names the file we hold, start
    /// reading the new one from its first byte. Returns whether it reopened.
    async fn reopen_if_replaced(&mut self) -> Result<bool, SourceError> {
        // Between the move and the create there may be nothing at the path
        let Ok(at_path) = tokio::fs::metadata(&self.path).await else {
            return Ok(false);
        };
        let held = match self.reader.get_ref().metadata().await {
            Ok(meta) => meta,
            Err(e) => {
                tracing::debug!(error = %e, "Could not stat open log file");
                return Ok(false);
            }
        };
        if same_file(&held, &at_path) {
            return Ok(false);
        }

        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if is_transient(&e) || e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(false);
            }
            Err(e) => return Err(SourceError::from_open(self.path.clone(), e)),
        };

        tracing::info!(
            path = %self.path.display(),
            old_offset = self.position(),
            "Log file replaced, reading new file from start"
        );
        self.reader = BufReader::new(file);
        self.pending.clear();
        self.line_start = 0;
        Ok(true)
    }

    /// The game may also truncate its log in place. A file shorter than our
    /// position means we are looking at a new log, so start it over.
    async fn rewind_if_truncated(&mut self) -> Result<(), SourceError> {
        let len = match self.reader.get_ref().metadata().await {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::debug!(error = %e, "Could not stat log file");
                return Ok(());
            }
        };

        if len >= self.position() {
            return Ok(());
        }

        tracing::info!(
            path = %self.path.display(),
            old_offset = self.position(),
            new_len = len,
            "Log file truncated, reading from start"
        );

        self.reader
            .seek(SeekFrom::Start(0))
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        self.pending.clear();
        self.line_start = 0;
        Ok(())
    }
}

#[cfg(unix)]
fn same_file(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

/// No stable file id outside Unix: a different creation time means a new file.
#[cfg(not(unix))]
fn same_file(a: &Metadata, b: &Metadata) -> bool {
    match (a.created(), b.created()) {
        (Ok(a), Ok(b)) => a == b,
        _ => true,
    }
}

fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}
