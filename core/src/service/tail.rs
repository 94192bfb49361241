use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::{FeedCommand, SourceStatus};
use crate::log_source::{LineSource, SourceOptions};
use crate::parser::{ParseOptions, parse_line};

/// Background task: log lines → parser → feed actor.
///
/// Runs until shutdown, until the actor goes away, or until the source
/// fails fatally. Never restarts itself.
pub(super) async fn run(
    path: PathBuf,
    source_options: SourceOptions,
    parse_options: ParseOptions,
    commands: mpsc::Sender<FeedCommand>,
    status: Arc<watch::Sender<SourceStatus>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut source = match LineSource::open(&path, source_options).await {
        Ok(source) => source,
        Err(e) => {
            tracing::error!(error = %e, "Log source unavailable, feed will stay empty");
            status.send_replace(SourceStatus::Failed {
                reason: e.to_string(),
            });
            return;
        }
    };
    status.send_replace(SourceStatus::Tailing { path });

    loop {
        let line = tokio::select! {
            _ = shutdown.changed() => break,
            line = source.next_line() => line,
        };

        let raw = match line {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, offset = source.position(), "Log source failed");
                status.send_replace(SourceStatus::Failed {
                    reason: e.to_string(),
                });
                return;
            }
        };

        let Some(event) = parse_line(&raw.text, &parse_options) else {
            continue;
        };

        if commands.send(FeedCommand::AddEvent(event)).await.is_err() {
            break;
        }
    }

    status.send_replace(SourceStatus::Stopped);
    tracing::info!(path = %source.path().display(), "Stopped tailing log");
}
