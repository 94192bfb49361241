//! Feed service
//!
//! Runs the [`KillFeed`] on a single task that owns it outright. Everything
//! else talks to that task with messages:
//!
//! - the tail task parses log lines and sends `AddEvent`
//! - the fixed-interval tick inside the actor calls `advance` and publishes
//!   a [`FeedSnapshot`] on a `watch` channel for renderers
//! - boundary signals (toggle, alpha ±) arrive through [`FeedHandle`]
//!
//! Source-fatal failures are published once on the status channel and the
//! feed stays empty; nothing else is surfaced.

mod actor;
mod tail;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use killfeed_types::FeedConfig;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::clock::Clock;
use crate::feed::{FeedSnapshot, KillFeed};
use crate::log_source::SourceOptions;
use crate::parser::{KillEvent, ParseOptions};

const COMMAND_BUFFER: usize = 256;

/// Messages handled by the feed actor
#[derive(Debug)]
pub enum FeedCommand {
    AddEvent(KillEvent),
    ToggleVisibility,
    IncreaseAlpha,
    DecreaseAlpha,
    Snapshot(oneshot::Sender<FeedSnapshot>),
}

/// Out-of-band state of the log source, for status indicators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    /// No source attached yet
    Idle,
    Tailing { path: PathBuf },
    /// Source-fatal: reported once, tailing has stopped
    Failed { reason: String },
    Stopped,
}

#[derive(Debug, Error)]
#[error("feed service has stopped")]
pub struct FeedClosed;

/// Owner-side handle to a running feed.
///
/// Dropping the handle stops both tasks as well; [`FeedHandle::shutdown`]
/// additionally waits for them.
pub struct FeedHandle {
    commands: mpsc::Sender<FeedCommand>,
    snapshots: watch::Receiver<FeedSnapshot>,
    status_tx: Arc<watch::Sender<SourceStatus>>,
    status: watch::Receiver<SourceStatus>,
    shutdown: watch::Sender<bool>,
    actor: Option<JoinHandle<()>>,
    tail: Option<JoinHandle<()>>,
    parse_options: ParseOptions,
    source_options: SourceOptions,
}

/// Start the feed actor. Must be called inside a tokio runtime.
pub fn spawn_feed(config: &FeedConfig, clock: Arc<dyn Clock>) -> FeedHandle {
    let feed = KillFeed::from_config(config);
    let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
    let (snapshot_tx, snapshots) = watch::channel(feed.snapshot());
    let (status_tx, status) = watch::channel(SourceStatus::Idle);
    let (shutdown, shutdown_rx) = watch::channel(false);

    let actor = tokio::spawn(actor::run(
        feed,
        clock,
        rx,
        snapshot_tx,
        shutdown_rx,
        Duration::from_millis(config.tick_interval_ms.max(1)),
    ));

    FeedHandle {
        commands,
        snapshots,
        status_tx: Arc::new(status_tx),
        status,
        shutdown,
        actor: Some(actor),
        tail: None,
        parse_options: ParseOptions::from(config),
        source_options: SourceOptions {
            replay_from_start: config.replay_from_file_start,
            backoff: Duration::from_millis(config.poll_interval_ms.max(1)),
        },
    }
}

impl FeedHandle {
    /// Start tailing `path`. A previously attached source is torn down.
    pub fn attach_source(&mut self, path: PathBuf) {
        if let Some(previous) = self.tail.take() {
            previous.abort();
        }
        self.status_tx.send_replace(SourceStatus::Idle);
        self.tail = Some(tokio::spawn(tail::run(
            path,
            self.source_options,
            self.parse_options,
            self.commands.clone(),
            Arc::clone(&self.status_tx),
            self.shutdown.subscribe(),
        )));
    }

    pub async fn add_event(&self, event: KillEvent) -> Result<(), FeedClosed> {
        self.send(FeedCommand::AddEvent(event)).await
    }

    pub async fn toggle_visibility(&self) -> Result<(), FeedClosed> {
        self.send(FeedCommand::ToggleVisibility).await
    }

    pub async fn increase_alpha(&self) -> Result<(), FeedClosed> {
        self.send(FeedCommand::IncreaseAlpha).await
    }

    pub async fn decrease_alpha(&self) -> Result<(), FeedClosed> {
        self.send(FeedCommand::DecreaseAlpha).await
    }

    /// Ask the actor for its current state, including events added since
    /// the last tick.
    pub async fn snapshot(&self) -> Result<FeedSnapshot, FeedClosed> {
        let (tx, rx) = oneshot::channel();
        self.send(FeedCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| FeedClosed)
    }

    /// Snapshot published by the most recent tick
    pub fn latest(&self) -> FeedSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver woken whenever a tick changes the feed
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshots.clone()
    }

    pub fn status(&self) -> watch::Receiver<SourceStatus> {
        self.status.clone()
    }

    /// Stop tailing and ticking, release the log file, and wait for both
    /// tasks. The tail task notices within one backoff interval.
    pub async fn shutdown(mut self) {
        self.shutdown.send_replace(true);

        if let Some(tail) = self.tail.take() {
            if let Err(e) = tail.await {
                tracing::warn!(error = %e, "Tail task ended abnormally");
            }
        }
        if let Some(actor) = self.actor.take() {
            if let Err(e) = actor.await {
                tracing::warn!(error = %e, "Feed actor ended abnormally");
            }
        }
        tracing::info!("Feed shut down");
    }

    async fn send(&self, command: FeedCommand) -> Result<(), FeedClosed> {
        self.commands.send(command).await.map_err(|_| FeedClosed)
    }
}
