use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use super::FeedCommand;
use crate::clock::Clock;
use crate::feed::{FeedSnapshot, KillFeed};

/// Actor loop: the only code that touches the feed.
pub(super) async fn run(
    mut feed: KillFeed,
    clock: Arc<dyn Clock>,
    mut commands: mpsc::Receiver<FeedCommand>,
    snapshots: watch::Sender<FeedSnapshot>,
    mut shutdown: watch::Receiver<bool>,
    tick: Duration,
) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // Signalled or handle dropped
            _ = shutdown.changed() => break,
            command = commands.recv() => match command {
                Some(command) => handle(&mut feed, command, clock.as_ref()),
                None => break,
            },
            _ = interval.tick() => {
                feed.advance(clock.now());
                let next = feed.snapshot();
                snapshots.send_if_modified(|current| {
                    if *current == next {
                        return false;
                    }
                    *current = next;
                    true
                });
            }
        }
    }

    tracing::debug!(entries = feed.len(), "Feed actor stopped");
}

fn handle(feed: &mut KillFeed, command: FeedCommand, clock: &dyn Clock) {
    match command {
        FeedCommand::AddEvent(event) => {
            tracing::debug!(killer = %event.killer, victim = %event.victim, "Kill added to feed");
            feed.add_event(event, clock.now());
        }
        FeedCommand::ToggleVisibility => {
            let shown = feed.toggle_visibility();
            tracing::info!(shown, "Feed visibility toggled");
        }
        FeedCommand::IncreaseAlpha => {
            let alpha = feed.increase_alpha();
            tracing::debug!(alpha, "Base alpha increased");
        }
        FeedCommand::DecreaseAlpha => {
            let alpha = feed.decrease_alpha();
            tracing::debug!(alpha, "Base alpha decreased");
        }
        FeedCommand::Snapshot(reply) => {
            // Requester may have given up waiting
            let _ = reply.send(feed.snapshot());
        }
    }
}
