// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity timeline aggregation.
//!
//! Watches the live query "events where participant_ids contains uid" and
//! turns every upstream snapshot into a settled timeline: each event's
//! participant ids are resolved to profile snapshots concurrently, and the
//! timeline is emitted only once every event in the snapshot is fully
//! resolved.
//!
//! Settlement is a two-level join: `join_all` over one event's participant
//! fetches, then `join_all` across all events of the round. Both joins
//! complete on fetch completion, never dispatch, so a round cannot settle
//! while data is still in flight. Rounds are tagged; a snapshot arriving
//! mid-round drops the in-flight round's future, and the tag check
//! discards a stale settlement racing the supersede.

use crate::db::{EventsSnapshot, StoreClient};
use crate::error::{AppError, ErrorSink};
use crate::models::{Participant, StoredEvent, TimelineEvent};
use futures_util::future;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One notification to a timeline subscriber.
#[derive(Debug)]
pub enum TimelineUpdate {
    /// A fully-resolved, sorted timeline; replaces any previous snapshot.
    Settled(Vec<TimelineEvent>),
    /// Terminal: the upstream query failed. Sent at most once; the
    /// subscription behaves as cancelled afterwards.
    Failed(AppError),
}

/// Aggregates per-user activity timelines from the event store.
pub struct TimelineService<S> {
    store: S,
    sink: Arc<dyn ErrorSink>,
}

impl<S: StoreClient> TimelineService<S> {
    pub fn new(store: S, sink: Arc<dyn ErrorSink>) -> Self {
        Self { store, sink }
    }

    /// Start a long-lived watch for `uid`.
    ///
    /// The returned subscription delivers settled timelines until it is
    /// cancelled or the upstream query fails.
    pub fn watch(&self, uid: &str) -> TimelineSubscription {
        let (events_rx, guard) = self.store.watch_events(uid).into_parts();
        let (tx, rx) = mpsc::unbounded_channel();

        let driver = tokio::spawn(run_watch(
            self.store.clone(),
            Arc::clone(&self.sink),
            uid.to_string(),
            events_rx,
            tx,
        ));

        TimelineSubscription {
            rx,
            guard: Some(guard),
            driver,
            cancelled: false,
        }
    }
}

/// Handle to a running timeline watch.
pub struct TimelineSubscription {
    rx: mpsc::UnboundedReceiver<TimelineUpdate>,
    guard: Option<crate::db::SubscriptionGuard>,
    driver: JoinHandle<()>,
    cancelled: bool,
}

impl TimelineSubscription {
    /// Next update, or `None` after cancellation / termination.
    pub async fn recv(&mut self) -> Option<TimelineUpdate> {
        if self.cancelled {
            return None;
        }
        self.rx.recv().await
    }

    /// Stop the watch. Safe to call in any state.
    ///
    /// Unsubscribes the upstream live query synchronously and drops any
    /// in-flight resolution round; once this returns, `recv` yields
    /// nothing, even for rounds whose fetches later complete.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.guard.take();
        self.driver.abort();
        self.rx.close();
    }
}

impl Drop for TimelineSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

type RoundFuture = Pin<Box<dyn Future<Output = (u64, Vec<TimelineEvent>)> + Send>>;

/// Watch driver: one resolution round per upstream snapshot, newest
/// snapshot wins.
async fn run_watch<S: StoreClient>(
    store: S,
    sink: Arc<dyn ErrorSink>,
    uid: String,
    mut events_rx: mpsc::UnboundedReceiver<EventsSnapshot>,
    tx: mpsc::UnboundedSender<TimelineUpdate>,
) {
    let mut round_seq: u64 = 0;
    let mut in_flight: Option<RoundFuture> = None;

    loop {
        tokio::select! {
            notification = events_rx.recv() => {
                match notification {
                    Some(Ok(snapshot)) => {
                        round_seq += 1;
                        tracing::debug!(
                            uid = %uid,
                            round = round_seq,
                            events = snapshot.len(),
                            "Starting resolution round"
                        );
                        // Replacing the future drops the superseded round
                        // with all of its pending fetches.
                        in_flight = Some(Box::pin(resolve_round(store.clone(), snapshot, round_seq)));
                    }
                    Some(Err(e)) => {
                        let failure = AppError::Aggregation(e.to_string());
                        sink.report(&failure);
                        let _ = tx.send(TimelineUpdate::Failed(failure));
                        break;
                    }
                    None => break,
                }
            }
            (seq, timeline) = async { in_flight.as_mut().expect("round in flight").await }, if in_flight.is_some() => {
                in_flight = None;
                if seq == round_seq {
                    tracing::debug!(uid = %uid, round = seq, events = timeline.len(), "Round settled");
                    if tx.send(TimelineUpdate::Settled(timeline)).is_err() {
                        break;
                    }
                } else {
                    tracing::debug!(uid = %uid, round = seq, "Discarding superseded round");
                }
            }
        }
    }
}

/// Resolve every event of one snapshot, then sort.
///
/// The outer `join_all` is the round's completion barrier: it yields only
/// after every event's own participant join has completed.
async fn resolve_round<S: StoreClient>(
    store: S,
    snapshot: Vec<StoredEvent>,
    seq: u64,
) -> (u64, Vec<TimelineEvent>) {
    let mut events =
        future::join_all(snapshot.into_iter().map(|event| resolve_event(&store, event))).await;

    // Date descending; equal dates ordered by id ascending for determinism.
    events.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

    (seq, events)
}

/// Fan out one profile fetch per participant id.
///
/// `join_all` writes each result at its id's position regardless of
/// arrival order, and completes only when all fetches have.
async fn resolve_event<S: StoreClient>(store: &S, event: StoredEvent) -> TimelineEvent {
    let participants = future::join_all(
        event
            .participant_ids
            .iter()
            .map(|uid| fetch_participant(store, uid.clone())),
    )
    .await;

    TimelineEvent::from_stored(event, participants)
}

/// A missing or failed profile is recorded as absent; it never fails the
/// round.
async fn fetch_participant<S: StoreClient>(store: &S, uid: String) -> Option<Participant> {
    match store.get_profile(&uid).await {
        Ok(Some(profile)) => Some(Participant::from(profile)),
        Ok(None) => {
            tracing::warn!(uid = %uid, "Participant profile missing");
            None
        }
        Err(e) => {
            tracing::warn!(uid = %uid, error = %e, "Participant fetch failed");
            None
        }
    }
}
