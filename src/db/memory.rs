// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store with live query notifications.
//!
//! Backs local development and tests with the same `StoreClient` surface
//! as Firestore, including snapshot pushes to event watchers on every
//! mutation. All data lives in memory and is lost on drop.

use crate::db::{EventSubscription, EventsSnapshot, StoreClient, SubscriptionGuard};
use crate::error::{AppError, Result};
use crate::models::{Court, StoredEvent, UserProfile};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    courts: DashMap<String, Court>,
    profiles: DashMap<String, UserProfile>,
    events: DashMap<String, StoredEvent>,
    watchers: Mutex<Vec<Watcher>>,
    next_watcher_id: AtomicU64,
}

struct Watcher {
    id: u64,
    uid: String,
    tx: mpsc::UnboundedSender<EventsSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot_for(&self, uid: &str) -> Vec<StoredEvent> {
        self.inner
            .events
            .iter()
            .filter(|entry| entry.value().participant_ids.iter().any(|p| p == uid))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Push a fresh snapshot to every watcher whose uid is affected.
    fn notify(&self, affected_uids: &[String]) {
        let watchers = self.inner.watchers.lock().expect("watchers lock poisoned");
        for watcher in watchers.iter() {
            if affected_uids.iter().any(|u| u == &watcher.uid) {
                let _ = watcher.tx.send(Ok(self.snapshot_for(&watcher.uid)));
            }
        }
    }

    /// Deliver a terminal query failure to every watcher for `uid`.
    ///
    /// Lets tests exercise the aggregator's upstream-failure path without a
    /// real store outage.
    pub fn fail_event_watchers(&self, uid: &str, message: &str) {
        let watchers = self.inner.watchers.lock().expect("watchers lock poisoned");
        for watcher in watchers.iter() {
            if watcher.uid == uid {
                let _ = watcher.tx.send(Err(AppError::StoreRead(message.to_string())));
            }
        }
    }

    /// Number of registered event watchers (tests assert unsubscription).
    pub fn watcher_count(&self) -> usize {
        self.inner.watchers.lock().expect("watchers lock poisoned").len()
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn get_court(&self, id: &str) -> Result<Option<Court>> {
        Ok(self.inner.courts.get(id).map(|c| c.value().clone()))
    }

    async fn put_court(&self, court: &Court) -> Result<()> {
        self.inner.courts.insert(court.id.clone(), court.clone());
        Ok(())
    }

    async fn scan_courts(&self) -> Result<Vec<Court>> {
        Ok(self.inner.courts.iter().map(|c| c.value().clone()).collect())
    }

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        Ok(self.inner.profiles.get(uid).map(|p| p.value().clone()))
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<()> {
        self.inner.profiles.insert(profile.uid.clone(), profile.clone());
        Ok(())
    }

    async fn add_saved_court(&self, uid: &str, court_id: &str) -> Result<()> {
        let mut profile = self
            .inner
            .profiles
            .get_mut(uid)
            .ok_or_else(|| AppError::StoreWrite(format!("no such user: {}", uid)))?;
        if !profile.saved_courts.iter().any(|id| id == court_id) {
            profile.saved_courts.push(court_id.to_string());
        }
        Ok(())
    }

    async fn remove_saved_court(&self, uid: &str, court_id: &str) -> Result<()> {
        let mut profile = self
            .inner
            .profiles
            .get_mut(uid)
            .ok_or_else(|| AppError::StoreWrite(format!("no such user: {}", uid)))?;
        profile.saved_courts.retain(|id| id != court_id);
        Ok(())
    }

    async fn get_event(&self, id: &str) -> Result<Option<StoredEvent>> {
        Ok(self.inner.events.get(id).map(|e| e.value().clone()))
    }

    async fn put_event(&self, event: &StoredEvent) -> Result<()> {
        let previous = self.inner.events.insert(event.id.clone(), event.clone());

        // Watchers matching either the old or new participant list see a
        // changed result set.
        let mut affected = event.participant_ids.clone();
        if let Some(old) = previous {
            affected.extend(old.participant_ids);
        }
        self.notify(&affected);
        Ok(())
    }

    fn watch_events(&self, uid: &str) -> EventSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.inner.next_watcher_id.fetch_add(1, Ordering::Relaxed);

        // Initial snapshot before registration so it is always first.
        let _ = tx.send(Ok(self.snapshot_for(uid)));

        self.inner
            .watchers
            .lock()
            .expect("watchers lock poisoned")
            .push(Watcher {
                id,
                uid: uid.to_string(),
                tx,
            });

        let inner = Arc::clone(&self.inner);
        let guard = SubscriptionGuard::new(move || {
            inner
                .watchers
                .lock()
                .expect("watchers lock poisoned")
                .retain(|w| w.id != id);
        });

        EventSubscription::new(rx, guard)
    }
}
