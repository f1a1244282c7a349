// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared fixtures and test doubles.

use async_trait::async_trait;
use courtside::db::{EventSubscription, MemoryStore, StoreClient};
use courtside::error::{AppError, ErrorSink, Result};
use courtside::models::{
    Coordinate, Court, CourtCandidate, CourtRef, DiscoveredBy, StoredEvent, UserProfile,
};
use courtside::services::PlaceProvider;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Install a test-writer subscriber once; RUST_LOG controls verbosity.
#[allow(dead_code)]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ─── Fixtures ────────────────────────────────────────────────────

#[allow(dead_code)]
pub fn court(id: &str, lat: f64, lng: f64) -> Court {
    Court {
        id: id.to_string(),
        name: format!("Court {}", id),
        coords: Coordinate::new(lat, lng),
        discovered_by: Some(DiscoveredBy {
            display_name: "Pat".to_string(),
            uid: "pinner-1".to_string(),
        }),
        verified: false,
        pin_date: chrono::Utc::now(),
    }
}

#[allow(dead_code)]
pub fn candidate(id: &str, lat: f64, lng: f64) -> CourtCandidate {
    CourtCandidate {
        id: id.to_string(),
        name: format!("Candidate {}", id),
        coords: Coordinate::new(lat, lng),
    }
}

#[allow(dead_code)]
pub fn profile(uid: &str) -> UserProfile {
    UserProfile {
        uid: uid.to_string(),
        display_name: format!("User {}", uid),
        photo_url: None,
        email: Some(format!("{}@example.com", uid)),
        saved_courts: vec![],
    }
}

#[allow(dead_code)]
pub fn stored_event(id: &str, date: &str, participant_ids: &[&str]) -> StoredEvent {
    StoredEvent {
        id: id.to_string(),
        event_type: "pickup game".to_string(),
        date: date.parse().expect("valid RFC 3339 date"),
        author: participant_ids.first().unwrap_or(&"u0").to_string(),
        comment: "run it back".to_string(),
        court: CourtRef {
            id: "c1".to_string(),
            name: "Main St".to_string(),
            coords: Coordinate::new(40.0, -74.0),
        },
        participant_ids: participant_ids.iter().map(|u| u.to_string()).collect(),
    }
}

// ─── Store double ────────────────────────────────────────────────

/// MemoryStore wrapper with injectable failures and latency.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct TestStore {
    pub inner: MemoryStore,
    fail_scan: bool,
    profile_delay: Duration,
    failing_profiles: Arc<HashSet<String>>,
}

#[allow(dead_code)]
impl TestStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Every `scan_courts` call fails with a read error.
    pub fn with_scan_failure(mut self) -> Self {
        self.fail_scan = true;
        self
    }

    /// Every `get_profile` call sleeps first (for in-flight-round tests).
    pub fn with_profile_delay(mut self, delay: Duration) -> Self {
        self.profile_delay = delay;
        self
    }

    /// `get_profile` fails for these uids.
    pub fn with_failing_profiles(mut self, uids: &[&str]) -> Self {
        self.failing_profiles = Arc::new(uids.iter().map(|u| u.to_string()).collect());
        self
    }
}

#[async_trait]
impl StoreClient for TestStore {
    async fn get_court(&self, id: &str) -> Result<Option<Court>> {
        self.inner.get_court(id).await
    }

    async fn put_court(&self, court: &Court) -> Result<()> {
        self.inner.put_court(court).await
    }

    async fn scan_courts(&self) -> Result<Vec<Court>> {
        if self.fail_scan {
            return Err(AppError::StoreRead("injected scan failure".to_string()));
        }
        self.inner.scan_courts().await
    }

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        if !self.profile_delay.is_zero() {
            tokio::time::sleep(self.profile_delay).await;
        }
        if self.failing_profiles.contains(uid) {
            return Err(AppError::ParticipantResolution {
                uid: uid.to_string(),
                message: "injected fetch failure".to_string(),
            });
        }
        self.inner.get_profile(uid).await
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<()> {
        self.inner.put_profile(profile).await
    }

    async fn add_saved_court(&self, uid: &str, court_id: &str) -> Result<()> {
        self.inner.add_saved_court(uid, court_id).await
    }

    async fn remove_saved_court(&self, uid: &str, court_id: &str) -> Result<()> {
        self.inner.remove_saved_court(uid, court_id).await
    }

    async fn get_event(&self, id: &str) -> Result<Option<StoredEvent>> {
        self.inner.get_event(id).await
    }

    async fn put_event(&self, event: &StoredEvent) -> Result<()> {
        self.inner.put_event(event).await
    }

    fn watch_events(&self, uid: &str) -> EventSubscription {
        self.inner.watch_events(uid)
    }
}

// ─── Provider double ─────────────────────────────────────────────

/// Provider that replays canned candidates or a canned failure.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct StaticProvider {
    results: Vec<CourtCandidate>,
    fail: bool,
}

#[allow(dead_code)]
impl StaticProvider {
    pub fn returning(results: Vec<CourtCandidate>) -> Self {
        Self {
            results,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            results: vec![],
            fail: true,
        }
    }
}

#[async_trait]
impl PlaceProvider for StaticProvider {
    async fn search(&self, _center: Coordinate, _radius_meters: f64) -> Result<Vec<CourtCandidate>> {
        if self.fail {
            return Err(AppError::Provider("injected provider outage".to_string()));
        }
        Ok(self.results.clone())
    }
}

// ─── Error sink double ───────────────────────────────────────────

/// Sink that records every reported error message.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, error: &AppError) {
        self.reports.lock().unwrap().push(error.to_string());
    }
}
