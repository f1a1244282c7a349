// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Saved-courts set and court pinning tests.

mod common;

use common::{court, profile};
use courtside::db::{MemoryStore, StoreClient};
use courtside::models::{Coordinate, DiscoveredBy};
use courtside::services::{CourtDraft, CourtService};

fn draft(name: &str) -> CourtDraft {
    CourtDraft {
        id: None,
        name: name.to_string(),
        coords: Coordinate::new(40.8, -73.95),
        discovered_by: DiscoveredBy {
            display_name: "Pat".to_string(),
            uid: "u1".to_string(),
        },
    }
}

#[tokio::test]
async fn test_pin_court_assigns_id() {
    let store = MemoryStore::new();
    let service = CourtService::new(store.clone());

    let pinned = service.pin_court(draft("Tompkins Square")).await.unwrap();
    assert!(!pinned.id.is_empty());
    assert!(!pinned.verified);

    let stored = store.get_court(&pinned.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Tompkins Square");
}

#[tokio::test]
async fn test_pin_court_keeps_provider_id() {
    let store = MemoryStore::new();
    let service = CourtService::new(store);

    let mut d = draft("Promoted");
    d.id = Some("place-123".to_string());
    let pinned = service.pin_court(d).await.unwrap();
    assert_eq!(pinned.id, "place-123");
}

#[tokio::test]
async fn test_save_twice_yields_one_membership() {
    let store = MemoryStore::new();
    store.put_profile(&profile("u1")).await.unwrap();
    let c = court("c1", 40.8, -73.95);
    store.put_court(&c).await.unwrap();

    let service = CourtService::new(store.clone());
    service.save_court("u1", &c).await.unwrap();
    service.save_court("u1", &c).await.unwrap();

    let saved = store.get_profile("u1").await.unwrap().unwrap().saved_courts;
    assert_eq!(saved, vec!["c1".to_string()]);
}

#[tokio::test]
async fn test_save_promotes_unknown_court() {
    let store = MemoryStore::new();
    store.put_profile(&profile("u1")).await.unwrap();

    // A provider result the store has never seen.
    let c = court("place-9", 40.8, -73.95);
    assert!(store.get_court("place-9").await.unwrap().is_none());

    let service = CourtService::new(store.clone());
    service.save_court("u1", &c).await.unwrap();

    assert!(store.get_court("place-9").await.unwrap().is_some());
    let saved = store.get_profile("u1").await.unwrap().unwrap().saved_courts;
    assert_eq!(saved, vec!["place-9".to_string()]);
}

#[tokio::test]
async fn test_unsave_absent_id_is_noop() {
    let store = MemoryStore::new();
    store.put_profile(&profile("u1")).await.unwrap();

    let service = CourtService::new(store.clone());
    service.unsave_court("u1", "never-saved").await.unwrap();

    let saved = store.get_profile("u1").await.unwrap().unwrap().saved_courts;
    assert!(saved.is_empty());
}

#[tokio::test]
async fn test_unsave_removes_membership() {
    let store = MemoryStore::new();
    store.put_profile(&profile("u1")).await.unwrap();
    let c = court("c1", 40.8, -73.95);
    store.put_court(&c).await.unwrap();

    let service = CourtService::new(store.clone());
    service.save_court("u1", &c).await.unwrap();
    service.unsave_court("u1", "c1").await.unwrap();

    let saved = store.get_profile("u1").await.unwrap().unwrap().saved_courts;
    assert!(saved.is_empty());
}

#[tokio::test]
async fn test_saved_courts_skips_missing_documents() {
    let store = MemoryStore::new();
    store.put_profile(&profile("u1")).await.unwrap();
    let c = court("c1", 40.8, -73.95);
    store.put_court(&c).await.unwrap();

    // "ghost" was saved but its court document is gone.
    store.add_saved_court("u1", "c1").await.unwrap();
    store.add_saved_court("u1", "ghost").await.unwrap();

    let service = CourtService::new(store);
    let hydrated = service.saved_courts("u1").await.unwrap();

    assert_eq!(hydrated.len(), 1);
    assert_eq!(hydrated[0].id, "c1");
}
