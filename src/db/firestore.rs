// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed store client.
//!
//! Wraps the `firestore` crate with typed operations for:
//! - Courts (pin records, full-collection scans for discovery)
//! - Users (profiles and the saved-courts set)
//! - Events (point ops and the live participant query)
//!
//! Array-union/array-remove run as server-side field transforms, so the
//! set semantics hold under concurrent writers. The live event query is a
//! Firestore listener; each change re-runs the query and pushes a full
//! snapshot.

use crate::db::{collections, EventSubscription, EventsSnapshot, StoreClient, SubscriptionGuard};
use crate::error::{AppError, Result};
use crate::models::{Court, StoredEvent, UserProfile};
use async_trait::async_trait;
use firestore::*;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Listener target ids must be unique per listener within the process.
static NEXT_TARGET_ID: AtomicU32 = AtomicU32::new(1);

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Option<FirestoreDb>,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::StoreRead(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = FirestoreDbOptions::new(project_id.to_string());

        let client = FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::StoreRead(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&FirestoreDb> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::StoreRead("Database not connected (offline mode)".to_string()))
    }

    /// Run the participant query once and push the snapshot.
    async fn push_events_snapshot(
        &self,
        uid: &str,
        tx: &mpsc::UnboundedSender<EventsSnapshot>,
        active: &AtomicBool,
    ) -> Result<()> {
        let uid_owned = uid.to_string();
        let events: Vec<StoredEvent> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EVENTS)
            .filter(move |q| {
                q.for_all([q.field("participant_ids").array_contains(uid_owned.clone())])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::StoreRead(e.to_string()))?;

        if active.load(Ordering::SeqCst) {
            let _ = tx.send(Ok(events));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreClient for FirestoreStore {
    // ─── Court Operations ────────────────────────────────────────

    async fn get_court(&self, id: &str) -> Result<Option<Court>> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::COURTS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::StoreRead(e.to_string()))
    }

    async fn put_court(&self, court: &Court) -> Result<()> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::COURTS)
            .document_id(&court.id)
            .object(court)
            .execute()
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;
        Ok(())
    }

    async fn scan_courts(&self) -> Result<Vec<Court>> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::COURTS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::StoreRead(e.to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::StoreRead(e.to_string()))
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<()> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&profile.uid)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;
        Ok(())
    }

    async fn add_saved_court(&self, uid: &str, court_id: &str) -> Result<()> {
        let client = self.get_client()?;
        let batch_writer = client
            .create_simple_batch_writer()
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;
        let mut batch = batch_writer.new_batch();
        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .transforms(|t| {
                t.fields([t
                    .field("saved_courts")
                    .append_missing_elements([court_id.to_string()])])
            })
            .only_transform()
            .add_to_batch(&mut batch)
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;
        batch
            .write()
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;
        Ok(())
    }

    async fn remove_saved_court(&self, uid: &str, court_id: &str) -> Result<()> {
        let client = self.get_client()?;
        let batch_writer = client
            .create_simple_batch_writer()
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;
        let mut batch = batch_writer.new_batch();
        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .transforms(|t| {
                t.fields([t
                    .field("saved_courts")
                    .remove_all_from_array([court_id.to_string()])])
            })
            .only_transform()
            .add_to_batch(&mut batch)
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;
        batch
            .write()
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;
        Ok(())
    }

    // ─── Event Operations ────────────────────────────────────────

    async fn get_event(&self, id: &str) -> Result<Option<StoredEvent>> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EVENTS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::StoreRead(e.to_string()))
    }

    async fn put_event(&self, event: &StoredEvent) -> Result<()> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::EVENTS)
            .document_id(&event.id)
            .object(event)
            .execute()
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;
        Ok(())
    }

    fn watch_events(&self, uid: &str) -> EventSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel();
        let active = Arc::new(AtomicBool::new(true));

        let store = self.clone();
        let uid = uid.to_string();
        let task_active = Arc::clone(&active);
        tokio::spawn(async move {
            if let Err(e) = run_event_listener(store, uid, tx.clone(), task_active.clone(), stop_rx).await {
                if task_active.load(Ordering::SeqCst) {
                    let _ = tx.send(Err(e));
                }
            }
        });

        let guard = SubscriptionGuard::new(move || {
            active.store(false, Ordering::SeqCst);
            let _ = stop_tx.send(());
        });

        EventSubscription::new(rx, guard)
    }
}

/// Drive one live event query: initial snapshot, then a re-query per
/// listener change event, until the stop signal arrives.
async fn run_event_listener(
    store: FirestoreStore,
    uid: String,
    tx: mpsc::UnboundedSender<EventsSnapshot>,
    active: Arc<AtomicBool>,
    stop_rx: oneshot::Receiver<()>,
) -> Result<()> {
    store.push_events_snapshot(&uid, &tx, &active).await?;

    let mut listener = store
        .get_client()?
        .create_listener(FirestoreTempFilesListenStateStorage::new())
        .await
        .map_err(|e| AppError::StoreRead(format!("Failed to create listener: {}", e)))?;

    let target_id = NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed);
    let filter_uid = uid.clone();
    store
        .get_client()?
        .fluent()
        .select()
        .from(collections::EVENTS)
        .filter(move |q| {
            q.for_all([q.field("participant_ids").array_contains(filter_uid.clone())])
        })
        .listen()
        .add_target(FirestoreListenerTarget::new(target_id), &mut listener)
        .map_err(|e| AppError::StoreRead(format!("Failed to add listen target: {}", e)))?;

    let cb_store = store.clone();
    let cb_uid = uid.clone();
    let cb_tx = tx.clone();
    let cb_active = Arc::clone(&active);
    listener
        .start(move |event| {
            let store = cb_store.clone();
            let uid = cb_uid.clone();
            let tx = cb_tx.clone();
            let active = Arc::clone(&cb_active);
            async move {
                match event {
                    FirestoreListenEvent::DocumentChange(_)
                    | FirestoreListenEvent::DocumentDelete(_)
                    | FirestoreListenEvent::DocumentRemove(_) => {
                        if active.load(Ordering::SeqCst) {
                            if let Err(e) = store.push_events_snapshot(&uid, &tx, &active).await {
                                tracing::warn!(uid = %uid, error = %e, "Event re-query failed");
                            }
                        }
                    }
                    _ => {}
                }
                Ok(())
            }
        })
        .await
        .map_err(|e| AppError::StoreRead(format!("Failed to start listener: {}", e)))?;

    tracing::debug!(uid = %uid, target_id, "Event listener started");

    // Hold the listener open until the subscription guard fires.
    let _ = stop_rx.await;

    if let Err(e) = listener.shutdown().await {
        tracing::warn!(uid = %uid, error = %e, "Listener shutdown failed");
    }
    Ok(())
}
