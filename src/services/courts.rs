// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Court pinning and the per-user saved-courts set.

use crate::db::StoreClient;
use crate::error::{AppError, Result};
use crate::models::{Coordinate, Court, DiscoveredBy};
use futures_util::future;

/// Input for pinning a court.
///
/// `id` is present when a provider candidate is being promoted (its place
/// id stays the identity key); manual pins get a store-assigned id.
#[derive(Debug, Clone)]
pub struct CourtDraft {
    pub id: Option<String>,
    pub name: String,
    pub coords: Coordinate,
    pub discovered_by: DiscoveredBy,
}

/// Create/save/unsave operations on courts.
pub struct CourtService<S> {
    store: S,
}

impl<S: StoreClient> CourtService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Pin a new court. Assigns an id when the draft has none.
    pub async fn pin_court(&self, draft: CourtDraft) -> Result<Court> {
        let court = Court {
            id: draft
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: draft.name,
            coords: draft.coords,
            discovered_by: Some(draft.discovered_by),
            verified: false,
            pin_date: chrono::Utc::now(),
        };

        self.store.put_court(&court).await?;
        tracing::info!(court_id = %court.id, name = %court.name, "Court pinned");
        Ok(court)
    }

    /// Save a court to the user's set, promoting it into the store first
    /// if it is a provider result seen for the first time.
    ///
    /// Adding an already-saved id leaves exactly one membership.
    pub async fn save_court(&self, uid: &str, court: &Court) -> Result<()> {
        if self.store.get_court(&court.id).await?.is_none() {
            self.store.put_court(court).await?;
            tracing::info!(court_id = %court.id, "Promoted provider court into store");
        }

        self.store.add_saved_court(uid, &court.id).await?;
        Ok(())
    }

    /// Remove a court id from the user's set. Unsaving an absent id is a
    /// no-op.
    pub async fn unsave_court(&self, uid: &str, court_id: &str) -> Result<()> {
        self.store.remove_saved_court(uid, court_id).await
    }

    /// Hydrate the user's saved ids into court records.
    ///
    /// Ids whose document no longer exists are skipped; order of the
    /// surviving ids is preserved.
    pub async fn saved_courts(&self, uid: &str) -> Result<Vec<Court>> {
        let profile = self
            .store
            .get_profile(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", uid)))?;

        let fetched = future::join_all(
            profile
                .saved_courts
                .iter()
                .map(|id| self.store.get_court(id)),
        )
        .await;

        let mut courts = Vec::with_capacity(fetched.len());
        for result in fetched {
            if let Some(court) = result? {
                courts.push(court);
            }
        }
        Ok(courts)
    }
}
