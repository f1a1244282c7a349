// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nearby-court discovery: merge store and provider results.
//!
//! The store is the system of record for user-curated courts and always
//! wins over the provider on identity collision; the provider supplies
//! courts not yet known to the store. Dedup is by id only — two sources
//! reporting the same physical court under different ids are not merged
//! (known limitation, not silently fixed).

use crate::db::StoreClient;
use crate::error::{AppError, ErrorSink, Result};
use crate::geofilter;
use crate::models::{Coordinate, Court};
use crate::services::places::PlaceProvider;
use std::collections::HashSet;
use std::sync::Arc;

/// One discovery result: the merged court list, plus a warning when the
/// provider leg failed and the result is local-only.
#[derive(Debug)]
pub struct Discovery {
    pub courts: Vec<Court>,
    pub warning: Option<AppError>,
}

/// Merges store and provider courts around a center point.
pub struct DiscoveryService<S, P> {
    store: S,
    provider: Arc<P>,
    sink: Arc<dyn ErrorSink>,
}

impl<S: StoreClient, P: PlaceProvider> DiscoveryService<S, P> {
    pub fn new(store: S, provider: Arc<P>, sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            store,
            provider,
            sink,
        }
    }

    /// Find courts within `radius_meters` of `center`.
    ///
    /// A store failure fails the whole call; a provider failure degrades
    /// to local-only results with a warning. No two returned courts share
    /// an id.
    pub async fn discover(&self, center: Coordinate, radius_meters: f64) -> Result<Discovery> {
        // The store has no server-side radius query, so scan and filter.
        let all_courts = self.store.scan_courts().await.map_err(|e| match e {
            AppError::StoreRead(_) => e,
            other => AppError::StoreRead(other.to_string()),
        })?;

        let local: Vec<Court> = all_courts
            .into_iter()
            .filter(|c| geofilter::within_radius(&c.coords, &center, radius_meters))
            .collect();

        let local_ids: HashSet<&str> = local.iter().map(|c| c.id.as_str()).collect();

        tracing::debug!(
            local = local.len(),
            radius_meters,
            "Local courts within radius"
        );

        // Provider results are already radius-filtered; a failure here must
        // not take the local results down with it.
        let (provider_courts, warning) = match self.provider.search(center, radius_meters).await {
            Ok(candidates) => {
                let now = chrono::Utc::now();
                let fresh: Vec<Court> = candidates
                    .into_iter()
                    .filter(|cand| !local_ids.contains(cand.id.as_str()))
                    .map(|cand| cand.into_court(now))
                    .collect();
                (fresh, None)
            }
            Err(e) => {
                let warning = match e {
                    AppError::Provider(_) => e,
                    other => AppError::Provider(other.to_string()),
                };
                self.sink.report(&warning);
                (Vec::new(), Some(warning))
            }
        };

        let mut courts = local;
        courts.extend(provider_courts);

        tracing::info!(
            total = courts.len(),
            degraded = warning.is_some(),
            "Discovery merged"
        );

        Ok(Discovery { courts, warning })
    }
}
