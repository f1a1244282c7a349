// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! External place-search provider client.
//!
//! Queries the Google Places nearby-search endpoint for basketball courts
//! around a center point and maps the results into `CourtCandidate`s.
//! Provider results are trusted to already be radius-filtered.

use crate::error::{AppError, Result};
use crate::models::{Coordinate, CourtCandidate};
use async_trait::async_trait;
use serde::Deserialize;

/// Radius search against an external venue source.
#[async_trait]
pub trait PlaceProvider: Send + Sync + 'static {
    async fn search(&self, center: Coordinate, radius_meters: f64) -> Result<Vec<CourtCandidate>>;
}

/// Google Places API client.
#[derive(Clone)]
pub struct GooglePlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Search keyword sent with every nearby-search request.
const SEARCH_KEYWORD: &str = "basketball court";

impl GooglePlacesClient {
    /// Create a new Places client with an API key.
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            api_key,
        }
    }

    /// Override the endpoint (tests point this at a local server).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json(&self, response: reqwest::Response) -> Result<NearbySearchResponse> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!("HTTP {}: {}", status, body)));
        }

        let parsed: NearbySearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("JSON parse error: {}", e)))?;

        // The Places API reports most failures in-band with HTTP 200.
        match parsed.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(parsed),
            other => Err(AppError::Provider(format!(
                "Places API status {}: {}",
                other,
                parsed.error_message.unwrap_or_default()
            ))),
        }
    }
}

#[async_trait]
impl PlaceProvider for GooglePlacesClient {
    async fn search(&self, center: Coordinate, radius_meters: f64) -> Result<Vec<CourtCandidate>> {
        let url = format!("{}/nearbysearch/json", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("location", format!("{},{}", center.lat, center.lng)),
                ("radius", radius_meters.to_string()),
                ("keyword", SEARCH_KEYWORD.to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Provider(e.to_string()))?;

        let parsed = self.check_response_json(response).await?;

        let candidates = parsed
            .results
            .into_iter()
            .map(|place| CourtCandidate {
                id: place.place_id,
                name: place.name,
                coords: place.geometry.location,
            })
            .collect();

        Ok(candidates)
    }
}

/// Nearby-search response envelope.
#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    geometry: PlaceGeometry,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: Coordinate,
}
