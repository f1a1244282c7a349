// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Court model for storage and discovery results.

use serde::{Deserialize, Serialize};

/// Canonical coordinate pair.
///
/// Deserialization accepts any of the field shapes seen at the boundary:
/// `{lat, lng}`, `{latitude, longitude}`, and the Firestore GeoPoint wire
/// shape `{_latitude, _longitude}`. Serialization always writes `{lat, lng}`,
/// so normalization happens exactly once, at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "CoordinateRepr")]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CoordinateRepr {
    Short { lat: f64, lng: f64 },
    Long { latitude: f64, longitude: f64 },
    GeoPoint {
        #[serde(rename = "_latitude")]
        latitude: f64,
        #[serde(rename = "_longitude")]
        longitude: f64,
    },
}

impl From<CoordinateRepr> for Coordinate {
    fn from(repr: CoordinateRepr) -> Self {
        match repr {
            CoordinateRepr::Short { lat, lng } => Self { lat, lng },
            CoordinateRepr::Long { latitude, longitude }
            | CoordinateRepr::GeoPoint { latitude, longitude } => Self {
                lat: latitude,
                lng: longitude,
            },
        }
    }
}

/// Who pinned a court, recorded at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredBy {
    pub display_name: String,
    pub uid: String,
}

/// Court record stored in the `courts` collection.
///
/// `id` is assigned by the store on first creation and is the stable
/// identity key: it is the only dedup signal across data sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Court {
    /// Document id (store-assigned uuid, or the provider place id for
    /// promoted candidates)
    pub id: String,
    pub name: String,
    pub coords: Coordinate,
    /// Absent for provider candidates that have not been pinned yet
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub discovered_by: Option<DiscoveredBy>,
    /// Whether a moderator confirmed the court exists
    pub verified: bool,
    /// When the court was first pinned
    pub pin_date: chrono::DateTime<chrono::Utc>,
}

/// Venue-like record returned by the external place-search provider.
///
/// Not yet promoted into the store; promotion happens on first save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtCandidate {
    pub id: String,
    pub name: String,
    pub coords: Coordinate,
}

impl CourtCandidate {
    /// Surface a candidate as an unverified court in a discovery result.
    pub fn into_court(self, pin_date: chrono::DateTime<chrono::Utc>) -> Court {
        Court {
            id: self.id,
            name: self.name,
            coords: self.coords,
            discovered_by: None,
            verified: false,
            pin_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_normalizes_short_shape() {
        let c: Coordinate = serde_json::from_str(r#"{"lat": 40.7, "lng": -74.0}"#).unwrap();
        assert_eq!(c, Coordinate::new(40.7, -74.0));
    }

    #[test]
    fn test_coordinate_normalizes_long_shape() {
        let c: Coordinate =
            serde_json::from_str(r#"{"latitude": 40.7, "longitude": -74.0}"#).unwrap();
        assert_eq!(c, Coordinate::new(40.7, -74.0));
    }

    #[test]
    fn test_coordinate_normalizes_geopoint_shape() {
        let c: Coordinate =
            serde_json::from_str(r#"{"_latitude": 40.7, "_longitude": -74.0}"#).unwrap();
        assert_eq!(c, Coordinate::new(40.7, -74.0));
    }

    #[test]
    fn test_coordinate_serializes_canonical() {
        let json = serde_json::to_value(Coordinate::new(1.0, 2.0)).unwrap();
        assert_eq!(json, serde_json::json!({"lat": 1.0, "lng": 2.0}));
    }
}
