// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Radius containment checks on great-circle distance.

use crate::models::Coordinate;
use geo::{Distance, Haversine, Point};

/// Great-circle distance between two coordinates, in meters.
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let p1 = Point::new(a.lng, a.lat);
    let p2 = Point::new(b.lng, b.lat);
    Haversine::distance(p1, p2)
}

/// Whether `point` lies within `radius_meters` of `center`.
///
/// Invalid numeric input (non-finite or out-of-range coordinates, negative
/// or NaN radius) evaluates to `false` rather than erroring.
pub fn within_radius(point: &Coordinate, center: &Coordinate, radius_meters: f64) -> bool {
    if !is_valid(point) || !is_valid(center) {
        return false;
    }
    if !radius_meters.is_finite() || radius_meters < 0.0 {
        return false;
    }
    distance_meters(point, center) <= radius_meters
}

fn is_valid(c: &Coordinate) -> bool {
    c.lat.is_finite() && c.lng.is_finite() && c.lat.abs() <= 90.0 && c.lng.abs() <= 180.0
}
