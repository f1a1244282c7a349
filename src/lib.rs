// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Courtside: discover and track pickup-basketball courts.
//!
//! This crate provides the data-aggregation core behind the app: merging
//! store-curated and provider-discovered courts for map search, and
//! aggregating per-user activity timelines with fully-resolved
//! participants. Screens, navigation, and auth live in the app layer and
//! only consume the services exposed here.

pub mod config;
pub mod db;
pub mod error;
pub mod geofilter;
pub mod models;
pub mod services;
