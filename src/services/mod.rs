// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod courts;
pub mod discovery;
pub mod places;
pub mod timeline;

pub use courts::{CourtDraft, CourtService};
pub use discovery::{Discovery, DiscoveryService};
pub use places::{GooglePlacesClient, PlaceProvider};
pub use timeline::{TimelineService, TimelineSubscription, TimelineUpdate};
