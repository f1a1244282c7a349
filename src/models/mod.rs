// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.
//!
//! Loosely-typed store documents are converted into these types once, at
//! the boundary; field-shape normalization never happens at use sites.

pub mod court;
pub mod event;
pub mod user;

pub use court::{Coordinate, Court, CourtCandidate, DiscoveredBy};
pub use event::{CourtRef, StoredEvent, TimelineEvent};
pub use user::{Participant, UserProfile};
