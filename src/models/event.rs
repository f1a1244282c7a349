// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event models: the stored record and its resolved timeline form.

use crate::models::{Coordinate, Participant};
use serde::{Deserialize, Serialize};

/// Reference to the court an event happened at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtRef {
    pub id: String,
    pub name: String,
    pub coords: Coordinate,
}

/// Event record stored in the `events` collection.
///
/// `participant_ids` is the authoritative participant list; profiles are
/// resolved per round, never stored back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Document id
    pub id: String,
    /// Event kind ("pickup game", "open run", ...)
    #[serde(rename = "type")]
    pub event_type: String,
    pub date: chrono::DateTime<chrono::Utc>,
    /// Uid of the user who created the event
    pub author: String,
    pub comment: String,
    pub court: CourtRef,
    /// Ordered participant uids
    pub participant_ids: Vec<String>,
}

/// Fully resolved event as emitted in a settled timeline.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEvent {
    pub id: String,
    pub event_type: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub author: String,
    pub comment: String,
    pub court: CourtRef,
    pub participant_ids: Vec<String>,
    /// One slot per entry of `participant_ids`, same order. A participant
    /// whose profile could not be fetched is recorded as `None`.
    pub participants: Vec<Option<Participant>>,
}

impl TimelineEvent {
    /// Combine a stored event with the participant slots resolved for it.
    ///
    /// Callers must pass exactly one slot per participant id.
    pub fn from_stored(event: StoredEvent, participants: Vec<Option<Participant>>) -> Self {
        debug_assert_eq!(event.participant_ids.len(), participants.len());
        Self {
            id: event.id,
            event_type: event.event_type,
            date: event.date,
            author: event.author,
            comment: event.comment,
            court: event.court,
            participant_ids: event.participant_ids,
            participants,
        }
    }

    /// An event is resolved when every participant id has a slot.
    pub fn is_resolved(&self) -> bool {
        self.participants.len() == self.participant_ids.len()
    }
}
