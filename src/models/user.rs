//! User model for storage and participant resolution.

use serde::{Deserialize, Serialize};

/// User profile stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Auth uid (also used as document ID)
    pub uid: String,
    /// Display name shown on timelines and pins
    pub display_name: String,
    /// Profile picture URL
    pub photo_url: Option<String>,
    /// Email address (may be None if not shared)
    pub email: Option<String>,
    /// Ids of courts the user saved; mutated only via array-union/remove
    #[serde(default)]
    pub saved_courts: Vec<String>,
}

/// Minimal profile snapshot attached to a resolved event.
///
/// Fetched by uid during a resolution round; immutable after fetch, not
/// kept in sync with later profile edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub uid: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub email: Option<String>,
}

impl From<UserProfile> for Participant {
    fn from(profile: UserProfile) -> Self {
        Self {
            uid: profile.uid,
            display_name: profile.display_name,
            photo_url: profile.photo_url,
            email: profile.email,
        }
    }
}
