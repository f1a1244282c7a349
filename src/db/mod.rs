//! Database layer: the document-store capability and its implementations.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::models::{Court, StoredEvent, UserProfile};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Collection names as constants.
pub mod collections {
    pub const COURTS: &str = "courts";
    pub const USERS: &str = "users";
    pub const EVENTS: &str = "events";
}

/// Document-store capability consumed by the services.
///
/// Typed per-collection surface over point reads/writes, full-collection
/// scans, set-semantics array updates, and a live field-contains query.
#[async_trait]
pub trait StoreClient: Clone + Send + Sync + 'static {
    // ─── Courts ─────────────────────────────────────────────────
    async fn get_court(&self, id: &str) -> Result<Option<Court>>;
    async fn put_court(&self, court: &Court) -> Result<()>;
    /// Read the full `courts` collection (the store has no server-side
    /// radius capability; callers filter).
    async fn scan_courts(&self) -> Result<Vec<Court>>;

    // ─── Users ──────────────────────────────────────────────────
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>>;
    async fn put_profile(&self, profile: &UserProfile) -> Result<()>;
    /// Array-union `court_id` into the user's saved set. Idempotent.
    async fn add_saved_court(&self, uid: &str, court_id: &str) -> Result<()>;
    /// Array-remove `court_id` from the user's saved set. Removing an
    /// absent id is a no-op.
    async fn remove_saved_court(&self, uid: &str, court_id: &str) -> Result<()>;

    // ─── Events ─────────────────────────────────────────────────
    async fn get_event(&self, id: &str) -> Result<Option<StoredEvent>>;
    async fn put_event(&self, event: &StoredEvent) -> Result<()>;
    /// Live query: events whose `participant_ids` contains `uid`.
    ///
    /// The subscription delivers a full result snapshot immediately and
    /// again after every change, until its guard is dropped.
    fn watch_events(&self, uid: &str) -> EventSubscription;
}

/// One notification from a live event query: a full snapshot, or the
/// terminal upstream failure.
pub type EventsSnapshot = Result<Vec<StoredEvent>>;

/// Live subscription to an event query.
pub struct EventSubscription {
    rx: mpsc::UnboundedReceiver<EventsSnapshot>,
    guard: SubscriptionGuard,
}

impl EventSubscription {
    pub fn new(rx: mpsc::UnboundedReceiver<EventsSnapshot>, guard: SubscriptionGuard) -> Self {
        Self { rx, guard }
    }

    /// Next snapshot, or `None` once the upstream side is gone.
    pub async fn recv(&mut self) -> Option<EventsSnapshot> {
        self.rx.recv().await
    }

    /// Detach the unsubscribe guard so it can outlive the receiving half.
    pub fn into_parts(self) -> (mpsc::UnboundedReceiver<EventsSnapshot>, SubscriptionGuard) {
        (self.rx, self.guard)
    }
}

/// Runs a store-specific unsubscribe action when dropped.
///
/// The action is synchronous: once the guard is gone, no further
/// notifications are delivered.
pub struct SubscriptionGuard(Option<Box<dyn FnOnce() + Send>>);

impl SubscriptionGuard {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(unsubscribe)))
    }

    /// Guard for subscriptions with no teardown (tests).
    pub fn noop() -> Self {
        Self(None)
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.0.take() {
            unsubscribe();
        }
    }
}
