//! Store change notifications for UI observers.
//!
//! # Responsibility
//! - Hand out a monotonically increasing revision for polling callers.
//! - Fan out change events to in-process subscribers.
//!
//! # Invariants
//! - `revision` increases by exactly one per published change.
//! - Listeners are invoked outside the registry lock, so a listener may
//!   subscribe or unsubscribe without deadlocking.

use crate::model::day::NormalizedDay;
use crate::model::item::ItemId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle returned by [`ChangeFeed::subscribe`].
pub type SubscriptionId = u64;

type Listener = Arc<dyn Fn(&StoreChange) + Send + Sync>;

/// One committed store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    /// Item created or updated.
    ItemSaved(ItemId),
    /// Item removed together with its records.
    ItemDeleted(ItemId),
    /// Record created, completed or cleared for one item/day.
    RecordChanged { item_id: ItemId, day: NormalizedDay },
}

/// Subscription and polling registry shared by services and FFI callers.
#[derive(Default)]
pub struct ChangeFeed {
    revision: AtomicU64,
    next_subscription: AtomicU64,
    listeners: Mutex<BTreeMap<SubscriptionId, Listener>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current revision. Callers re-read when it differs from their last one.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Registers a listener called after every published change.
    pub fn subscribe(
        &self,
        listener: impl Fn(&StoreChange) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed) + 1;
        self.lock_listeners().insert(id, Arc::new(listener));
        id
    }

    /// Removes a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock_listeners().remove(&id).is_some()
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.lock_listeners().len()
    }

    /// Bumps the revision and notifies listeners. Returns the new revision.
    pub fn publish(&self, change: StoreChange) -> u64 {
        let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
        let listeners = self.lock_listeners().values().cloned().collect::<Vec<_>>();
        for listener in listeners {
            listener(&change);
        }
        revision
    }

    fn lock_listeners(&self) -> MutexGuard<'_, BTreeMap<SubscriptionId, Listener>> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeFeed, StoreChange};
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    #[test]
    fn publish_bumps_revision_and_reaches_subscribers() {
        let feed = ChangeFeed::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        feed.subscribe(move |change| sink.lock().unwrap().push(*change));

        let item_id = Uuid::new_v4();
        assert_eq!(feed.revision(), 0);
        assert_eq!(feed.publish(StoreChange::ItemSaved(item_id)), 1);
        assert_eq!(feed.publish(StoreChange::ItemDeleted(item_id)), 2);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                StoreChange::ItemSaved(item_id),
                StoreChange::ItemDeleted(item_id)
            ]
        );
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let feed = ChangeFeed::new();
        let hits = Arc::new(Mutex::new(0_u32));
        let counter = Arc::clone(&hits);
        let id = feed.subscribe(move |_| *counter.lock().unwrap() += 1);

        feed.publish(StoreChange::ItemSaved(Uuid::new_v4()));
        assert!(feed.unsubscribe(id));
        assert!(!feed.unsubscribe(id));
        feed.publish(StoreChange::ItemSaved(Uuid::new_v4()));

        assert_eq!(*hits.lock().unwrap(), 1);
        assert_eq!(feed.subscriber_count(), 0);
        assert_eq!(feed.revision(), 2);
    }
}
