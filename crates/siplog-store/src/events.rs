//! Change notifications for store mutations.
//!
//! Subscribers are plain callbacks invoked synchronously by the mutating
//! call, after the in-memory collection is updated and before the
//! persistence timer is (re)scheduled. Subscribing returns a
//! [`SubscriptionId`] token that unsubscribes later.

use std::sync::Arc;

use uuid::Uuid;

/// A change to the store's collection.
#[derive(Debug, Clone)]
pub enum StoreEvent<R> {
    /// A record was added.
    Added(R),
    /// A record was replaced in place.
    Updated(R),
    /// The record with this id was removed.
    Removed(Uuid),
    /// The whole collection was emptied.
    Cleared,
}

/// Token returned by `subscribe`; pass to `unsubscribe` to detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub(crate) type Callback<R> = Arc<dyn Fn(&StoreEvent<R>) + Send + Sync>;

/// The registered subscriber callbacks of one store.
pub(crate) struct SubscriberSet<R> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback<R>)>,
}

impl<R> SubscriberSet<R> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn subscribe(&mut self, callback: Callback<R>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Clone out the current callbacks so they can be invoked without
    /// holding the registry lock (a callback may subscribe or mutate).
    pub(crate) fn callbacks(&self) -> Vec<Callback<R>> {
        self.entries.iter().map(|(_, callback)| callback.clone()).collect()
    }
}
