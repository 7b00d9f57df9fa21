//! Replay-latest observable primitive backing every store.
//!
//! Each store owns a `Subject`: the last-published snapshot plus a map of
//! subscriber callbacks. A new subscriber is handed the current snapshot
//! immediately; every publish then notifies all subscribers synchronously
//! in subscription order.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Handle identifying one subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    latest: T,
    next_id: u64,
    // BTreeMap keyed by a monotonically increasing id keeps iteration in
    // subscription order.
    subscribers: BTreeMap<u64, Callback<T>>,
}

pub struct Subject<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Subject<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                latest: initial,
                next_id: 0,
                subscribers: BTreeMap::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // Callbacks run outside the lock, so a poisoned mutex can only mean a
        // panic in trivial bookkeeping; the data is still coherent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a clone of the last-published snapshot.
    #[must_use]
    pub fn latest(&self) -> T {
        self.lock().latest.clone()
    }

    /// Registers `callback` and immediately replays the latest snapshot to it.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let callback: Callback<T> = Arc::new(callback);
        let (id, snapshot) = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.insert(id, Arc::clone(&callback));
            (id, inner.latest.clone())
        };
        callback(&snapshot);
        SubscriptionId(id)
    }

    /// Removes a subscription; unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().subscribers.remove(&id.0);
    }

    /// Stores `value` as the latest snapshot and notifies every subscriber
    /// synchronously, in subscription order.
    pub fn publish(&self, value: T) {
        let callbacks: Vec<Callback<T>> = {
            let mut inner = self.lock();
            inner.latest = value.clone();
            inner.subscribers.values().cloned().collect()
        };
        for callback in callbacks {
            callback(&value);
        }
    }
}
