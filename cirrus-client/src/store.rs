//! ResourceStore - shared cache of resource collections
//!
//! One store is created per UI session (or per test) and handed to every
//! synchronizer that needs it. Collections are keyed by [`CacheKey`]; readers
//! always receive a whole `Arc<ResourceCollection>` snapshot, so a partially
//! merged list is never observable.
//!
//! Change notification is explicit: consumers register a callback for a key
//! and receive [`StoreEvent`]s after the store's locks have been released.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use cirrus_model::{CacheKey, ResourceCollection};
use parking_lot::RwLock;

/// Freshness of a cached collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    /// Only the caller-supplied snapshot is known.
    Initial,
    /// Last written by a successful refresh or a local write.
    Fresh,
    /// Invalidated; a refetch is due.
    Stale,
}

/// Notification delivered to subscribers of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Updated { key: CacheKey, len: usize },
    Invalidated { key: CacheKey },
    RefreshFailed { key: CacheKey, error: String },
}

impl StoreEvent {
    pub fn key(&self) -> &CacheKey {
        match self {
            StoreEvent::Updated { key, .. }
            | StoreEvent::Invalidated { key }
            | StoreEvent::RefreshFailed { key, .. } => key,
        }
    }
}

/// Which entries an invalidation touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationScope {
    Exact(CacheKey),
    /// Every key under the namespace, whatever its tag.
    Namespace(&'static str),
}

impl InvalidationScope {
    fn covers(&self, key: &CacheKey) -> bool {
        match self {
            InvalidationScope::Exact(exact) => exact == key,
            InvalidationScope::Namespace(namespace) => {
                key.shares_namespace(namespace)
            }
        }
    }
}

/// Handle returned by [`ResourceStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Proof that a refresh was started. A ticket goes stale when its key is
/// invalidated, and a stale ticket's result is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: CacheKey,
    epoch: u64,
}

impl FetchTicket {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }
}

type Callback = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

struct Subscriber {
    key: CacheKey,
    callback: Callback,
}

#[derive(Debug, Clone)]
struct Entry {
    collection: Arc<ResourceCollection>,
    state: EntryState,
    updated_at: Instant,
}

impl Entry {
    fn new(collection: ResourceCollection, state: EntryState) -> Self {
        Self {
            collection: Arc::new(collection),
            state,
            updated_at: Instant::now(),
        }
    }
}

/// Shared cache of resource collections, one entry per [`CacheKey`].
#[derive(Default)]
pub struct ResourceStore {
    entries: RwLock<HashMap<CacheKey, Entry>>,
    in_flight: RwLock<HashMap<CacheKey, u64>>,
    subscribers: RwLock<HashMap<SubscriptionId, Subscriber>>,
    next_subscription: AtomicU64,
    next_epoch: AtomicU64,
}

impl fmt::Debug for ResourceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceStore")
            .field("entries", &self.entries.read().len())
            .field("in_flight", &self.in_flight.read().len())
            .field("subscribers", &self.subscribers.read().len())
            .finish()
    }
}

impl ResourceStore {
    /// Empty store. Share it between synchronizers with an `Arc`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot for `key`, if any.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<ResourceCollection>> {
        self.entries
            .read()
            .get(key)
            .map(|entry| Arc::clone(&entry.collection))
    }

    /// Whether `key` holds data, even if stale.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Freshness of the entry for `key`.
    pub fn state(&self, key: &CacheKey) -> Option<EntryState> {
        self.entries.read().get(key).map(|entry| entry.state)
    }

    /// When the entry was last written.
    pub fn updated_at(&self, key: &CacheKey) -> Option<Instant> {
        self.entries.read().get(key).map(|entry| entry.updated_at)
    }

    /// Keys holding data, sorted.
    pub fn keys(&self) -> Vec<CacheKey> {
        let mut keys: Vec<_> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Installs `collection` as the initial snapshot for `key` unless the key
    /// already holds data. Returns whether the snapshot was used.
    pub fn seed(&self, key: CacheKey, collection: ResourceCollection) -> bool {
        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, Entry::new(collection, EntryState::Initial));
        true
    }

    /// Replaces the collection for `key` wholesale. A refresh already running
    /// for `key` is superseded and its result will be dropped.
    pub fn set(
        &self,
        key: CacheKey,
        collection: ResourceCollection,
    ) -> Arc<ResourceCollection> {
        let snapshot = {
            let mut entries = self.entries.write();
            self.in_flight.write().remove(&key);
            let entry = Entry::new(collection, EntryState::Fresh);
            let snapshot = Arc::clone(&entry.collection);
            entries.insert(key.clone(), entry);
            snapshot
        };

        self.notify(&StoreEvent::Updated {
            len: snapshot.len(),
            key,
        });
        snapshot
    }

    /// Replaces the collection for `key` with `f(current)`. A missing entry
    /// reads as an empty collection. Like [`ResourceStore::set`], the write
    /// supersedes any refresh already running for `key`.
    pub fn update<F>(&self, key: CacheKey, f: F) -> Arc<ResourceCollection>
    where
        F: FnOnce(&ResourceCollection) -> ResourceCollection,
    {
        let snapshot = {
            let mut entries = self.entries.write();
            // Lock order: entries, then in_flight.
            self.in_flight.write().remove(&key);
            let next = match entries.get(&key) {
                Some(entry) => f(&entry.collection),
                None => f(&ResourceCollection::new()),
            };
            let entry = Entry::new(next, EntryState::Fresh);
            let snapshot = Arc::clone(&entry.collection);
            entries.insert(key.clone(), entry);
            snapshot
        };

        self.notify(&StoreEvent::Updated {
            len: snapshot.len(),
            key,
        });
        snapshot
    }

    /// Marks every entry covered by `scope` as stale, supersedes refreshes
    /// already running for those keys, and tells their subscribers. Keys that
    /// only have subscribers (no data yet) are included.
    pub fn invalidate(&self, scope: &InvalidationScope) -> Vec<CacheKey> {
        let mut touched: Vec<CacheKey> = {
            let mut entries = self.entries.write();
            entries
                .iter_mut()
                .filter(|(key, _)| scope.covers(key))
                .map(|(key, entry)| {
                    entry.state = EntryState::Stale;
                    key.clone()
                })
                .collect()
        };

        for subscriber in self.subscribers.read().values() {
            if scope.covers(&subscriber.key) && !touched.contains(&subscriber.key)
            {
                touched.push(subscriber.key.clone());
            }
        }
        touched.sort();

        {
            let mut in_flight = self.in_flight.write();
            in_flight.retain(|key, _| !scope.covers(key));
        }

        for key in &touched {
            self.notify(&StoreEvent::Invalidated { key: key.clone() });
        }
        touched
    }

    /// Registers `callback` for events on `key`.
    pub fn subscribe<F>(&self, key: CacheKey, callback: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(
            self.next_subscription.fetch_add(1, Ordering::Relaxed),
        );
        self.subscribers.write().insert(
            id,
            Subscriber {
                key,
                callback: Arc::new(callback),
            },
        );
        id
    }

    /// Removes a subscription. Returns `false` for an unknown id.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.write().remove(&id).is_some()
    }

    /// Number of live subscriptions on `key`.
    pub fn subscriber_count(&self, key: &CacheKey) -> usize {
        self.subscribers
            .read()
            .values()
            .filter(|subscriber| &subscriber.key == key)
            .count()
    }

    /// Claims the right to refresh `key`. Returns `None` while another
    /// refresh for the same key is still current.
    pub fn begin_fetch(&self, key: &CacheKey) -> Option<FetchTicket> {
        let mut in_flight = self.in_flight.write();
        if in_flight.contains_key(key) {
            return None;
        }
        let epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed);
        in_flight.insert(key.clone(), epoch);
        Some(FetchTicket {
            key: key.clone(),
            epoch,
        })
    }

    /// Whether a current refresh holds the ticket for `key`.
    pub fn is_fetching(&self, key: &CacheKey) -> bool {
        self.in_flight.read().contains_key(key)
    }

    /// Stores a refresh result. Returns `false` and leaves the entry alone
    /// when the ticket was superseded by a local write or an invalidation.
    pub fn complete_fetch(
        &self,
        ticket: FetchTicket,
        collection: ResourceCollection,
    ) -> bool {
        let snapshot = {
            let mut entries = self.entries.write();
            if !self.release(&ticket) {
                return false;
            }
            let entry = Entry::new(collection, EntryState::Fresh);
            let snapshot = Arc::clone(&entry.collection);
            entries.insert(ticket.key.clone(), entry);
            snapshot
        };

        self.notify(&StoreEvent::Updated {
            len: snapshot.len(),
            key: ticket.key,
        });
        true
    }

    /// Records a failed refresh. The cached collection is kept as is.
    pub fn fail_fetch(&self, ticket: FetchTicket, error: impl Into<String>) {
        if !self.release(&ticket) {
            return;
        }
        self.notify(&StoreEvent::RefreshFailed {
            key: ticket.key,
            error: error.into(),
        });
    }

    fn release(&self, ticket: &FetchTicket) -> bool {
        let mut in_flight = self.in_flight.write();
        match in_flight.get(&ticket.key) {
            Some(epoch) if *epoch == ticket.epoch => {
                in_flight.remove(&ticket.key);
                true
            }
            _ => false,
        }
    }

    fn notify(&self, event: &StoreEvent) {
        let callbacks: Vec<Callback> = self
            .subscribers
            .read()
            .values()
            .filter(|subscriber| &subscriber.key == event.key())
            .map(|subscriber| Arc::clone(&subscriber.callback))
            .collect();

        for callback in callbacks {
            callback(event);
        }
    }
}
