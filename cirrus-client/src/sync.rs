//! ResourceSynchronizer - read-through view of one cached listing
//!
//! A synchronizer binds a [`ResourceStore`] entry to a [`ResourceFetcher`].
//! Reads never wait: they return whatever the store holds, starting with the
//! caller's initial snapshot. Refreshes run on tokio tasks and land in the
//! store when they finish. Local additions are prepended immediately and then
//! the whole resource namespace is invalidated, so every live synchronizer
//! with fetching enabled reconciles its own key against the server.

use std::fmt;
use std::sync::{Arc, Weak};

use cirrus_model::{
    CacheKey, MediaResource, RESOURCES_NAMESPACE, ResourceCollection,
};
use log::{debug, warn};

use crate::fetcher::ResourceFetcher;
use crate::store::{
    InvalidationScope, ResourceStore, StoreEvent, SubscriptionId,
};

/// Construction options for [`ResourceSynchronizer`].
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Snapshot shown until the first refresh lands. Ignored when the store
    /// already holds data for the key.
    pub initial_resources: Option<ResourceCollection>,
    pub tag: Option<String>,
    /// Never contact the fetcher, not even after an invalidation.
    pub disable_fetch: bool,
}

impl SyncOptions {
    pub fn new(initial_resources: impl Into<ResourceCollection>) -> Self {
        Self {
            initial_resources: Some(initial_resources.into()),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn disable_fetch(mut self, disable: bool) -> Self {
        self.disable_fetch = disable;
        self
    }
}

struct SyncInner {
    store: Arc<ResourceStore>,
    fetcher: Arc<dyn ResourceFetcher>,
    key: CacheKey,
    disable_fetch: bool,
}

impl SyncInner {
    async fn refresh(&self) -> bool {
        if self.disable_fetch {
            return false;
        }

        let Some(ticket) = self.store.begin_fetch(&self.key) else {
            debug!("[ResourceSync] Refresh for {} already running", self.key);
            return false;
        };

        match self.fetcher.fetch(self.key.tag()).await {
            Ok(collection) => {
                let count = collection.len();
                let landed = self.store.complete_fetch(ticket, collection);
                if landed {
                    debug!(
                        "[ResourceSync] Refreshed {} ({} resources)",
                        self.key, count
                    );
                } else {
                    debug!(
                        "[ResourceSync] Dropped superseded refresh for {}",
                        self.key
                    );
                }
                landed
            }
            Err(err) => {
                warn!(
                    "[ResourceSync] Refresh for {} failed, keeping cached data: {}",
                    self.key, err
                );
                self.store.fail_fetch(ticket, err.to_string());
                false
            }
        }
    }
}

fn spawn_refresh(inner: &Arc<SyncInner>) {
    if inner.disable_fetch {
        return;
    }

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            let inner = Arc::clone(inner);
            handle.spawn(async move {
                inner.refresh().await;
            });
        }
        Err(_) => warn!(
            "[ResourceSync] No tokio runtime; skipping refresh for {}",
            inner.key
        ),
    }
}

/// Client-side view of the resource listing for one tag.
pub struct ResourceSynchronizer {
    inner: Arc<SyncInner>,
    subscription: SubscriptionId,
}

impl fmt::Debug for ResourceSynchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceSynchronizer")
            .field("key", &self.inner.key)
            .field("disable_fetch", &self.inner.disable_fetch)
            .field("fetcher", &self.inner.fetcher)
            .finish()
    }
}

impl ResourceSynchronizer {
    /// Seeds the store with the initial snapshot and, unless fetching is
    /// disabled, starts a background refresh. Fetching requires a tokio
    /// runtime; without one the refresh is skipped with a warning.
    pub fn new(
        store: Arc<ResourceStore>,
        fetcher: Arc<dyn ResourceFetcher>,
        options: SyncOptions,
    ) -> Self {
        let SyncOptions {
            initial_resources,
            tag,
            disable_fetch,
        } = options;
        let key = CacheKey::resources(tag);

        store.seed(key.clone(), initial_resources.unwrap_or_default());

        let inner = Arc::new(SyncInner {
            store,
            fetcher,
            key: key.clone(),
            disable_fetch,
        });

        let weak: Weak<SyncInner> = Arc::downgrade(&inner);
        let subscription = inner.store.subscribe(key, move |event| {
            if let StoreEvent::Invalidated { .. } = event
                && let Some(inner) = weak.upgrade()
            {
                spawn_refresh(&inner);
            }
        });

        spawn_refresh(&inner);

        Self {
            inner,
            subscription,
        }
    }

    pub fn key(&self) -> &CacheKey {
        &self.inner.key
    }

    pub fn tag(&self) -> Option<&str> {
        self.inner.key.tag()
    }

    pub fn store(&self) -> &Arc<ResourceStore> {
        &self.inner.store
    }

    /// Current best-known collection. Never waits on a refresh.
    pub fn resources(&self) -> Arc<ResourceCollection> {
        self.inner.store.get(&self.inner.key).unwrap_or_default()
    }

    pub fn is_fetching(&self) -> bool {
        self.inner.store.is_fetching(&self.inner.key)
    }

    /// Starts a background refresh unless fetching is disabled or one is
    /// already running.
    pub fn refresh(&self) {
        spawn_refresh(&self.inner);
    }

    /// Refreshes in the caller's task. Returns whether fresh data landed.
    pub async fn refresh_now(&self) -> bool {
        self.inner.refresh().await
    }

    /// Prepends `added` to this key's collection and returns the result, then
    /// invalidates every resource listing so live synchronizers refetch.
    pub fn add_resources(
        &self,
        added: Vec<MediaResource>,
    ) -> Arc<ResourceCollection> {
        let count = added.len();
        let updated = self
            .inner
            .store
            .update(self.inner.key.clone(), |current| current.prepend(added));

        debug!(
            "[ResourceSync] Added {} resources to {} ({} total)",
            count,
            self.inner.key,
            updated.len()
        );

        self.inner
            .store
            .invalidate(&InvalidationScope::Namespace(RESOURCES_NAMESPACE));
        updated
    }

    /// Observes store events for this synchronizer's key.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.inner.store.subscribe(self.inner.key.clone(), callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.store.unsubscribe(id)
    }
}

impl Drop for ResourceSynchronizer {
    fn drop(&mut self) {
        self.inner.store.unsubscribe(self.subscription);
    }
}
