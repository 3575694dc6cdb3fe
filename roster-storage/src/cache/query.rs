//! Read cache keyed by [`QueryKey`].
//!
//! Each key owns a slot that is filled at most once. Callers that arrive
//! while the slot is being filled wait on the same fetch instead of issuing
//! their own. Invalidation removes slots from the map under the lock, so any
//! read that starts afterwards creates a fresh slot and fetches again; a fetch
//! that was already running completes for its own waiters but is never
//! visible to later readers.

use super::key::{QueryKey, QueryPrefix};
use super::stats::{CacheStats, StatsCounters};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;

type Slot<V> = Arc<OnceCell<Arc<V>>>;

pub struct QueryCache<V> {
    slots: Mutex<HashMap<QueryKey, Slot<V>>>,
    stats: StatsCounters,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            stats: StatsCounters::default(),
        }
    }
}

impl<V> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// Failed fetches are not cached; the next call for the key fetches again.
    pub async fn query<F, Fut, E>(&self, key: &QueryKey, fetch: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(key);

        if let Some(value) = slot.get() {
            self.stats.record_hit();
            tracing::trace!(%key, "query cache hit");
            return Ok(Arc::clone(value));
        }

        let mut fetched = false;
        let result = slot
            .get_or_try_init(|| {
                fetched = true;
                let pending = fetch();
                async move { pending.await.map(Arc::new) }
            })
            .await
            .map(Arc::clone);

        match &result {
            Ok(_) if fetched => {
                self.stats.record_miss();
                tracing::debug!(%key, "query cache filled");
            }
            Ok(_) => {
                self.stats.record_deduplicated();
                tracing::debug!(%key, "joined in-flight fetch");
            }
            Err(_) => {
                self.discard_empty(key, &slot);
                tracing::debug!(%key, "query fetch failed; nothing cached");
            }
        }
        result
    }

    /// Mark every key under `prefix` stale. Returns how many were dropped.
    pub fn invalidate(&self, prefix: impl Into<QueryPrefix>) -> usize {
        let prefix = prefix.into();
        let removed = {
            let mut slots = self.lock();
            let before = slots.len();
            slots.retain(|key, _| !key.matches(&prefix));
            before - slots.len()
        };
        self.stats.record_invalidation();
        tracing::debug!(%prefix, removed, "query cache invalidated");
        removed
    }

    /// Drop everything, e.g. when the signed-in user changes.
    pub fn invalidate_all(&self) -> usize {
        let removed = {
            let mut slots = self.lock();
            let count = slots.len();
            slots.clear();
            count
        };
        self.stats.record_invalidation();
        tracing::debug!(removed, "query cache cleared");
        removed
    }

    /// The cached value for `key`, without fetching.
    pub fn peek(&self, key: &QueryKey) -> Option<Arc<V>> {
        self.lock()
            .get(key)
            .and_then(|slot| slot.get().map(Arc::clone))
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.peek(key).is_some()
    }

    /// Number of keys holding a resolved value.
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    fn slot(&self, key: &QueryKey) -> Slot<V> {
        let mut slots = self.lock();
        Arc::clone(
            slots
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new())),
        )
    }

    fn discard_empty(&self, key: &QueryKey, slot: &Slot<V>) {
        let mut slots = self.lock();
        let same_empty_slot = slots
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && !current.initialized());
        if same_empty_slot {
            slots.remove(key);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Slot<V>>> {
        // Slots stay consistent even if a holder panicked: every mutation is a
        // single insert/remove/retain.
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
