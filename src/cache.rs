//! # Loader-backed LRU page cache
//!
//! Memoization layer over an arbitrary, caller-supplied page loader: cached
//! lookups are O(1), misses call the loader, and the least-recently-used page
//! is evicted once the fixed capacity is reached.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                        PageCache                             │
//!   │                                                              │
//!   │   ┌──────────────────────────────────────────────────────┐   │
//!   │   │  ChainIndex (key ─► SlotId, non-owning)              │   │
//!   │   │  ┌─────────┬──────────────────────────────────┐      │   │
//!   │   │  │ "page1" │ ────────────────────────────┐    │      │   │
//!   │   │  │ "page2" │ ──────────────────────┐     │    │      │   │
//!   │   │  └─────────┴──────────────────────┼─────┼────┘      │   │
//!   │   └─────────────────────────────────────┼─────┼──────────┘   │
//!   │                                         ▼     ▼              │
//!   │   ┌──────────────────────────────────────────────────────┐   │
//!   │   │  RecencyList (owns nodes and their pages)            │   │
//!   │   │  head ──► [page2] ◄──► [page1] ◄── tail              │   │
//!   │   │           (MRU)        (LRU)                         │   │
//!   │   └──────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operation flow
//!
//! ```text
//!   get_or_load(key, loader)
//!   ═══════════════════════════════════════════════════════════════
//!   index lookup ──► HIT:  move node to list front, return its page
//!                └─► MISS: payload = loader(key)
//!                          if len == capacity:
//!                              delete tail key from index, pop tail
//!                          push new page to front, index key ─► node
//!                          return the new page
//! ```
//!
//! The only side effect of a hit is the recency promotion; the loader runs
//! exclusively on misses, synchronously, and fully blocks the call.
//!
//! ## Consistency
//!
//! Index and list never disagree: every mutation updates the list first or
//! last such that no intermediate state is observable through the public
//! surface, and `list.len() == index.len()` holds after every operation.
//! [`PageCache::check_invariants`] re-verifies this and tests call it after
//! every step.
//!
//! ## Thread safety
//!
//! Single-threaded by design. All mutation goes through `&mut self`, so the
//! borrow checker rules out concurrent access; wrap the cache externally if
//! shared ownership is ever required.

use crate::ds::chain_index::{ChainIndex, IndexStats};
use crate::ds::recency_list::RecencyList;
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::CacheMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::CacheMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder, MetricsSnapshotProvider,
};
use crate::page::{key_eq, Page};

/// Fixed-capacity LRU cache mapping string keys to loaded pages.
///
/// # Example
///
/// ```
/// use pagecache::cache::PageCache;
///
/// let mut cache = PageCache::try_new(2).unwrap();
///
/// let page = cache.get_or_load("a", |key| format!("payload:{key}"));
/// assert_eq!(page.payload(), "payload:a");
///
/// // Repeat hit: the loader does not run again.
/// let page = cache.get_or_load("a", |_| unreachable!());
/// assert_eq!(page.payload(), "payload:a");
///
/// cache.get_or_load("b", |key| format!("payload:{key}"));
/// cache.get_or_load("c", |key| format!("payload:{key}"));
/// assert!(!cache.contains("a")); // evicted as least recently used
/// ```
#[derive(Debug)]
pub struct PageCache {
    index: ChainIndex,
    list: RecencyList,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl PageCache {
    /// Creates a cache holding at most `capacity` pages.
    ///
    /// Zero capacity is a configuration error: no cache is produced.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        Ok(Self {
            index: ChainIndex::new(),
            list: RecencyList::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::new(),
        })
    }

    /// Returns the cached page for `key`, loading it on miss.
    ///
    /// On a hit the page is promoted to most recently used and the loader is
    /// not invoked. On a miss `loader` runs synchronously to produce the
    /// payload; if the cache is full the least recently used page is evicted
    /// first. The returned reference is a read-only view owned by the cache,
    /// valid until the next mutating call.
    pub fn get_or_load<F>(&mut self, key: &str, loader: F) -> &Page
    where
        F: FnOnce(&str) -> String,
    {
        let node = match self.index.get(key) {
            Some(node) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_hit();

                self.list.move_to_front(node);
                node
            }
            None => {
                #[cfg(feature = "metrics")]
                {
                    self.metrics.record_miss();
                    self.metrics.record_loader_call();
                }

                let payload = loader(key);
                if self.list.len() == self.capacity {
                    self.evict_lru();
                }

                #[cfg(feature = "metrics")]
                self.metrics.record_insert_new();

                let node = self.list.push_front(Page::new(key, payload));
                self.index.put(key, node);
                node
            }
        };

        self.list
            .get(node)
            .expect("index references a live recency-list node")
    }

    /// Number of resident pages; always equals the index entry count.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if no pages are resident.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Maximum number of resident pages.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if `key` is resident. Does not affect recency order.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains(key)
    }

    /// Returns the resident page for `key` without promoting it.
    pub fn peek(&self, key: &str) -> Option<&Page> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_call();

        let node = self.index.get(key)?;
        let page = self.list.get(node);

        #[cfg(feature = "metrics")]
        {
            if page.is_some() {
                self.metrics.record_peek_found();
            }
        }
        page
    }

    /// Promotes `key` to most recently used without returning its page.
    ///
    /// Returns `false` if the key is not resident.
    pub fn touch(&mut self, key: &str) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();

        match self.index.get(key) {
            Some(node) => {
                self.list.move_to_front(node);

                #[cfg(feature = "metrics")]
                self.metrics.record_touch_found();

                true
            }
            None => false,
        }
    }

    /// Returns the least recently used page without removing it.
    pub fn peek_lru(&self) -> Option<&Page> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lru_call();

        let page = self.list.back();

        #[cfg(feature = "metrics")]
        {
            if page.is_some() {
                self.metrics.record_peek_lru_found();
            }
        }
        page
    }

    /// Removes and returns the least recently used page.
    pub fn pop_lru(&mut self) -> Option<Page> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_call();

        let victim_key = self.list.back()?.key().to_owned();
        self.index.delete(&victim_key);
        let page = self.list.pop_back();

        #[cfg(feature = "metrics")]
        {
            if page.is_some() {
                self.metrics.record_pop_lru_found();
            }
        }
        page
    }

    /// Removes `key` and returns its page, if resident.
    pub fn remove(&mut self, key: &str) -> Option<Page> {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let node = self.index.get(key)?;
        self.index.delete(key);
        let page = self.list.remove(node);

        #[cfg(feature = "metrics")]
        {
            if page.is_some() {
                self.metrics.record_remove_found();
            }
        }
        page
    }

    /// Drops every resident page.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();

        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Verifies the cross-structure invariant.
    ///
    /// The recency list and the chain index must agree on length, and every
    /// resident page's key must resolve through the index to the node that
    /// holds that exact page. Intended for tests and debugging; correct
    /// operation can never make this fail.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.list.len() != self.index.len() {
            return Err(InvariantError::new(format!(
                "recency list holds {} pages but index holds {} entries",
                self.list.len(),
                self.index.len()
            )));
        }
        if self.list.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} resident pages exceed capacity {}",
                self.list.len(),
                self.capacity
            )));
        }

        let mut walked = 0usize;
        for page in self.list.iter() {
            walked += 1;
            if walked > self.list.len() {
                return Err(InvariantError::new("recency list walk exceeds its length"));
            }
            let node = match self.index.get(page.key()) {
                Some(node) => node,
                None => {
                    return Err(InvariantError::new(format!(
                        "resident page key {:?} is not indexed",
                        page.key()
                    )));
                }
            };
            match self.list.get(node) {
                Some(indexed) if key_eq(indexed.key(), page.key()) => {}
                Some(indexed) => {
                    return Err(InvariantError::new(format!(
                        "index entry {:?} resolves to a node holding {:?}",
                        page.key(),
                        indexed.key()
                    )));
                }
                None => {
                    return Err(InvariantError::new(format!(
                        "index entry {:?} references a dead node",
                        page.key()
                    )));
                }
            }
        }
        if walked != self.list.len() {
            return Err(InvariantError::new(format!(
                "recency list walk visited {} nodes, counter says {}",
                walked,
                self.list.len()
            )));
        }
        Ok(())
    }

    /// Snapshots the chain index's entry/bucket/resize counters.
    pub fn index_stats(&self) -> IndexStats {
        self.index.stats()
    }

    /// Evicts the current tail: index entry first, then the node itself.
    fn evict_lru(&mut self) {
        let victim_key = match self.list.back() {
            Some(page) => page.key().to_owned(),
            None => return,
        };
        self.index.delete(&victim_key);
        self.list.pop_back();

        #[cfg(feature = "metrics")]
        self.metrics.record_evict();
    }
}

#[cfg(feature = "metrics")]
impl MetricsSnapshotProvider<CacheMetricsSnapshot> for PageCache {
    fn snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            hits: self.metrics.hits,
            misses: self.metrics.misses,
            loader_calls: self.metrics.loader_calls,
            insert_new: self.metrics.insert_new,
            evictions: self.metrics.evictions,
            touch_calls: self.metrics.touch_calls,
            touch_found: self.metrics.touch_found,
            pop_lru_calls: self.metrics.pop_lru_calls,
            pop_lru_found: self.metrics.pop_lru_found,
            remove_calls: self.metrics.remove_calls,
            remove_found: self.metrics.remove_found,
            clears: self.metrics.clears,
            peek_calls: self.metrics.peek_calls.get(),
            peek_found: self.metrics.peek_found.get(),
            peek_lru_calls: self.metrics.peek_lru_calls.get(),
            peek_lru_found: self.metrics.peek_lru_found.get(),
            cache_len: self.list.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn payload_for(key: &str) -> String {
        format!("payload:{key}")
    }

    #[test]
    fn zero_capacity_is_a_config_error() {
        let err = PageCache::try_new(0).unwrap_err();
        assert!(err.message().contains("capacity"));
    }

    #[test]
    fn miss_loads_and_hit_serves_cached() {
        let mut cache = PageCache::try_new(4).unwrap();
        let loads = Cell::new(0u32);

        let page = cache.get_or_load("a", |key| {
            loads.set(loads.get() + 1);
            payload_for(key)
        });
        assert_eq!(page.key(), "a");
        assert_eq!(page.payload(), "payload:a");
        assert_eq!(loads.get(), 1);

        let page = cache.get_or_load("a", |key| {
            loads.set(loads.get() + 1);
            payload_for(key)
        });
        assert_eq!(page.payload(), "payload:a");
        assert_eq!(loads.get(), 1);
        assert_eq!(cache.len(), 1);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn full_cache_evicts_least_recently_used() {
        let mut cache = PageCache::try_new(3).unwrap();
        for key in ["k0", "k1", "k2", "k3"] {
            cache.get_or_load(key, payload_for);
        }

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains("k0"));
        assert!(cache.contains("k1"));
        assert!(cache.contains("k2"));
        assert!(cache.contains("k3"));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn hit_promotion_changes_the_eviction_victim() {
        let mut cache = PageCache::try_new(2).unwrap();
        cache.get_or_load("a", payload_for);
        cache.get_or_load("b", payload_for);

        // "a" becomes MRU, so inserting "c" evicts "b".
        cache.get_or_load("a", payload_for);
        cache.get_or_load("c", payload_for);

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn peek_and_contains_do_not_promote() {
        let mut cache = PageCache::try_new(2).unwrap();
        cache.get_or_load("a", payload_for);
        cache.get_or_load("b", payload_for);

        assert_eq!(cache.peek("a").map(Page::payload), Some("payload:a"));
        assert!(cache.contains("a"));

        // "a" is still LRU, so it is the eviction victim.
        cache.get_or_load("c", payload_for);
        assert!(!cache.contains("a"));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn touch_promotes_without_loading() {
        let mut cache = PageCache::try_new(2).unwrap();
        cache.get_or_load("a", payload_for);
        cache.get_or_load("b", payload_for);

        assert!(cache.touch("a"));
        assert!(!cache.touch("missing"));

        cache.get_or_load("c", payload_for);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn pop_lru_removes_the_tail() {
        let mut cache = PageCache::try_new(3).unwrap();
        cache.get_or_load("a", payload_for);
        cache.get_or_load("b", payload_for);

        assert_eq!(cache.peek_lru().map(Page::key), Some("a"));
        let popped = cache.pop_lru().unwrap();
        assert_eq!(popped.key(), "a");
        assert_eq!(cache.len(), 1);
        assert!(!cache.contains("a"));
        cache.check_invariants().unwrap();

        cache.pop_lru();
        assert!(cache.pop_lru().is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn remove_deletes_exactly_one_entry() {
        let mut cache = PageCache::try_new(4).unwrap();
        for key in ["a", "b", "c"] {
            cache.get_or_load(key, payload_for);
        }

        let removed = cache.remove("b").unwrap();
        assert_eq!(removed.key(), "b");
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("b"));
        assert!(cache.remove("b").is_none());
        cache.check_invariants().unwrap();
    }

    #[test]
    fn removed_key_is_reloaded_on_next_access() {
        let mut cache = PageCache::try_new(4).unwrap();
        let loads = Cell::new(0u32);
        let counting = |key: &str| {
            loads.set(loads.get() + 1);
            payload_for(key)
        };

        cache.get_or_load("a", counting);
        cache.remove("a");
        cache.get_or_load("a", counting);
        assert_eq!(loads.get(), 2);
    }

    #[test]
    fn clear_resets_everything() {
        let mut cache = PageCache::try_new(4).unwrap();
        for key in ["a", "b", "c"] {
            cache.get_or_load(key, payload_for);
        }
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert!(!cache.contains("a"));
        cache.check_invariants().unwrap();

        cache.get_or_load("a", payload_for);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn capacity_one_thrashes_correctly() {
        let mut cache = PageCache::try_new(1).unwrap();
        cache.get_or_load("a", payload_for);
        cache.get_or_load("b", payload_for);
        assert_eq!(cache.len(), 1);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        cache.check_invariants().unwrap();
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_track_hits_misses_and_evictions() {
        use crate::metrics::traits::MetricsSnapshotProvider;

        let mut cache = PageCache::try_new(2).unwrap();
        cache.get_or_load("a", payload_for);
        cache.get_or_load("a", payload_for);
        cache.get_or_load("b", payload_for);
        cache.get_or_load("c", payload_for); // evicts "a"

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.misses, 3);
        assert_eq!(snapshot.loader_calls, 3);
        assert_eq!(snapshot.evictions, 1);
        assert_eq!(snapshot.cache_len, 2);
        assert_eq!(snapshot.capacity, 2);
        assert_eq!(snapshot.hit_rate(), Some(0.25));
    }
}
