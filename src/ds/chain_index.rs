//! Chained hash index mapping page keys to recency-list node ids.
//!
//! An open-chained hash table specialized for the page cache: buckets hold
//! singly linked chains of entries, each entry owning a copy of its key and
//! carrying the `SlotId` of a node that lives in the recency list. The index
//! never owns nodes; it is resynchronized by the cache on every insert and
//! eviction.
//!
//! ## Architecture
//!
//! ```text
//!   buckets: Vec<Option<SlotId>>        entries: SlotArena<IndexEntry>
//!   ┌─────┬──────────┐                  ┌────────┬─────────────────────────┐
//!   │  0  │ Some(e2) │ ───────────────► │  e2    │ { "b", node_9, next: e0}│
//!   │  1  │ None     │                  │  e0    │ { "a", node_4, None }   │
//!   │  2  │ Some(e1) │ ───────────────► │  e1    │ { "c", node_7, None }   │
//!   └─────┴──────────┘                  └────────┴─────────────────────────┘
//!
//!   bucket = djb2(key) % buckets.len()
//! ```
//!
//! ## Behavior
//! - `put`: overwrite in place on duplicate key, else prepend to the bucket
//!   chain; a fresh table allocates exactly one bucket first.
//! - `delete`: one unlink operation parameterized by predecessor tracking
//!   covers the sole-member, chain-head, and mid/tail cases.
//! - Resize: full rehash after every successful put/delete once the table
//!   holds more than one entry. Load above 1.0 doubles the bucket array,
//!   load below 0.25 halves it (floor of one bucket); entries are re-chained
//!   by id, their key and node fields untouched. Deleting the last entry
//!   releases the bucket array entirely.
//!
//! ## Performance
//! - `get` / `put` / `delete`: O(1) average, O(chain) worst case; the load
//!   factor band keeps expected chain length at or below one.
//! - Resize: O(entries) when triggered.

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::page::{key_eq, key_hash};

/// Load factor above which the bucket array doubles.
const GROW_LOAD_FACTOR: f64 = 1.0;
/// Load factor below which the bucket array halves.
const SHRINK_LOAD_FACTOR: f64 = 0.25;

#[derive(Debug)]
struct IndexEntry {
    key: String,
    node: SlotId,
    next: Option<SlotId>,
}

/// Counters exposed for tests and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Live entries (distinct keys).
    pub entries: usize,
    /// Current bucket count; zero on an empty table.
    pub buckets: usize,
    /// Times the bucket array doubled.
    pub grows: u64,
    /// Times the bucket array halved.
    pub shrinks: u64,
}

/// Chained hash index over page keys.
///
/// Stored `SlotId`s are opaque to the index; they reference nodes owned by
/// the recency list.
#[derive(Debug)]
pub struct ChainIndex {
    entries: SlotArena<IndexEntry>,
    buckets: Vec<Option<SlotId>>,
    grows: u64,
    shrinks: u64,
}

impl ChainIndex {
    /// Creates an empty index with no buckets allocated.
    pub fn new() -> Self {
        Self {
            entries: SlotArena::new(),
            buckets: Vec::new(),
            grows: 0,
            shrinks: 0,
        }
    }

    /// Returns the number of distinct keys indexed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no keys are indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the current bucket count (zero for an empty table).
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Snapshots entry/bucket/resize counters.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            entries: self.entries.len(),
            buckets: self.buckets.len(),
            grows: self.grows,
            shrinks: self.shrinks,
        }
    }

    /// Looks up the node id stored for `key`.
    ///
    /// An empty table answers without touching the bucket array.
    pub fn get(&self, key: &str) -> Option<SlotId> {
        if self.entries.is_empty() {
            return None;
        }
        let bucket = self.bucket_of(key);
        let (_, entry_id) = self.find_in_bucket(bucket, key)?;
        self.entries.get(entry_id).map(|entry| entry.node)
    }

    /// Returns `true` if `key` is indexed.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Maps `key` to `node`.
    ///
    /// If the key is already present its stored node id is overwritten in
    /// place: no duplicate entry is created and the entry count is unchanged.
    /// Otherwise a new entry owning a copy of the key is prepended to its
    /// bucket chain and the resize check runs.
    pub fn put(&mut self, key: &str, node: SlotId) {
        if self.buckets.is_empty() {
            // Fresh table: exactly one bucket before the first insert.
            self.buckets.push(None);
        }

        let bucket = self.bucket_of(key);
        if let Some((_, entry_id)) = self.find_in_bucket(bucket, key) {
            if let Some(entry) = self.entries.get_mut(entry_id) {
                entry.node = node;
            }
            return;
        }

        let head = self.buckets[bucket];
        let entry_id = self.entries.insert(IndexEntry {
            key: key.to_owned(),
            node,
            next: head,
        });
        self.buckets[bucket] = Some(entry_id);
        self.maybe_resize();
    }

    /// Removes `key` from the index; returns `false` if it was absent.
    ///
    /// Deleting the last entry releases the bucket array so a later resize
    /// check never reads a stale empty table.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let bucket = self.bucket_of(key);
        let (prev, entry_id) = match self.find_in_bucket(bucket, key) {
            Some(found) => found,
            None => return false,
        };
        self.unlink(bucket, prev, entry_id);

        if self.entries.is_empty() {
            self.buckets = Vec::new();
        } else {
            self.maybe_resize();
        }
        true
    }

    /// Drops every entry and releases the bucket array.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.buckets = Vec::new();
    }

    fn bucket_of(&self, key: &str) -> usize {
        (key_hash(key) % self.buckets.len() as u64) as usize
    }

    /// Scans one bucket chain for `key`, tracking the predecessor entry.
    ///
    /// Returns `(prev, entry)` ids; `prev` is `None` when the entry heads
    /// its chain.
    fn find_in_bucket(&self, bucket: usize, key: &str) -> Option<(Option<SlotId>, SlotId)> {
        let mut prev = None;
        let mut cursor = self.buckets[bucket];
        while let Some(entry_id) = cursor {
            let entry = self.entries.get(entry_id)?;
            if key_eq(&entry.key, key) {
                return Some((prev, entry_id));
            }
            prev = Some(entry_id);
            cursor = entry.next;
        }
        None
    }

    /// Unlinks one entry from its bucket chain and frees it.
    ///
    /// The predecessor parameter collapses the sole-member, chain-head, and
    /// mid/tail cases into a single removal.
    fn unlink(&mut self, bucket: usize, prev: Option<SlotId>, entry_id: SlotId) -> Option<()> {
        let next = self.entries.get(entry_id)?.next;
        match prev {
            Some(prev_id) => {
                if let Some(prev_entry) = self.entries.get_mut(prev_id) {
                    prev_entry.next = next;
                }
            }
            None => self.buckets[bucket] = next,
        }
        self.entries.remove(entry_id);
        Some(())
    }

    /// Applies the load-factor policy; meaningless below two entries.
    fn maybe_resize(&mut self) {
        if self.entries.len() <= 1 {
            return;
        }
        let load = self.entries.len() as f64 / self.buckets.len() as f64;
        if load > GROW_LOAD_FACTOR {
            self.grows += 1;
            self.rehash(self.buckets.len() * 2);
        } else if load < SHRINK_LOAD_FACTOR && self.buckets.len() > 1 {
            self.shrinks += 1;
            self.rehash(self.buckets.len() / 2);
        }
    }

    /// Re-chains every entry against `new_bucket_count` buckets.
    ///
    /// Entries are relocated by id: only their chain links change, key and
    /// node fields are untouched.
    fn rehash(&mut self, new_bucket_count: usize) {
        let placements: Vec<(SlotId, usize)> = self
            .entries
            .iter()
            .map(|(entry_id, entry)| {
                let bucket = (key_hash(&entry.key) % new_bucket_count as u64) as usize;
                (entry_id, bucket)
            })
            .collect();

        let mut new_buckets = vec![None; new_bucket_count];
        for (entry_id, bucket) in placements {
            let head = new_buckets[bucket];
            if let Some(entry) = self.entries.get_mut(entry_id) {
                entry.next = head;
            }
            new_buckets[bucket] = Some(entry_id);
        }
        self.buckets = new_buckets;
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.entries.is_empty() {
            return;
        }
        assert!(!self.buckets.is_empty());

        let mut seen = std::collections::HashSet::new();
        let mut chained = 0usize;
        for (bucket, head) in self.buckets.iter().enumerate() {
            let mut cursor = *head;
            while let Some(entry_id) = cursor {
                let entry = self.entries.get(entry_id).expect("chained entry missing");
                assert!(seen.insert(entry.key.clone()), "duplicate key in table");
                assert_eq!(self.bucket_of(&entry.key), bucket);
                chained += 1;
                assert!(chained <= self.entries.len());
                cursor = entry.next;
            }
        }
        assert_eq!(chained, self.entries.len());
    }
}

impl Default for ChainIndex {
    fn default() -> Self {
        Self::new()
    }
}
