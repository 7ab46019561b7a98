//! pagecache: a loader-backed LRU page cache.
//!
//! Maps string keys to loaded pages with O(1) cached lookups, falling back to
//! a caller-supplied synchronous loader on miss and evicting the least
//! recently used page when full. Built from two cooperating structures: a
//! chained hash index ([`ds::chain_index`]) and an arena-backed recency list
//! ([`ds::recency_list`]), orchestrated by [`cache::PageCache`].

pub mod cache;
pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod page;
pub mod prelude;
