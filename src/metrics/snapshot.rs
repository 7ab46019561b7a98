/// Point-in-time copy of every cache counter plus occupancy gauges.
///
/// Produced by the cache's `MetricsSnapshotProvider` implementation; plain
/// data, cheap to copy around in tests and exporters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub loader_calls: u64,
    pub insert_new: u64,
    pub evictions: u64,
    pub touch_calls: u64,
    pub touch_found: u64,
    pub pop_lru_calls: u64,
    pub pop_lru_found: u64,
    pub remove_calls: u64,
    pub remove_found: u64,
    pub clears: u64,
    pub peek_calls: u64,
    pub peek_found: u64,
    pub peek_lru_calls: u64,
    pub peek_lru_found: u64,
    pub cache_len: usize,
    pub capacity: usize,
}

impl CacheMetricsSnapshot {
    /// Hit fraction over all `get_or_load` calls; `None` before any call.
    pub fn hit_rate(&self) -> Option<f64> {
        let total = self.hits + self.misses;
        if total == 0 {
            None
        } else {
            Some(self.hits as f64 / total as f64)
        }
    }
}
