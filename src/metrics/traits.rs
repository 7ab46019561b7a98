//! Metrics trait hierarchy.
//!
//! Separates *recording*, *snapshotting*, and *export* so observability never
//! couples to cache logic:
//!
//! ```text
//!   ┌───────────────────────────┐     ┌────────────────────────────┐
//!   │   CoreMetricsRecorder     │     │  LruMetricsReadRecorder    │
//!   │   hit/miss/loader/evict   │     │  peek paths (&self)        │
//!   └────────────┬──────────────┘     └────────────────────────────┘
//!                │
//!                ▼
//!   ┌───────────────────────────┐
//!   │    LruMetricsRecorder     │
//!   │  touch/pop_lru/remove     │
//!   └───────────────────────────┘
//!
//!   Consumption (decoupled from recording):
//!   MetricsSnapshotProvider<S> (tests/bench) · MetricsExporter<S> (monitoring)
//! ```
//!
//! Recorders only write counters; providers only read; exporters only
//! publish.

/// Counters shared by every cached-lookup path.
pub trait CoreMetricsRecorder {
    fn record_hit(&mut self);
    fn record_miss(&mut self);
    fn record_loader_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_evict(&mut self);
    fn record_clear(&mut self);
}

/// Counters for the recency-maintenance operations.
pub trait LruMetricsRecorder: CoreMetricsRecorder {
    fn record_touch_call(&mut self);
    fn record_touch_found(&mut self);
    fn record_pop_lru_call(&mut self);
    fn record_pop_lru_found(&mut self);
    fn record_remove_call(&mut self);
    fn record_remove_found(&mut self);
}

/// Read-only counters for `&self` operations (uses interior mutability).
pub trait LruMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_found(&self);
    fn record_peek_lru_call(&self);
    fn record_peek_lru_found(&self);
}

/// Snapshot provider for tests and benches.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics snapshots to a monitoring backend.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
