use std::cell::Cell;

/// A metrics-only counter cell.
///
/// Lets `&self` operations (peek paths) record observations without taking
/// `&mut self`. The cache is single-threaded by contract, so plain interior
/// mutability is sufficient; counters are observational and never affect
/// correctness.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }
}
