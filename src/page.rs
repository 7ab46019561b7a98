//! Cached page type and key utilities.
//!
//! A [`Page`] is the unit of cached data: an owned key/payload pair. Keys are
//! plain byte strings compared by exact content; [`key_hash`] is the djb2
//! string hash used by the chain index for bucket placement.

use std::fmt;

/// An owned key/payload pair, the unit of cached data.
///
/// Immutable once created; the recency list node that holds a page owns it
/// exclusively. `Clone` produces a fully independent duplicate of both
/// fields.
#[derive(Clone, PartialEq, Eq)]
pub struct Page {
    key: String,
    payload: String,
}

impl Page {
    /// Creates a page from independent owned copies of `key` and `payload`.
    ///
    /// Keys are not normalized in any way; two keys are the same page key
    /// only if their bytes match exactly.
    pub fn new(key: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
        }
    }

    /// Returns the page key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the page payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("key", &self.key)
            .field("payload", &self.payload)
            .finish()
    }
}

/// djb2 hash over the raw bytes of `key`: seed 5381, `h = h * 33 + byte`.
#[inline]
pub fn key_hash(key: &str) -> u64 {
    let mut hash: u64 = 5381;
    for &byte in key.as_bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(u64::from(byte));
    }
    hash
}

/// Byte-exact key comparison.
///
/// Short-circuits on reference identity, then compares lengths before bytes.
#[inline]
pub fn key_eq(lhs: &str, rhs: &str) -> bool {
    if std::ptr::eq(lhs, rhs) {
        return true;
    }
    lhs.len() == rhs.len() && lhs.as_bytes() == rhs.as_bytes()
}
