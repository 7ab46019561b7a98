// ==============================================
// CROSS-STRUCTURE CACHE PROPERTY TESTS (integration)
// ==============================================
//
// End-to-end properties of PageCache that span the chain index and the
// recency list: capacity bounds, index/list agreement, loader-call counts,
// and the long-run LRU hit rate. These exercise the public surface only.

use std::cell::Cell;

use pagecache::cache::PageCache;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn payload_for(key: &str) -> String {
    format!("payload:{key}")
}

/// Loader that counts its invocations through a shared cell.
fn counting_loader(calls: &Cell<u64>) -> impl Fn(&str) -> String + '_ {
    move |key: &str| {
        calls.set(calls.get() + 1);
        payload_for(key)
    }
}

#[test]
fn capacity_bound_holds_after_every_call() {
    let mut cache = PageCache::try_new(4).unwrap();
    assert_eq!(cache.capacity(), 4);
    for i in 0..64 {
        cache.get_or_load(&format!("key-{i}"), payload_for);
        assert!(cache.len() <= 4);
        cache.check_invariants().unwrap();
    }
    assert_eq!(cache.len(), 4);
}

#[test]
fn repeat_hit_materializes_exactly_once() {
    let mut cache = PageCache::try_new(8).unwrap();
    let calls = Cell::new(0);

    let first = cache
        .get_or_load("k", counting_loader(&calls))
        .payload()
        .to_owned();
    let second = cache
        .get_or_load("k", counting_loader(&calls))
        .payload()
        .to_owned();

    assert_eq!(calls.get(), 1);
    assert_eq!(first, second);
}

#[test]
fn insertion_beyond_capacity_evicts_in_lru_order() {
    let mut cache = PageCache::try_new(3).unwrap();
    let calls = Cell::new(0);

    for key in ["key0", "key1", "key2", "key3"] {
        cache.get_or_load(key, counting_loader(&calls));
    }

    assert_eq!(calls.get(), 4);
    assert!(!cache.contains("key0"));
    assert!(cache.contains("key1"));
    assert!(cache.contains("key2"));
    assert!(cache.contains("key3"));
    cache.check_invariants().unwrap();
}

#[test]
fn promotion_defers_eviction() {
    // Full sequence k0,k1,k2,k3,k2,k1,k0 at capacity 3:
    //   k0..k3 load (4 calls), k3 evicts k0;
    //   k2 and k1 hit (no calls) and are promoted;
    //   k0 was evicted, so it loads again (5th call) and evicts k3.
    let mut cache = PageCache::try_new(3).unwrap();
    let calls = Cell::new(0);

    for key in ["key0", "key1", "key2", "key3", "key2", "key1", "key0"] {
        cache.get_or_load(key, counting_loader(&calls));
        assert!(cache.len() <= 3);
        cache.check_invariants().unwrap();
    }

    assert_eq!(calls.get(), 5);
    assert_eq!(cache.len(), 3);
    assert!(cache.contains("key0"));
    assert!(cache.contains("key1"));
    assert!(cache.contains("key2"));
    assert!(!cache.contains("key3"));
}

#[test]
fn eviction_then_reload_round_trips() {
    let mut cache = PageCache::try_new(2).unwrap();
    let calls = Cell::new(0);

    cache.get_or_load("a", counting_loader(&calls));
    cache.get_or_load("b", counting_loader(&calls));
    cache.get_or_load("c", counting_loader(&calls)); // evicts "a"
    let page = cache.get_or_load("a", counting_loader(&calls));

    assert_eq!(page.payload(), "payload:a");
    assert_eq!(calls.get(), 4);
    cache.check_invariants().unwrap();
}

#[test]
fn randomized_mixed_operations_keep_structures_in_sync() {
    let mut rng = StdRng::seed_from_u64(0x1A7E);
    let mut cache = PageCache::try_new(16).unwrap();

    for step in 0..5_000 {
        let key = format!("key-{}", rng.gen_range(0..48u32));
        match rng.gen_range(0..10u32) {
            0 => {
                cache.remove(&key);
            }
            1 => {
                cache.touch(&key);
            }
            2 => {
                cache.pop_lru();
            }
            3 => {
                let _ = cache.peek(&key);
            }
            _ => {
                let page = cache.get_or_load(&key, payload_for);
                assert_eq!(page.key(), key);
            }
        }
        assert!(cache.len() <= 16);
        assert_eq!(cache.index_stats().entries, cache.len());
        if step % 32 == 0 {
            cache.check_invariants().unwrap();
        }
    }
    cache.check_invariants().unwrap();
}

#[test]
fn uniform_access_hit_rate_converges_to_capacity_over_keyspace() {
    const CAPACITY: usize = 50;
    const KEYSPACE: u32 = 500;
    const WARMUP: u32 = 20_000;
    const SAMPLES: u64 = 200_000;

    let mut rng = StdRng::seed_from_u64(0xCAFE);
    let mut cache = PageCache::try_new(CAPACITY).unwrap();
    let calls = Cell::new(0);

    for _ in 0..WARMUP {
        let key = format!("key-{}", rng.gen_range(0..KEYSPACE));
        cache.get_or_load(&key, counting_loader(&calls));
    }

    calls.set(0);
    for _ in 0..SAMPLES {
        let key = format!("key-{}", rng.gen_range(0..KEYSPACE));
        cache.get_or_load(&key, counting_loader(&calls));
    }

    let hits = SAMPLES - calls.get();
    let hit_rate = hits as f64 / SAMPLES as f64;
    let expected = CAPACITY as f64 / KEYSPACE as f64;
    assert!(
        (hit_rate - expected).abs() <= 0.01,
        "hit rate {hit_rate:.4} strayed more than 1% from {expected:.4}"
    );
}
