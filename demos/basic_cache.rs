use pagecache::cache::PageCache;

fn slow_page(key: &str) -> String {
    println!("loader ran for {key}");
    format!("payload:{key}")
}

fn main() {
    let mut cache = PageCache::try_new(2).expect("capacity is positive");

    cache.get_or_load("alpha", slow_page);
    cache.get_or_load("beta", slow_page);

    // Hit: served from cache, loader does not run.
    let page = cache.get_or_load("alpha", slow_page);
    println!("hit alpha: {}", page.payload());

    // "beta" is now least recently used, so "gamma" evicts it.
    cache.get_or_load("gamma", slow_page);

    println!("contains beta? {}", cache.contains("beta"));
    println!("resident pages: {}", cache.len());
}

// Expected output:
// loader ran for alpha
// loader ran for beta
// hit alpha: payload:alpha
// loader ran for gamma
// contains beta? false
// resident pages: 2
//
// Explanation: capacity=2; the hit on "alpha" promotes it to MRU, leaving
// "beta" as the eviction victim when "gamma" is loaded.
