//! Result caches shared between concurrent queries.
//!
//! Two policies are used:
//!
//! - [`BoundedCache`] holds at most `capacity` entries and evicts the oldest
//!   *inserted* entry on overflow. Reads do not refresh an entry's position,
//!   so this is FIFO rather than LRU.
//! - [`TtlCache`] expires entries a fixed time after the timestamp they were
//!   generated at. Staleness is judged against the caller's `now` when an
//!   entry is read; there is no sweeper thread.
//!
//! Both are owned by a [`crate::query::QueryService`] instance, so caches
//! live and die with the service rather than the process.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use chrono::NaiveDateTime;
use moka::sync::Cache as MokaCache;
use parking_lot::Mutex;
use tracing::trace;

/// Default capacity of the search result cache.
pub const DEFAULT_SEARCH_CAPACITY: usize = 50;

/// Default capacity of the route-between cache.
pub const DEFAULT_ROUTE_BETWEEN_CAPACITY: usize = 50;

/// Default staleness window for synthesized live timings.
pub const DEFAULT_LIVE_TTL: Duration = Duration::from_secs(10 * 60);

/// Configuration for the query caches.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached search queries.
    pub search_capacity: usize,

    /// Maximum number of cached (from, to) pairs.
    pub route_between_capacity: usize,

    /// How long a synthesized live-timing board is replayed.
    pub live_ttl: Duration,

    /// How long the service status snapshot is reused.
    pub status_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            search_capacity: DEFAULT_SEARCH_CAPACITY,
            route_between_capacity: DEFAULT_ROUTE_BETWEEN_CAPACITY,
            live_ttl: DEFAULT_LIVE_TTL,
            status_ttl: DEFAULT_LIVE_TTL,
        }
    }
}

struct Fifo<K, V> {
    entries: HashMap<K, V>,
    /// Keys in insertion order, oldest first.
    order: VecDeque<K>,
}

/// Capacity-bounded cache with insertion-order eviction.
///
/// All operations take a single lock, so a lookup-evict-insert sequence in
/// [`BoundedCache::get_or_insert_with`] is atomic with respect to other
/// callers.
pub struct BoundedCache<K, V> {
    capacity: usize,
    inner: Mutex<Fifo<K, V>>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    /// Create an empty cache. A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Fifo {
                entries: HashMap::with_capacity(capacity),
                order: VecDeque::with_capacity(capacity),
            }),
        }
    }

    /// Get a cached value.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().entries.get(key).cloned()
    }

    /// Insert a value, returning the key evicted to make room, if any.
    ///
    /// Replacing an existing key keeps its original position.
    pub fn insert(&self, key: K, value: V) -> Option<K> {
        let mut inner = self.inner.lock();
        Self::insert_locked(&mut inner, self.capacity, key, value)
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        let mut inner = self.inner.lock();
        if let Some(hit) = inner.entries.get(&key) {
            trace!(?key, "cache hit");
            return hit.clone();
        }

        let value = compute();
        Self::insert_locked(&mut inner, self.capacity, key, value.clone());
        value
    }

    fn insert_locked(inner: &mut Fifo<K, V>, capacity: usize, key: K, value: V) -> Option<K> {
        if capacity == 0 {
            return None;
        }

        if let Some(existing) = inner.entries.get_mut(&key) {
            *existing = value;
            return None;
        }

        let evicted = if inner.entries.len() >= capacity {
            let oldest = inner.order.pop_front();
            if let Some(oldest) = &oldest {
                inner.entries.remove(oldest);
                trace!(key = ?oldest, "evicted oldest cache entry");
            }
            oldest
        } else {
            None
        };

        inner.order.push_back(key.clone());
        inner.entries.insert(key, value);
        evicted
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("capacity", &self.capacity)
            .field("len", &self.inner.lock().entries.len())
            .finish()
    }
}

/// Cache whose entries go stale a fixed time after they were generated.
///
/// Each entry carries the logical time it was generated at, and a read at
/// `now` only sees it while `now - generated_at < ttl`. moka's own
/// `time_to_live` is set to the same window so stale entries are also
/// reclaimed from memory.
pub struct TtlCache<K, V> {
    entries: MokaCache<K, Stamped<V>>,
    ttl: Duration,
}

#[derive(Clone)]
struct Stamped<V> {
    generated_at: NaiveDateTime,
    value: V,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: MokaCache::builder().time_to_live(ttl).build(),
            ttl,
        }
    }

    /// Get a value if it was generated less than one TTL before `now`.
    pub fn get(&self, key: &K, now: NaiveDateTime) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| self.is_fresh(entry.generated_at, now))
            .map(|entry| entry.value)
    }

    /// Return the value for `key` if it is fresh at `now`, otherwise compute
    /// it, stamp it with `now` and store it.
    ///
    /// Concurrent callers for the same key share a single computation.
    pub fn get_or_insert_with(
        &self,
        key: K,
        now: NaiveDateTime,
        compute: impl FnOnce() -> V,
    ) -> V {
        self.entries
            .entry(key)
            .or_insert_with_if(
                || Stamped {
                    generated_at: now,
                    value: compute(),
                },
                |entry| !self.is_fresh(entry.generated_at, now),
            )
            .into_value()
            .value
    }

    /// An entry from the caller's future is treated as stale.
    fn is_fresh(&self, generated_at: NaiveDateTime, now: NaiveDateTime) -> bool {
        (now - generated_at)
            .to_std()
            .is_ok_and(|age| age < self.ttl)
    }
}

impl<K, V> fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache").field("ttl", &self.ttl).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.search_capacity, 50);
        assert_eq!(config.route_between_capacity, 50);
        assert_eq!(config.live_ttl, Duration::from_secs(600));
        assert_eq!(config.status_ttl, Duration::from_secs(600));
    }

    #[test]
    fn bounded_cache_never_exceeds_capacity() {
        let cache = BoundedCache::new(3);
        for i in 0..10 {
            cache.insert(i, i * 10);
            assert!(cache.len() <= 3);
        }
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn bounded_cache_evicts_one_oldest_per_overflow() {
        let cache = BoundedCache::new(3);
        assert_eq!(cache.insert("a", 1), None);
        assert_eq!(cache.insert("b", 2), None);
        assert_eq!(cache.insert("c", 3), None);

        assert_eq!(cache.insert("d", 4), Some("a"));
        assert_eq!(cache.insert("e", 5), Some("b"));

        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"c"), Some(3));
        assert_eq!(cache.get(&"e"), Some(5));
    }

    #[test]
    fn reads_do_not_refresh_position() {
        let cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);

        // A true LRU would keep "a" after this read
        assert_eq!(cache.get(&"a"), Some(1));

        assert_eq!(cache.insert("c", 3), Some("a"));
    }

    #[test]
    fn replacing_keeps_position() {
        let cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.insert("a", 10), None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.insert("c", 3), Some("a"));
    }

    #[test]
    fn get_or_insert_with_computes_once() {
        let cache = BoundedCache::new(4);
        let mut calls = 0;
        let first = cache.get_or_insert_with("k", || {
            calls += 1;
            42
        });
        let second = cache.get_or_insert_with("k", || {
            calls += 1;
            0
        });
        assert_eq!((first, second), (42, 42));
        assert_eq!(calls, 1);
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let cache = BoundedCache::new(0);
        cache.insert("a", 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get_or_insert_with("a", || 2), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_inserts_respect_capacity() {
        let cache = std::sync::Arc::new(BoundedCache::new(16));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        cache.get_or_insert_with(t * 1000 + i, || i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 16);
    }

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    #[test]
    fn ttl_cache_replays_within_window() {
        let cache = TtlCache::new(Duration::from_secs(600));
        let key = "broadway".to_string();
        assert_eq!(cache.get_or_insert_with(key.clone(), at(10, 0), || 7), 7);
        assert_eq!(cache.get(&key, at(10, 9)), Some(7));
        assert_eq!(cache.get_or_insert_with(key, at(10, 9), || 99), 7);
    }

    #[test]
    fn ttl_cache_goes_stale_by_caller_clock() {
        let cache = TtlCache::new(Duration::from_secs(600));
        cache.get_or_insert_with(1u32, at(10, 0), || "old");
        assert_eq!(cache.get(&1, at(10, 10)), None);
        assert_eq!(cache.get_or_insert_with(1, at(10, 11), || "new"), "new");
        assert_eq!(cache.get(&1, at(10, 15)), Some("new"));
    }

    #[test]
    fn ttl_cache_treats_earlier_now_as_stale() {
        let cache = TtlCache::new(Duration::from_secs(600));
        cache.get_or_insert_with(1u32, at(13, 0), || "afternoon");
        assert_eq!(cache.get(&1, at(9, 0)), None);
        assert_eq!(cache.get_or_insert_with(1, at(9, 0), || "morning"), "morning");
    }

    #[test]
    fn ttl_cache_expires_from_memory() {
        let cache = TtlCache::new(Duration::from_millis(50));
        cache.get_or_insert_with(1u32, at(10, 0), || "old");
        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(cache.get(&1, at(10, 0)), None);
    }
}
