//! Cache trait hierarchy.
//!
//! Splits the cache surface into capability layers so callers can bound on
//! exactly what they need:
//!
//! ```text
//!   CoreCache<K, V>            insert / get / contains / len / capacity / clear
//!        │
//!        ▼
//!   MutableCache<K, V>         + remove (arbitrary key invalidation)
//!        │
//!        ▼
//!   LruCacheTrait<K, V>        + pop_lru / peek_lru / touch / recency_rank
//! ```
//!
//! `get` takes `&mut self` on purpose: under a recency policy a read is also
//! a write (it promotes the entry), so a shared-reference `get` would be a
//! lie. Non-promoting reads go through `contains` or the concrete type's
//! `peek`.

/// Core operations every cache supports, regardless of eviction policy.
///
/// # Example
///
/// ```
/// use lrukit::traits::CoreCache;
/// use lrukit::policy::lru::LruCache;
///
/// fn warm<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCache::new(100).unwrap();
/// warm(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if the key
    /// existed. May evict another entry per the cache's policy.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up a value, updating policy state (for LRU: promotes to MRU).
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Returns `true` if the key exists. Never updates policy state.
    fn contains(&self, key: &K) -> bool;

    /// Current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// Removes all entries.
    fn clear(&mut self);
}

/// Caches that allow arbitrary key removal.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a key, returning its value if it existed.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes a batch of keys, returning how many were present.
    fn remove_batch(&mut self, keys: &[K]) -> usize {
        keys.iter().filter(|&key| self.remove(key).is_some()).count()
    }
}

/// Recency-policy operations specific to LRU caches.
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least-recently-used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least-recently-used entry without removing or promoting it.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Promotes a key to most-recently-used without returning its value.
    /// Returns `true` if the key existed.
    fn touch(&mut self, key: &K) -> bool;

    /// Position of a key in recency order, `0` = most recently used. O(n).
    fn recency_rank(&self, key: &K) -> Option<usize>;
}
