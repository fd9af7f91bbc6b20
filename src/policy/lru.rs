//! # Least Recently Used (LRU) cache
//!
//! Strict-LRU cache engine built from a hash index and an arena-backed
//! recency list. Every read or write of an existing key promotes it to
//! most-recently-used; inserting a new key into a full cache evicts the
//! least-recently-used entry.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────┐
//!   │                       LruCache<K, V>                        │
//!   │                                                             │
//!   │   ┌───────────────────────────────────────────────────┐     │
//!   │   │  FxHashMap<K, SlotId>  (index)                    │     │
//!   │   │                                                   │     │
//!   │   │  ┌─────────┬──────────────────────────────┐       │     │
//!   │   │  │   Key   │  SlotId                      │       │     │
//!   │   │  ├─────────┼──────────────────────────────┤       │     │
//!   │   │  │  k_1    │  ──────────────────────────┐ │       │     │
//!   │   │  │  k_2    │  ────────────────────┐     │ │       │     │
//!   │   │  │  k_3    │  ──────────────┐     │     │ │       │     │
//!   │   │  └─────────┴────────────────┼─────┼─────┼─┘       │     │
//!   │   └─────────────────────────────┼─────┼─────┼─────────┘     │
//!   │                                 ▼     ▼     ▼               │
//!   │   ┌───────────────────────────────────────────────────┐     │
//!   │   │  RecencyList<Entry<K, V>>  (recency order)        │     │
//!   │   │                                                   │     │
//!   │   │  front ─► [k_3] ◄──► [k_2] ◄──► [k_1] ◄── back    │     │
//!   │   │           (LRU)                 (MRU)             │     │
//!   │   └───────────────────────────────────────────────────┘     │
//!   └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entries live in list slots addressed by stable [`SlotId`] handles, so a
//! promotion splices the existing slot to the back without reallocating and
//! without rewriting the index. No raw pointers anywhere in the core.
//!
//! ## Operations flow
//!
//! ```text
//!   INSERT new key (cache full, capacity = 3)
//!   ═════════════════════════════════════════════════════════════
//!   Before:  front ─► [A] ◄──► [B] ◄──► [C] ◄── back
//!                     LRU                MRU
//!   insert(D):
//!     1. Evict [A] from the front (pop_front + index remove)
//!     2. Append [D] at the back (push_back + index insert)
//!   After:   front ─► [B] ◄──► [C] ◄──► [D] ◄── back
//!
//!   GET existing key
//!   ═════════════════════════════════════════════════════════════
//!   get(B):
//!     1. Index lookup: O(1)
//!     2. move_to_back(B's slot): O(1), SlotId unchanged
//!   After:   front ─► [A] ◄──► [C] ◄──► [B] ◄── back
//!
//!   PEEK / CONTAINS (no reordering)
//!   ═════════════════════════════════════════════════════════════
//!   peek(A) / contains(&A): index lookup only, order unchanged.
//! ```
//!
//! ## Method summary
//!
//! | Method            | Complexity | Recency effect                    |
//! |-------------------|------------|-----------------------------------|
//! | `new(capacity)`   | O(1)       | — (errors on capacity 0)          |
//! | `insert(k, v)`    | O(1) avg   | promotes; may evict the LRU       |
//! | `get(&k)`         | O(1) avg   | promotes                          |
//! | `get_mut(&k)`     | O(1) avg   | promotes                          |
//! | `peek(&k)`        | O(1) avg   | none                              |
//! | `contains(&k)`    | O(1) avg   | none                              |
//! | `remove(&k)`      | O(1) avg   | entry leaves the order            |
//! | `pop_lru()`       | O(1)       | removes the front                 |
//! | `peek_lru()`      | O(1)       | none                              |
//! | `touch(&k)`       | O(1) avg   | promotes                          |
//! | `iter()`          | O(n)       | none (LRU→MRU, restartable)       |
//! | `recency_rank()`  | O(n)       | none                              |
//!
//! ## Miss policy
//!
//! A missing key is never an error and never a synthesized default: every
//! lookup returns `Option`, uniformly for all value types. The only fallible
//! call is construction (`ConfigError` on zero capacity).
//!
//! ## Thread safety
//!
//! `LruCache` is single-threaded. `get` mutates recency, so a reader/writer
//! lock buys nothing; the concurrent variant [`ConcurrentLruCache`]
//! (feature `concurrency`) wraps the whole cache in one `parking_lot::Mutex`.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::recency_list::{RecencyIter, RecencyList};
use crate::ds::slot_arena::SlotId;
use crate::error::{ConfigError, InvariantError};
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

/// Key-value pair stored as a recency-list node payload.
///
/// The key is duplicated here so eviction can remove the index mapping
/// without a reverse lookup.
#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Strict-LRU cache with O(1) amortized `get`/`insert`.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCache;
///
/// let mut cache = LruCache::new(3).unwrap();
/// cache.insert(1, "one");
/// cache.insert(2, "two");
/// cache.insert(3, "three");
///
/// assert_eq!(cache.get(&1), Some(&"one"));
///
/// // Key 2 is now least recent and gets evicted.
/// cache.insert(4, "four");
/// assert!(!cache.contains(&2));
/// ```
#[derive(Debug)]
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, SlotId>,
    list: RecencyList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Capacity is fixed for the lifetime of the instance. A capacity of
    /// zero is rejected: a cache that can hold nothing silently drops every
    /// insert, which is indistinguishable from a broken one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        Ok(Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: RecencyList::with_capacity(capacity),
            capacity,
        })
    }

    /// Number of entries currently cached.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if the key is cached. Does not touch recency order.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Looks up a value and promotes the entry to most-recently-used.
    ///
    /// Returns `None` on a miss. This is the only read that is also a
    /// recency write; use [`peek`](Self::peek) to read without promoting.
    #[inline]
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.promote(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Like [`get`](Self::get), but returns a mutable reference.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = *self.index.get(key)?;
        self.promote(id);
        self.list.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Reads a value without updating recency order.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// already existed.
    ///
    /// An existing key is overwritten in place and promoted; no eviction
    /// happens and the count is unchanged. A new key is appended at the
    /// most-recent position; if the cache was full, the current
    /// least-recently-used entry is first evicted from both list and index.
    /// Eviction is silent and removes exactly one entry.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            let entry = self
                .list
                .get_mut(id)
                .expect("index handle refers to a live list slot");
            let old = std::mem::replace(&mut entry.value, value);
            self.promote(id);
            self.debug_validate();
            return Some(old);
        }

        if self.index.len() == self.capacity {
            // Unique eviction candidate: recency order is total, the front
            // is the one least-recently-used entry.
            if let Some(evicted) = self.list.pop_front() {
                self.index.remove(&evicted.key);
            }
        }

        let id = self.list.push_back(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        self.debug_validate();
        None
    }

    /// Removes a key, returning its value if it existed.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        let entry = self
            .list
            .remove(id)
            .expect("index handle refers to a live list slot");
        self.debug_validate();
        Some(entry.value)
    }

    /// Removes and returns the least-recently-used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_front()?;
        self.index.remove(&entry.key);
        self.debug_validate();
        Some((entry.key, entry.value))
    }

    /// Returns the least-recently-used entry without removing or promoting it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.front().map(|entry| (&entry.key, &entry.value))
    }

    /// Promotes a key to most-recently-used without reading its value.
    /// Returns `true` if the key existed.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => {
                self.promote(id);
                true
            },
            None => false,
        }
    }

    /// Position of a key in recency order, `0` = most recently used. O(n).
    pub fn recency_rank(&self, key: &K) -> Option<usize> {
        let id = *self.index.get(key)?;
        let pos = self.list.iter_ids().position(|candidate| candidate == id)?;
        Some(self.list.len() - 1 - pos)
    }

    /// Iterates entries from least- to most-recently-used.
    ///
    /// Lazy, restartable per call, and non-mutating: iterating never changes
    /// recency order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.list.iter(),
        }
    }

    /// Removes all entries. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Verifies that the recency list and the key index agree.
    ///
    /// Checks the full bijection both ways: every index handle resolves to a
    /// live list entry carrying the same key, every listed entry is indexed
    /// back to its own slot, and the count respects capacity. A violation is
    /// a defect in the cache, not a caller error.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] describing the first divergence found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "count {} exceeds capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index has {} keys but list has {} entries",
                self.index.len(),
                self.list.len()
            )));
        }

        for (key, &id) in &self.index {
            match self.list.get(id) {
                Some(entry) if entry.key == *key => {},
                Some(_) => {
                    return Err(InvariantError::new(format!(
                        "index handle {} maps to an entry with a different key",
                        id.index()
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!(
                        "index handle {} does not refer to a live list slot",
                        id.index()
                    )));
                },
            }
        }

        let mut walked = 0usize;
        for id in self.list.iter_ids() {
            let entry = self
                .list
                .get(id)
                .ok_or_else(|| InvariantError::new("list iteration produced a dead slot"))?;
            if self.index.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(
                    "listed entry is not indexed back to its own slot",
                ));
            }
            walked += 1;
            if walked > self.list.len() {
                return Err(InvariantError::new("cycle detected in recency list"));
            }
        }
        if walked != self.list.len() {
            return Err(InvariantError::new(format!(
                "list walk visited {} entries, expected {}",
                walked,
                self.list.len()
            )));
        }

        Ok(())
    }

    /// Splices the slot to the back. The SlotId is preserved, so the index
    /// mapping stays valid without a rewrite.
    #[inline(always)]
    fn promote(&mut self, id: SlotId) {
        let moved = self.list.move_to_back(id);
        debug_assert!(moved, "promoted handle must be live");
    }

    #[inline]
    fn debug_validate(&self) {
        #[cfg(debug_assertions)]
        {
            self.list.debug_validate_invariants();
            debug_assert_eq!(self.index.len(), self.list.len());
            debug_assert!(self.index.len() <= self.capacity);
        }
    }
}

/// Iterator over cache entries from LRU to MRU. See [`LruCache::iter`].
pub struct Iter<'a, K, V> {
    inner: RecencyIter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (&entry.key, &entry.value))
    }
}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

impl<K, V> CoreCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        LruCache::insert(self, key, value)
    }

    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        LruCache::get(self, key)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        LruCache::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }

    #[inline]
    fn clear(&mut self) {
        LruCache::clear(self)
    }
}

impl<K, V> MutableCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn pop_lru(&mut self) -> Option<(K, V)> {
        LruCache::pop_lru(self)
    }

    #[inline]
    fn peek_lru(&self) -> Option<(&K, &V)> {
        LruCache::peek_lru(self)
    }

    #[inline]
    fn touch(&mut self, key: &K) -> bool {
        LruCache::touch(self, key)
    }

    #[inline]
    fn recency_rank(&self, key: &K) -> Option<usize> {
        LruCache::recency_rank(self, key)
    }
}

// ---------------------------------------------------------------------------
// ConcurrentLruCache
// ---------------------------------------------------------------------------

/// Thread-safe LRU cache: one `parking_lot::Mutex` around [`LruCache`].
///
/// Coarse-grained by design: `get` promotes the entry, so every access is a
/// write and a reader/writer lock would be unsound for recency. Accessors
/// that return values clone them (`V: Clone`), since references cannot
/// outlive the critical section; [`get_with`](Self::get_with) borrows inside
/// the lock instead.
#[cfg(feature = "concurrency")]
#[derive(Debug)]
pub struct ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: parking_lot::Mutex<LruCache<K, V>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a thread-safe cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: parking_lot::Mutex::new(LruCache::new(capacity)?),
        })
    }

    /// Inserts a key-value pair, returning the previous value on update.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().insert(key, value)
    }

    /// Looks up and clones a value, promoting the entry.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Looks up a value and applies `f` to it under the lock, promoting the
    /// entry. Avoids cloning for callers that only need a projection.
    pub fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.inner.lock().get(key).map(f)
    }

    /// Reads and clones a value without updating recency order.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().peek(key).cloned()
    }

    /// Returns `true` if the key is cached. Does not touch recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Removes a key, returning its value if it existed.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Removes and returns the least-recently-used entry.
    pub fn pop_lru(&self) -> Option<(K, V)> {
        self.inner.lock().pop_lru()
    }

    /// Promotes a key to most-recently-used; `true` if it existed.
    pub fn touch(&self, key: &K) -> bool {
        self.inner.lock().touch(key)
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
