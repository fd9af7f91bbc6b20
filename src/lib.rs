//! lrukit: strict-LRU cache engine with O(1) get/insert.
//!
//! A hash index (`FxHashMap<K, SlotId>`) points into an arena-backed recency
//! list; promotion splices slots in place so handles stay stable and the
//! index never needs rewriting. See `src/policy/lru.rs` for the architecture
//! and invariants.

pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;
