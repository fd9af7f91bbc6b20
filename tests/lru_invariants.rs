// ==============================================
// LRU BEHAVIORAL INVARIANT TESTS (integration)
// ==============================================
//
// End-to-end checks of the cache contract: capacity bounds, recency
// ordering, eviction selection, and the miss policy, exercised through the
// public API only.

use lrukit::policy::lru::LruCache;

fn order<V>(cache: &LruCache<u32, V>) -> Vec<u32> {
    cache.iter().map(|(k, _)| *k).collect()
}

// ==============================================
// Construction
// ==============================================

mod construction {
    use super::*;

    #[test]
    fn zero_capacity_is_a_config_error() {
        let err = LruCache::<u32, String>::new(0).unwrap_err();
        assert!(
            err.to_string().contains("capacity"),
            "error should name the offending parameter: {}",
            err
        );
    }

    #[test]
    fn valid_capacity_starts_empty() {
        let cache = LruCache::<u32, String>::new(3).unwrap();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.capacity(), 3);
        assert!(cache.is_empty());
    }
}

// ==============================================
// Reference scenario, capacity = 3
// ==============================================
//
// One access sequence carried through step by step, asserting the full
// iteration order (LRU -> MRU) after every operation.

mod reference_scenario {
    use super::*;

    #[test]
    fn step_by_step() {
        let mut cache = LruCache::new(3).unwrap();

        // 1. Fill to capacity.
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");
        assert_eq!(cache.len(), 3);
        assert_eq!(order(&cache), vec![1, 2, 3]);

        // 2. Reading key 1 promotes it.
        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(order(&cache), vec![2, 3, 1]);

        // 3. Inserting a 4th key evicts key 2, the current LRU.
        cache.insert(4, "d");
        assert_eq!(cache.len(), 3);
        assert_eq!(order(&cache), vec![3, 1, 4]);

        // 4. The evicted key is a miss, not an error.
        assert_eq!(cache.get(&2), None);

        // 5. Updating key 3 overwrites in place and promotes it.
        cache.insert(3, "c-updated");
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.peek(&3), Some(&"c-updated"));
        assert_eq!(order(&cache), vec![1, 4, 3]);

        cache.check_invariants().unwrap();
    }
}

// ==============================================
// Capacity invariant
// ==============================================

mod capacity_bounds {
    use super::*;

    #[test]
    fn count_never_exceeds_capacity() {
        let mut cache = LruCache::new(5).unwrap();
        for i in 0..200u32 {
            cache.insert(i % 13, i);
            assert!(cache.len() <= 5, "len {} exceeded capacity", cache.len());
        }
        cache.check_invariants().unwrap();
    }

    #[test]
    fn eviction_removes_exactly_one_entry() {
        let mut cache = LruCache::new(3).unwrap();
        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.insert(3, 3);

        cache.insert(4, 4);
        assert_eq!(cache.len(), 3);
        // Only the previous LRU is gone.
        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        assert!(cache.contains(&4));
    }

    #[test]
    fn update_at_capacity_never_evicts() {
        let mut cache = LruCache::new(2).unwrap();
        cache.insert(1, "a");
        cache.insert(2, "b");

        for _ in 0..10 {
            cache.insert(1, "a2");
            cache.insert(2, "b2");
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&1));
        assert!(cache.contains(&2));
    }
}

// ==============================================
// Recency ordering
// ==============================================

mod recency_order {
    use super::*;

    #[test]
    fn more_recent_access_sits_closer_to_mru() {
        let mut cache = LruCache::new(4).unwrap();
        for k in 1..=4u32 {
            cache.insert(k, ());
        }

        cache.get(&2);
        cache.get(&1);
        // Accesses: 3, 4 untouched; 2 then 1.
        assert_eq!(order(&cache), vec![3, 4, 2, 1]);
    }

    #[test]
    fn update_only_promotes_the_updated_key() {
        let mut cache = LruCache::new(4).unwrap();
        for k in 1..=4u32 {
            cache.insert(k, 0);
        }

        cache.insert(2, 99);
        // Relative order of the untouched keys is preserved.
        assert_eq!(order(&cache), vec![1, 3, 4, 2]);
    }

    #[test]
    fn eviction_always_takes_the_front() {
        let mut cache = LruCache::new(3).unwrap();
        cache.insert(1, ());
        cache.insert(2, ());
        cache.insert(3, ());
        cache.touch(&1);
        cache.touch(&2);

        let victim = cache.peek_lru().map(|(k, _)| *k);
        cache.insert(4, ());
        assert_eq!(victim, Some(3));
        assert!(!cache.contains(&3));
    }

    #[test]
    fn long_mixed_sequence_matches_model() {
        // Shadow the cache with a brute-force Vec model and compare orders.
        let mut cache = LruCache::new(4).unwrap();
        let mut model: Vec<u32> = Vec::new();

        let ops: &[(bool, u32)] = &[
            (true, 1),
            (true, 2),
            (true, 3),
            (false, 1),
            (true, 4),
            (true, 5), // evicts 2
            (false, 3),
            (true, 6), // evicts 1
            (true, 3),
            (false, 5),
        ];

        for &(is_insert, key) in ops {
            if is_insert {
                if let Some(pos) = model.iter().position(|&k| k == key) {
                    model.remove(pos);
                } else if model.len() == 4 {
                    model.remove(0);
                }
                model.push(key);
                cache.insert(key, key);
            } else {
                if let Some(pos) = model.iter().position(|&k| k == key) {
                    model.remove(pos);
                    model.push(key);
                }
                cache.get(&key);
            }
            assert_eq!(order(&cache), model);
        }
        cache.check_invariants().unwrap();
    }
}

// ==============================================
// Read semantics
// ==============================================

mod read_semantics {
    use super::*;

    #[test]
    fn round_trip_insert_then_get() {
        let mut cache = LruCache::new(2).unwrap();
        cache.insert(7, String::from("seven"));
        assert_eq!(cache.get(&7).map(String::as_str), Some("seven"));
    }

    #[test]
    fn repeated_get_is_idempotent() {
        let mut cache = LruCache::new(3).unwrap();
        cache.insert(1, "a");
        cache.insert(2, "b");

        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.len(), 2);
        assert_eq!(order(&cache), vec![1, 2]);
    }

    #[test]
    fn contains_and_iter_are_recency_neutral() {
        let mut cache = LruCache::new(3).unwrap();
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");

        cache.contains(&1);
        let collected: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(collected, vec![(1, "a"), (2, "b"), (3, "c")]);

        // Key 1 is still the eviction victim.
        cache.insert(4, "d");
        assert!(!cache.contains(&1));
    }

    #[test]
    fn miss_is_none_not_default() {
        let mut cache = LruCache::<u32, i32>::new(2).unwrap();
        cache.insert(1, 0); // a legitimately stored default-looking value
        assert_eq!(cache.get(&1), Some(&0));
        assert_eq!(cache.get(&2), None);
    }
}

// ==============================================
// Non-Copy keys and values
// ==============================================

mod ownership {
    use super::*;

    #[test]
    fn string_keys_and_values() {
        let mut cache: LruCache<String, Vec<u8>> = LruCache::new(2).unwrap();
        cache.insert("alpha".to_string(), vec![1, 2, 3]);
        cache.insert("beta".to_string(), vec![4]);

        assert_eq!(cache.get(&"alpha".to_string()), Some(&vec![1, 2, 3]));
        cache.insert("gamma".to_string(), vec![5]); // evicts "beta"
        assert!(!cache.contains(&"beta".to_string()));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn values_drop_on_eviction() {
        use std::rc::Rc;

        let tracker = Rc::new(());
        let mut cache = LruCache::new(1).unwrap();
        cache.insert(1, Rc::clone(&tracker));
        assert_eq!(Rc::strong_count(&tracker), 2);

        cache.insert(2, Rc::new(()));
        assert_eq!(Rc::strong_count(&tracker), 1, "evicted value must be dropped");
    }
}
