//! Property tests: both maps behave like `std::collections::HashMap` for any
//! sequence of operations, at any capacity.

use chainmap::{BucketLockedMap, ConcurrentMap, Table};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Op {
    Get(i32),
    Put(i32, i32),
    Remove(i32),
}

fn arb_key() -> impl Strategy<Value = i32> {
    // A narrow range forces collisions and repeated keys; the extremes cover
    // the unsigned reinterpretation of negative keys.
    prop_oneof![
        8 => -16..16i32,
        1 => Just(i32::MIN),
        1 => Just(i32::MAX),
        1 => any::<i32>(),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_key().prop_map(Op::Get),
        (arb_key(), any::<i32>()).prop_map(|(k, v)| Op::Put(k, v)),
        arb_key().prop_map(Op::Remove),
    ]
}

fn check_against_model(map: &dyn Table<i32, i32>, ops: &[Op]) -> Result<(), TestCaseError> {
    let mut model = HashMap::new();

    for op in ops {
        match *op {
            Op::Get(k) => {
                prop_assert_eq!(map.get(k), model.get(&k).copied());
            }
            Op::Put(k, v) => {
                prop_assert_eq!(map.put(k, v), model.insert(k, v));
            }
            Op::Remove(k) => {
                prop_assert_eq!(map.remove(k), model.remove(&k));
            }
        }
        prop_assert_eq!(map.len(), model.len());
    }

    prop_assert_eq!(map.operation_count(), ops.len() as u64);

    for (k, v) in &model {
        prop_assert_eq!(map.get(*k), Some(*v));
    }

    Ok(())
}

proptest! {
    #[test]
    fn global_lock_map_matches_model(
        capacity in 1..32usize,
        ops in prop::collection::vec(arb_op(), 0..200),
    ) {
        let map: ConcurrentMap = ConcurrentMap::new(capacity).unwrap();
        check_against_model(&map, &ops)?;
    }

    #[test]
    fn bucket_locked_map_matches_model(
        capacity in 1..32usize,
        ops in prop::collection::vec(arb_op(), 0..200),
    ) {
        let map: BucketLockedMap = BucketLockedMap::new(capacity).unwrap();
        check_against_model(&map, &ops)?;
    }

    #[test]
    fn put_then_get_round_trips(capacity in 1..64usize, key in any::<i64>(), value in any::<i64>()) {
        let map: ConcurrentMap<i64, i64> = ConcurrentMap::new(capacity).unwrap();

        prop_assert_eq!(map.put(key, value), None);
        prop_assert_eq!(map.get(key), Some(value));
        prop_assert_eq!(map.put(key, value.wrapping_add(1)), Some(value));
        prop_assert_eq!(map.len(), 1);
    }

    #[test]
    fn max_value_is_storable(key in any::<i32>()) {
        let map: ConcurrentMap = ConcurrentMap::new(4).unwrap();

        prop_assert_eq!(map.put(key, i32::MAX), None);
        prop_assert_eq!(map.get(key), Some(i32::MAX));
        prop_assert_eq!(map.remove(key), Some(i32::MAX));
        prop_assert_eq!(map.get(key), None);
    }

    #[test]
    fn keys_stay_unique_in_the_dump(keys in prop::collection::vec(arb_key(), 0..100)) {
        let map: ConcurrentMap = ConcurrentMap::new(5).unwrap();
        for &k in &keys {
            map.put(k, 0);
        }

        let dump = map.to_string();
        let listed = dump.matches('(').count();
        prop_assert_eq!(listed, map.len());

        let mut distinct = keys.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(listed, distinct.len());
    }
}
