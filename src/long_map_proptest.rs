#![cfg(test)]

// Property tests for LongMap kept inside the crate so they can inspect the
// bucket array directly.

use crate::config::{CollisionPolicy, LongMapConfig};
use crate::long_map::LongMap;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations: indices shrink to earlier keys and op lists
// shrink in length. Pools mix small keys, multiples of 16 (same slot in a
// fresh table) and keys with a negative 32-bit hash.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Get(usize),
    Remove(usize),
    ContainsKey(usize),
    ContainsValue(i32),
    Clear,
    Export,
}

fn arb_key() -> impl Strategy<Value = i64> {
    prop_oneof![
        0i64..64,
        (0i64..8).prop_map(|k| k * 16 + 1),
        (0i64..8).prop_map(|k| 0x8000_0000 + k),
        any::<i64>(),
    ]
}

fn arb_scenario() -> impl Strategy<Value = (Vec<i64>, Vec<OpI>)> {
    proptest::collection::btree_set(arb_key(), 1..=12).prop_flat_map(|pool| {
        let pool: Vec<i64> = pool.into_iter().collect();
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => (idx.clone(), 0i32..16).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::ContainsKey),
            1 => (0i32..16).prop_map(OpI::ContainsValue),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Export),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn check_structure<V, S>(sut: &LongMap<V, S>) -> Result<(), TestCaseError> {
    let counted: usize = sut
        .buckets_for_test()
        .iter()
        .flatten()
        .map(|b| b.len())
        .sum();
    prop_assert_eq!(counted, sut.len(), "len must equal entries across chains");
    prop_assert!(
        sut.buckets_for_test().iter().flatten().all(|b| b.len() > 0),
        "an allocated bucket is never empty"
    );
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap
// under the strict policy.
// Invariants exercised across random operation sequences:
// - `put` reports the previous value and `get` the last written one.
// - `remove` reports the removed value; absent keys leave `len` alone.
// - `contains_key`/`contains_value` parity with the model.
// - `keys` is a permutation of the model's key set; `values` is `None`
//   exactly when the map is empty.
// - `len` equals the number of entries across all chains after each op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_strict_state_machine((pool, ops) in arb_scenario(), capacity in 1isize..=32) {
        let config = LongMapConfig::new()
            .with_capacity(capacity)
            .with_collision_policy(CollisionPolicy::Strict);
        let mut sut: LongMap<i32> = LongMap::with_config(config).unwrap();
        let mut model: HashMap<i64, i32> = HashMap::new();

        for op in ops {
            match op {
                OpI::Put(i, v) => {
                    let k = pool[i];
                    prop_assert_eq!(sut.put(k, v), model.insert(k, v));
                }
                OpI::Get(i) => {
                    let k = pool[i];
                    prop_assert_eq!(sut.get(k), model.get(&k));
                }
                OpI::Remove(i) => {
                    let k = pool[i];
                    prop_assert_eq!(sut.remove(k), model.remove(&k));
                }
                OpI::ContainsKey(i) => {
                    let k = pool[i];
                    prop_assert_eq!(sut.contains_key(k), model.contains_key(&k));
                }
                OpI::ContainsValue(v) => {
                    prop_assert_eq!(sut.contains_value(&v), model.values().any(|x| *x == v));
                }
                OpI::Clear => {
                    sut.clear();
                    model.clear();
                }
                OpI::Export => {
                    let keys = sut.keys();
                    prop_assert_eq!(keys.len(), model.len());
                    let seen: BTreeSet<i64> = keys.iter().copied().collect();
                    let expected: BTreeSet<i64> = model.keys().copied().collect();
                    prop_assert_eq!(seen, expected);
                    match sut.values() {
                        None => prop_assert!(model.is_empty()),
                        Some(values) => {
                            prop_assert_eq!(values.len(), model.len());
                            for (k, v) in keys.iter().zip(values) {
                                prop_assert_eq!(Some(v), model.get(k));
                            }
                        }
                    }
                }
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            check_structure(&sut)?;
        }
    }
}

// Property: with distinct values per key there are no structural hash
// collisions to speak of, so permissive puts and gets agree with the
// model too.
// Invariants exercised:
// - Resizes never lose an entry written before them.
// - Same-key puts report the previous value.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_permissive_put_get(pool in proptest::collection::btree_set(arb_key(), 1..=40),
                               rounds in 1usize..4) {
        let mut sut: LongMap<String> = LongMap::new();
        let mut model: HashMap<i64, String> = HashMap::new();

        for round in 0..rounds {
            for &k in &pool {
                let v = format!("{k}/{round}");
                prop_assert_eq!(sut.put(k, v.clone()), model.insert(k, v));
            }
            for (k, v) in &model {
                prop_assert_eq!(sut.get(*k), Some(v));
            }
            prop_assert_eq!(sut.len(), model.len());
            check_structure(&sut)?;
        }
    }
}
