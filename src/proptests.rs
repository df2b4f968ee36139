use crate::{
    hashing::{DefaultHashing, Equality, HashingAlgorithm},
    map::Map,
};

use proptest::{prelude::*, test_runner::TestCaseError};
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u16),
    Remove(u16),
    Get(u16),
}

// Collides in every level for keys congruent modulo 16.
fn colliding(key: &u16) -> u32 {
    u32::from(*key % 16)
}

// Shares the first four levels for all keys.
fn deep(key: &u16) -> u32 {
    u32::from(*key) << 22
}

fn key_strategy() -> impl Strategy<Value = u16> + Clone {
    0..1024u16
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), any::<u16>()).prop_map(|(k, v)| Op::Insert(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        25 => key.clone().prop_map(Op::Get),
    ];
    prop::collection::vec(op, 0..=512)
}

fn check_model<H: HashingAlgorithm<u16> + Clone>(
    mut map: Map<u16, u16, Equality, H>,
    ops: &[Op],
) -> Result<(), TestCaseError> {
    let mut model = HashMap::new();

    for op in ops {
        match *op {
            Op::Insert(key, value) => {
                map = map.insert(key, value);
                model.insert(key, value);

                prop_assert_eq!(map.get(&key), Some(&value));
            }
            Op::Remove(key) => {
                map = map.remove(&key);
                model.remove(&key);

                prop_assert_eq!(map.get(&key), None);
            }
            Op::Get(key) => {
                prop_assert_eq!(map.get(&key), model.get(&key));
            }
        }

        prop_assert_eq!(map.len(), model.len());
    }

    prop_assert_eq!(map.iter().count(), model.len());
    prop_assert_eq!(
        map.iter()
            .map(|(key, value)| (*key, *value))
            .collect::<HashMap<_, _>>(),
        model
    );

    Ok(())
}

fn build<H: HashingAlgorithm<u16> + Clone>(
    hashing: H,
    keys: &[u16],
) -> Map<u16, u16, Equality, H> {
    Map::with_strategies(Equality, hashing).extend(keys.iter().map(|&key| (key, key)))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        check_model(Map::new(), &ops)?;
    }

    #[test]
    fn prop_equivalence_colliding(ops in ops_strategy()) {
        check_model(Map::with_strategies(Equality, colliding), &ops)?;
    }

    #[test]
    fn prop_equivalence_deep(ops in ops_strategy()) {
        check_model(Map::with_strategies(Equality, deep), &ops)?;
    }

    #[test]
    fn prop_confluence(
        keys in prop::collection::vec(key_strategy(), 0..64),
        one in key_strategy(),
        other in key_strategy(),
    ) {
        prop_assume!(one != other);

        let map = build(colliding, &keys);

        prop_assert_eq!(
            map.insert(one, 1).insert(other, 2),
            map.insert(other, 2).insert(one, 1)
        );
    }

    #[test]
    fn prop_insertion_order_independence(keys in prop::collection::vec(key_strategy(), 0..256)) {
        let reversed = keys.iter().rev().copied().collect::<Vec<_>>();

        prop_assert_eq!(build(DefaultHashing, &keys), build(DefaultHashing, &reversed));
        prop_assert_eq!(build(deep, &keys), build(deep, &reversed));
        prop_assert_eq!(build(colliding, &keys), build(colliding, &reversed));
    }

    #[test]
    fn prop_idempotent_insert(
        keys in prop::collection::vec(key_strategy(), 0..64),
        key in key_strategy(),
        value in any::<u16>(),
    ) {
        let map = build(colliding, &keys).insert(key, value);

        prop_assert_eq!(map.insert(key, value), map.clone());
    }

    #[test]
    fn prop_removal_round_trip(
        keys in prop::collection::vec(key_strategy(), 0..64),
        key in key_strategy(),
        value in any::<u16>(),
    ) {
        prop_assume!(!keys.contains(&key));

        let map = build(DefaultHashing, &keys);
        prop_assert_eq!(map.insert(key, value).remove(&key), map.clone());

        let map = build(colliding, &keys);
        prop_assert_eq!(map.insert(key, value).remove(&key), map.clone());

        let map = build(deep, &keys);
        prop_assert_eq!(map.insert(key, value).remove(&key), map.clone());
    }

    #[test]
    fn prop_history_independence(
        keys in prop::collection::vec(key_strategy(), 0..64),
        removed in prop::collection::vec(key_strategy(), 0..64),
    ) {
        let kept = keys
            .iter()
            .copied()
            .filter(|key| !removed.contains(key))
            .collect::<Vec<_>>();
        let map = removed
            .iter()
            .fold(build(deep, &keys), |map, key| map.remove(key));

        prop_assert_eq!(map, build(deep, &kept));
    }

    #[test]
    fn prop_no_op_removal(
        keys in prop::collection::vec(key_strategy(), 0..64),
        key in key_strategy(),
    ) {
        let map = build(deep, &keys);

        prop_assume!(!map.contains_key(&key));

        prop_assert_eq!(map.remove(&key), map.clone());
    }

    #[test]
    fn prop_old_versions_survive(
        keys in prop::collection::vec(key_strategy(), 1..64),
        key in key_strategy(),
    ) {
        let map = build(colliding, &keys);
        let other = map.insert(key, u16::MAX).remove(&keys[0]);

        for &key in &keys {
            prop_assert_eq!(map.get(&key), Some(&key));
        }

        prop_assert_eq!(
            other.get(&key),
            if key == keys[0] { None } else { Some(&u16::MAX) }
        );
    }

    #[test]
    fn prop_repeated_iteration(keys in prop::collection::vec(key_strategy(), 0..256)) {
        let map = build(colliding, &keys);

        prop_assert!(map.iter().eq(map.iter()));
        prop_assert!(map
            .clone()
            .into_iter()
            .eq(map.iter().map(|(key, value)| (*key, *value))));
    }
}
