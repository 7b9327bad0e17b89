//! Property tests for `SplayMap` and `SplaySet`, checked against `BTreeMap` and `BTreeSet`.

use proptest::prelude::*;
use splay_collections::splay_tree::{SplayMap, SplaySet};
use splay_collections::Error;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug)]
enum Op {
    Insert(i16, i32),
    Remove(i16),
    Get(i16),
    Before(i16),
    After(i16),
    First,
    Last,
}

fn operations(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            3 => (any::<i16>(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
            2 => any::<i16>().prop_map(Op::Remove),
            1 => any::<i16>().prop_map(Op::Get),
            1 => any::<i16>().prop_map(Op::Before),
            1 => any::<i16>().prop_map(Op::After),
            1 => Just(Op::First),
            1 => Just(Op::Last),
        ],
        0..max_ops,
    )
}

/// Steps a reader takes between two mutations.
#[derive(Clone, Debug)]
enum Interleaved {
    Lookup(u8),
    Insert(u8),
    Remove(u8),
}

fn small_keys(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..max_len)
}

proptest! {
    #[test]
    fn map_matches_btreemap(ops in operations(400)) {
        let mut map = SplayMap::new();
        let mut expected = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => prop_assert_eq!(map.insert(k, v), Ok(expected.insert(k, v))),
                Op::Remove(k) => prop_assert_eq!(map.remove(&k), expected.remove_entry(&k)),
                Op::Get(k) => prop_assert_eq!(map.get(&k), expected.get(&k)),
                Op::Before(k) => prop_assert_eq!(
                    map.last_key_before(&k),
                    Ok(expected.range(..k).next_back().map(|(k, _)| k))
                ),
                Op::After(k) => prop_assert_eq!(
                    map.first_key_after(&k),
                    Ok(expected.range((std::ops::Bound::Excluded(k), std::ops::Bound::Unbounded))
                        .next()
                        .map(|(k, _)| k))
                ),
                Op::First => prop_assert_eq!(map.first_key(), expected.keys().next()),
                Op::Last => prop_assert_eq!(map.last_key(), expected.keys().next_back()),
            }
            prop_assert_eq!(map.len(), expected.len());
        }

        let keys = map.keys().cloned().collect::<Vec<i16>>();
        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(map.iter().eq(expected.iter()));
    }

    #[test]
    fn insert_then_remove_restores(keys in small_keys(100), extra in any::<u8>()) {
        let mut set = SplaySet::new();
        set.insert_all(keys.iter().cloned()).unwrap();
        let before = set.iter().cloned().collect::<Vec<u8>>();

        if !before.contains(&extra) {
            prop_assert_eq!(set.insert(extra), Ok(true));
            prop_assert!(set.contains(&extra));
            prop_assert!(set.remove(&extra));
        }
        prop_assert_eq!(set.iter().cloned().collect::<Vec<u8>>(), before);
    }

    #[test]
    fn clone_is_independent(keys in small_keys(100), removed in small_keys(20)) {
        let original = {
            let mut set = SplaySet::new();
            set.insert_all(keys.iter().cloned()).unwrap();
            set
        };
        let snapshot = original.iter().cloned().collect::<Vec<u8>>();

        let mut copy = original.clone();
        copy.remove_all(&removed);
        copy.insert(0).unwrap();

        prop_assert_eq!(original.iter().cloned().collect::<Vec<u8>>(), snapshot);
        prop_assert_eq!(original.len(), keys.iter().collect::<BTreeSet<_>>().len());
    }

    #[test]
    fn cursor_follows_modification_rules(
        keys in small_keys(60),
        steps in prop::collection::vec(
            prop_oneof![
                4 => any::<u8>().prop_map(Interleaved::Lookup),
                1 => any::<u8>().prop_map(Interleaved::Insert),
                1 => any::<u8>().prop_map(Interleaved::Remove),
            ],
            0..60,
        ),
    ) {
        let mut set = SplaySet::new();
        set.insert_all(keys.iter().cloned()).unwrap();
        let expected = set.iter().cloned().collect::<Vec<u8>>();

        let mut cursor = set.cursor();
        let mut visited = Vec::new();
        let mut modified = false;
        let mut steps = steps.into_iter();

        loop {
            match cursor.next(&mut set) {
                Ok(Some(key)) => visited.push(*key),
                Ok(None) => {
                    prop_assert!(!modified);
                    prop_assert_eq!(&visited, &expected);
                    break;
                },
                Err(error) => {
                    prop_assert_eq!(error, Error::ConcurrentModification);
                    prop_assert!(modified);
                    break;
                },
            }
            match steps.next() {
                Some(Interleaved::Lookup(key)) => {
                    set.contains(&key);
                },
                Some(Interleaved::Insert(key)) => modified |= set.insert(key).unwrap(),
                Some(Interleaved::Remove(key)) => modified |= set.remove(&key),
                None => {},
            }
        }
        prop_assert_eq!(&visited[..], &expected[..visited.len()]);
    }

    #[test]
    fn set_algebra_matches_btreeset(a in small_keys(60), b in small_keys(60)) {
        let mut left = SplaySet::new();
        left.insert_all(a.iter().cloned()).unwrap();
        let mut right = SplaySet::new();
        right.insert_all(b.iter().cloned()).unwrap();
        let expected_left = a.iter().cloned().collect::<BTreeSet<u8>>();
        let expected_right = b.iter().cloned().collect::<BTreeSet<u8>>();

        prop_assert!(left
            .intersection(&right)
            .iter()
            .eq(expected_left.intersection(&expected_right)));
        prop_assert!(left
            .difference(&right)
            .iter()
            .eq(expected_left.difference(&expected_right)));
        prop_assert!(left
            .union(&right)
            .unwrap()
            .iter()
            .eq(expected_left.union(&expected_right)));
    }
}
