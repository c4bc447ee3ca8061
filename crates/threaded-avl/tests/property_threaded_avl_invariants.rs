use std::collections::BTreeMap;

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use threaded_avl::ThreadedAvlMap;

fn seeds() -> [u64; 8] {
    [
        0x5eed_c0de_u64,
        0x0000_0000_0000_0001_u64,
        0x0000_0000_00c0_ffee_u64,
        0x0123_4567_89ab_cdef_u64,
        0x1111_2222_3333_4444_u64,
        0x89ab_cdef_0123_4567_u64,
        0xfedc_ba98_7654_3210_u64,
        0xa5a5_5a5a_dead_beef_u64,
    ]
}

fn cursor_keys(map: &mut ThreadedAvlMap<i64, usize>) -> Vec<i64> {
    let mut keys = Vec::with_capacity(map.size());
    map.begin();
    while let Some(k) = map.next() {
        keys.push(*k);
    }
    keys
}

/// Largest height an AVL tree with `n` nodes can reach.
fn avl_height_bound(n: usize) -> i32 {
    (1.4405 * ((n + 2) as f64).log2() - 0.3277).floor() as i32
}

#[test]
fn seeded_inserts_match_btree_model() {
    for seed in seeds() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        let mut map = ThreadedAvlMap::new();
        let mut model = BTreeMap::new();

        for step in 0..600usize {
            let key: i64 = rng.gen_range(-1_000..1_000);
            let fresh = !model.contains_key(&key);
            model.entry(key).or_insert(step);
            assert_eq!(map.insert(key, step), fresh, "seed={seed:#x} key={key}");
            map.assert_valid()
                .unwrap_or_else(|e| panic!("seed={seed:#x} step={step}: {e}"));
        }

        assert_eq!(map.size(), model.len(), "seed={seed:#x}");
        assert!(map.height() <= avl_height_bound(map.size()), "seed={seed:#x}");
        assert_eq!(
            cursor_keys(&mut map),
            model.keys().copied().collect::<Vec<_>>(),
            "seed={seed:#x}"
        );
        for (k, v) in &model {
            assert_eq!(map.search(k), Some(v), "seed={seed:#x} key={k}");
        }

        for _ in 0..50 {
            let a: i64 = rng.gen_range(-1_100..1_100);
            let b: i64 = rng.gen_range(-1_100..1_100);
            let (lower, upper) = (a.min(b), a.max(b));
            let expected: Vec<i64> = model.range(lower..=upper).map(|(k, _)| *k).collect();
            assert_eq!(
                map.range_search(&lower, &upper),
                expected,
                "seed={seed:#x} range=[{lower}, {upper}]"
            );
        }
    }
}

#[test]
fn seeded_copies_stay_independent() {
    for seed in seeds() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        let mut source = ThreadedAvlMap::new();
        for step in 0..200usize {
            source.insert(rng.gen_range(0..500i64), step);
        }
        let before = cursor_keys(&mut source);
        let height = source.height();

        let mut copy = source.clone();
        for step in 0..200usize {
            copy.insert(rng.gen_range(500..1_000i64), step);
            copy.assert_valid().unwrap();
        }

        assert_eq!(cursor_keys(&mut source), before, "seed={seed:#x}");
        assert_eq!(source.height(), height, "seed={seed:#x}");
        source.assert_valid().unwrap();

        let copy_keys = cursor_keys(&mut copy);
        source.insert(-1, 0);
        assert_eq!(cursor_keys(&mut copy), copy_keys, "seed={seed:#x}");
    }
}

proptest! {
    #[test]
    fn traversal_is_sorted_and_complete(keys in prop::collection::vec(-300i64..300, 0..150)) {
        let mut map = ThreadedAvlMap::new();
        for (i, k) in keys.iter().enumerate() {
            map.insert(*k, i);
            prop_assert!(map.assert_valid().is_ok());
        }

        let mut expected = keys.clone();
        expected.sort_unstable();
        expected.dedup();

        prop_assert_eq!(map.size(), expected.len());
        prop_assert_eq!(cursor_keys(&mut map), expected.clone());
        prop_assert_eq!(map.keys().copied().collect::<Vec<_>>(), expected.clone());
        prop_assert_eq!(map.iter().len(), expected.len());

        // The maximum has nothing to its right; every other target is larger.
        for k in &expected {
            match map.successor_of(k) {
                Some(s) => prop_assert!(s > k),
                None => prop_assert_eq!(Some(k), expected.last()),
            }
        }
    }

    #[test]
    fn duplicates_keep_first_value(keys in prop::collection::vec(0i64..40, 1..120)) {
        let mut map = ThreadedAvlMap::new();
        let mut first_seen = BTreeMap::new();
        for (i, k) in keys.iter().enumerate() {
            map.insert(*k, i);
            first_seen.entry(*k).or_insert(i);
        }
        prop_assert_eq!(map.size(), first_seen.len());
        for (k, v) in &first_seen {
            prop_assert_eq!(map.search(k), Some(v));
        }
    }

    #[test]
    fn range_search_matches_filter(
        keys in prop::collection::vec(-200i64..200, 0..120),
        lower in -250i64..250,
        upper in -250i64..250,
    ) {
        let map: ThreadedAvlMap<i64, ()> = keys.iter().map(|k| (*k, ())).collect();
        let mut expected: Vec<i64> = keys
            .iter()
            .copied()
            .filter(|k| lower <= *k && *k <= upper)
            .collect();
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(map.range_search(&lower, &upper), expected);
    }
}
