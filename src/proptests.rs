use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;
use std::ops::Bound;

type Model = BTreeMap<String, i64>;
type StrTrie = Trie<char, i64, StringConcat>;

fn key_strategy() -> impl Strategy<Value = String> {
    // A small alphabet makes shared prefixes, and keys that are prefixes of
    // other keys, the common case. Empty keys exercise rejection.
    "[abc]{0,6}"
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 40)]
    Insert(#[proptest(strategy = "key_strategy()")] String, i64),
    #[proptest(weight = 10)]
    Assign(#[proptest(strategy = "key_strategy()")] String, i64),
    #[proptest(weight = 25)]
    Remove(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 10)]
    Get(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 10)]
    Bounds(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 3)]
    EraseFirst,
    #[proptest(weight = 1)]
    Compact,
    #[proptest(weight = 1)]
    Clear,
}

fn assert_same_contents(t: &StrTrie, m: &Model) {
    t.validate();
    assert_eq!(t.len(), m.len());

    let got: Vec<(String, i64)> = t.iter().map(|(k, v)| (k, *v)).collect();
    let expected: Vec<(String, i64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
    assert_eq!(got, expected);

    let back: Vec<String> = t.keys().rev().collect();
    let expected_back: Vec<String> = m.keys().rev().cloned().collect();
    assert_eq!(back, expected_back);
}

fn first_at_or_after(m: &Model, key: &str) -> Option<String> {
    m.range::<str, _>((Bound::Included(key), Bound::Unbounded))
        .next()
        .map(|(k, _)| k.clone())
}

fn first_after(m: &Model, key: &str) -> Option<String> {
    m.range::<str, _>((Bound::Excluded(key), Bound::Unbounded))
        .next()
        .map(|(k, _)| k.clone())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=500)) {
        let mut t = StrTrie::new(StringConcat);
        let mut m = Model::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let res = t.insert(&key, value);
                    if key.is_empty() {
                        prop_assert_eq!(res, Err(TrieError::InvalidKey));
                    } else {
                        let inserted = !m.contains_key(&key);
                        m.entry(key.clone()).or_insert(value);
                        let (pos, flag) = res.unwrap();
                        prop_assert_eq!(flag, inserted);
                        prop_assert_eq!(t.cursor(pos).and_then(|c| c.key()), Some(key));
                    }
                }
                Op::Assign(key, value) => {
                    let res = t.insert_or_assign(&key, value);
                    if key.is_empty() {
                        prop_assert!(res.is_err());
                    } else {
                        let inserted = m.insert(key, value).is_none();
                        prop_assert_eq!(res.map(|(_, flag)| flag), Ok(inserted));
                    }
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove(&key), m.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key).copied(), m.get(&key).copied());
                    prop_assert_eq!(t.count(&key), usize::from(m.contains_key(&key)));
                }
                Op::Bounds(key) => {
                    prop_assert_eq!(t.lower_bound(&key).key(), first_at_or_after(&m, &key));
                    prop_assert_eq!(t.upper_bound(&key).key(), first_after(&m, &key));

                    let under: Vec<String> = t.prefix_iter(&key).map(|(k, _)| k).collect();
                    let expected: Vec<String> =
                        m.keys().filter(|k| k.starts_with(key.as_str())).cloned().collect();
                    prop_assert_eq!(under, expected);

                    let longest = m
                        .keys()
                        .filter(|k| key.starts_with(k.as_str()))
                        .max_by_key(|k| k.len())
                        .cloned();
                    prop_assert_eq!(t.longest_prefix_of(&key).key(), longest);
                }
                Op::EraseFirst => {
                    let begin = t.begin().position();
                    match m.pop_first() {
                        Some(_) => {
                            let next = t.erase(begin).unwrap();
                            prop_assert_eq!(next, t.begin().position());
                        }
                        None => {
                            prop_assert_eq!(t.erase(begin), Err(TrieError::InvalidPosition));
                        }
                    }
                }
                Op::Compact => {
                    t.compact();
                }
                Op::Clear => {
                    t.clear();
                    m.clear();
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        assert_same_contents(&t, &m);

        let copy = t.clone();
        prop_assert_eq!(&copy, &t);
        copy.validate();
    }

    #[test]
    fn prop_erase_range_matches_model(
        keys in prop::collection::btree_set("[ab]{1,5}", 0..40),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let mut t = StrTrie::new(StringConcat);
        let mut m = Model::new();
        for (i, k) in keys.iter().enumerate() {
            t.insert(k, i as i64).unwrap();
            m.insert(k.clone(), i as i64);
        }

        // Pick two positions in order, the end included.
        let n = m.len() + 1;
        let (lo, hi) = {
            let (x, y) = (a.index(n), b.index(n));
            (x.min(y), x.max(y))
        };
        let nth = |i: usize| {
            let mut c = t.begin();
            for _ in 0..i {
                c.move_next();
            }
            c.position()
        };
        let (first, last) = (nth(lo), nth(hi));

        let doomed: Vec<String> = m.keys().skip(lo).take(hi - lo).cloned().collect();
        for k in &doomed {
            m.remove(k);
        }

        let after = t.erase_range(first, last).unwrap();
        prop_assert_eq!(after, last);
        assert_same_contents(&t, &m);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

const SMALL_SET: [&str; 6] = ["a", "b", "c", "aa", "ab", "aab"];

#[test]
fn exhaustive_insert_order_small_set() {
    let mut shape: Option<usize> = None;

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = StrTrie::new(StringConcat);
        let mut m = Model::new();

        for (i, k) in perm.into_iter().enumerate() {
            let v = i as i64;
            assert!(t.insert(k, v).unwrap().1);
            m.insert(k.to_string(), v);
        }

        assert_same_contents(&t, &m);
        // The tree shape does not depend on insertion order.
        let nodes = *shape.get_or_insert(t.node_count());
        assert_eq!(t.node_count(), nodes);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    // Insert in a fixed order, then remove in all permutations.
    let mut base_trie = StrTrie::new(StringConcat);
    let mut base_map = Model::new();
    for (i, k) in SMALL_SET.iter().enumerate() {
        base_trie.insert(*k, i as i64).unwrap();
        base_map.insert(k.to_string(), i as i64);
    }

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = base_trie.clone();
        let mut m = base_map.clone();

        for k in perm {
            assert_eq!(t.remove(k), m.remove(k));
            assert_same_contents(&t, &m);
        }
        assert!(t.is_empty());
        assert_eq!(t.node_count(), 1);
    });
}

#[test]
fn exhaustive_erase_by_position_small_set() {
    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = StrTrie::from_pairs(StringConcat, SMALL_SET.iter().map(|k| (*k, 0))).unwrap();
        let mut m: Model = SMALL_SET.iter().map(|k| (k.to_string(), 0)).collect();

        for k in perm {
            let pos = t.find(k).position();
            let next = t.erase(pos).unwrap();
            m.remove(k);
            assert_eq!(t.cursor(next).and_then(|c| c.key()), first_after(&m, k));
            assert!(t.cursor(pos).is_none());
        }
        assert_same_contents(&t, &m);
    });
}
