use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Checks ordering, coloring, threading and first/last bookkeeping.
fn validate_tree(t: &Tree) {
    let Some(root) = t.root else {
        assert!(t.entries.is_empty(), "entries without a root");
        assert_eq!(t.first, None);
        assert_eq!(t.last, None);
        return;
    };
    assert!(t.is_black(root), "root must be black");

    // In-order walk over real children only.
    let mut order: Vec<NodeId> = Vec::with_capacity(t.len());
    let mut stack: Vec<NodeId> = Vec::new();
    let mut cur = Some(root);
    while cur.is_some() || !stack.is_empty() {
        while let Some(id) = cur {
            stack.push(id);
            cur = t.node(id).left();
        }
        let id = stack.pop().expect("stack is non-empty");
        order.push(id);
        cur = t.node(id).right();
    }
    assert_eq!(order.len(), t.len(), "every entry must be reachable");

    for pair in order.windows(2) {
        assert!(
            t.node(pair[0]).key() < t.node(pair[1]).key(),
            "keys must be strictly increasing in order"
        );
    }
    assert_eq!(t.first, order.first().copied(), "first entry");
    assert_eq!(t.last, order.last().copied(), "last entry");

    for (i, &id) in order.iter().enumerate() {
        let e = t.node(id);
        let pred = i.checked_sub(1).map(|p| order[p]);
        let succ = order.get(i + 1).copied();
        if e.is_predecessor_threaded() {
            assert_eq!(e.predecessor(), pred, "predecessor thread of {}", e.key());
            assert_eq!(e.link(Dir::Left) == Link::None, pred.is_none());
        }
        if e.is_successor_threaded() {
            assert_eq!(e.successor(), succ, "successor thread of {}", e.key());
            assert_eq!(e.link(Dir::Right) == Link::None, succ.is_none());
        }
        assert_eq!(t.predecessor(id), pred);
        assert_eq!(t.successor(id), succ);

        if !e.is_black() {
            for child in [e.left(), e.right()].into_iter().flatten() {
                assert!(t.is_black(child), "red entry {} has a red child", e.key());
            }
        }
    }

    black_height(t, Some(root));

    let walked: Vec<i32> = t.iter().map(|(k, _)| k).collect();
    let expected: Vec<i32> = order.iter().map(|&id| t.node(id).key()).collect();
    assert_eq!(walked, expected, "threaded walk must match structural order");
}

fn black_height(t: &Tree, id: Option<NodeId>) -> usize {
    let Some(id) = id else {
        return 1;
    };
    let e = t.node(id);
    let left = black_height(t, e.left());
    let right = black_height(t, e.right());
    assert_eq!(left, right, "black height differs below {}", e.key());
    left + usize::from(e.is_black())
}

fn random_tree(n: usize, seed: u64) -> (Tree, BTreeMap<i32, i32>) {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    let mut t = Tree::new();
    let mut m = BTreeMap::new();
    while m.len() < n {
        let k = rng.gen_range(-1_000_000..1_000_000);
        let v = rng.gen_range(1..1_000);
        assert_eq!(t.put(k, v), m.insert(k, v).unwrap_or(ABSENT));
    }
    (t, m)
}

#[test]
fn red_black_invariants_at_various_sizes() {
    for (seed, n) in [0, 1, 2, 100, 10_000].into_iter().enumerate() {
        let (t, m) = random_tree(n, seed as u64);
        validate_tree(&t);
        assert_eq!(t.len(), n);
        let got: Vec<(i32, i32)> = t.iter().collect();
        let expected: Vec<(i32, i32)> = m.into_iter().collect();
        assert_eq!(got, expected);
    }
}

#[test]
fn threads_hold_after_every_insert() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(100 + seed);
        let mut t = Tree::new();
        for _ in 0..600 {
            t.put(rng.gen_range(-400..400), 1);
            validate_tree(&t);
        }
    }
}

#[test]
fn monotonic_inserts_stay_valid() {
    let mut up = Tree::new();
    let mut down = Tree::new();
    for k in 0..2_000 {
        up.put(k, k);
        down.put(-k, k);
    }
    validate_tree(&up);
    validate_tree(&down);
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 3)]
    Put(
        #[proptest(strategy = "-64i32..64")] i32,
        #[proptest(strategy = "1i32..1000")] i32,
    ),
    Get(#[proptest(strategy = "-64i32..64")] i32),
    Jump(#[proptest(strategy = "-66i32..66")] i32),
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreemap(ops in prop::collection::vec(any::<Op>(), 0..=400)) {
        let mut t = Tree::new();
        let mut m: BTreeMap<i32, i32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Put(key, value) => {
                    let old_m = m.insert(key, value).unwrap_or(ABSENT);
                    prop_assert_eq!(t.put(key, value), old_m);
                    validate_tree(&t);
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(key), m.get(&key).copied().unwrap_or(ABSENT));
                    prop_assert_eq!(t.contains_key(key), m.contains_key(&key));
                }
                Op::Jump(key) => {
                    let mut it = t.key_iter();
                    it.jump(key);
                    let above = m.range(key + 1..).next().map(|(&k, _)| k);
                    let below = m.range(..=key).next_back().map(|(&k, _)| k);
                    prop_assert_eq!(it.peek_next_key(), above);
                    if let Some(k) = above {
                        prop_assert_eq!(it.next_key(), k);
                        prop_assert_eq!(it.current_value(), m.get(&k).copied());
                        it.previous_key();
                    }
                    if let Some(k) = below {
                        prop_assert_eq!(it.previous_key(), k);
                    } else {
                        prop_assert!(!it.has_previous());
                    }
                }
            }
            prop_assert_eq!(t.len(), m.len());
        }

        let got: Vec<(i32, i32)> = t.iter().collect();
        let expected: Vec<(i32, i32)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_cursor_walks_both_ways(keys in prop::collection::btree_set(any::<i32>(), 0..200)) {
        let t: Tree = keys.iter().map(|&k| (k, 1)).collect();
        validate_tree(&t);

        let mut it = t.key_iter();
        let mut forward = Vec::new();
        while it.has_next() {
            forward.push(it.next_key());
        }
        let mut backward = Vec::new();
        while it.has_previous() {
            backward.push(it.previous_key());
        }
        backward.reverse();

        let expected: Vec<i32> = keys.into_iter().collect();
        prop_assert_eq!(&forward, &expected);
        prop_assert_eq!(&backward, &expected);
    }
}

/// Visits every ordering of `keys` (Heap's algorithm, iterative).
fn each_insert_order(keys: &[i32], mut visit: impl FnMut(&[i32])) {
    let mut order = keys.to_vec();
    let mut counters = vec![0usize; order.len()];
    visit(&order);

    let mut i = 1;
    while i < order.len() {
        if counters[i] < i {
            let j = if i % 2 == 0 { 0 } else { counters[i] };
            order.swap(j, i);
            visit(&order);
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = [-3, 0, 1, 4, 9, 10, 20];

    let mut orders = 0;
    each_insert_order(&keys, |perm| {
        orders += 1;
        let mut t = Tree::new();
        for (i, &k) in perm.iter().enumerate() {
            assert_eq!(t.put(k, i as i32 + 1), ABSENT);
            validate_tree(&t);
        }
        let got: Vec<i32> = t.iter().map(|(k, _)| k).collect();
        assert_eq!(got, keys.to_vec());
    });
    assert_eq!(orders, 5040);
}
