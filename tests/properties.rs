//! Property-based tests for spec §8's universal and BST/AVL invariants
//! (P1-P11).

use proptest::prelude::*;

use ordered_tree::{AvlTree, Bst, DfsOrder, FamilyPosition, TraversalOptions};

fn small_key_set() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-200i32..200, 0..80)
}

proptest! {
    // P1: parent consistency. get_path_to_root walks parent links back
    // to the root; if any link were broken the walk would never reach
    // the actual root id, so comparing the final hop against root()
    // exercises every parent pointer transitively.
    #[test]
    fn p1_parent_consistency(keys in small_key_set()) {
        let t: Bst<i32, i32> = keys.iter().map(|&k| (k, k)).collect();
        for &k in &keys {
            if let Some(path) = t.get_path_to_root(&k, false) {
                let root_key = *t.root().unwrap().key();
                prop_assert_eq!(*path.last().unwrap().key(), root_key);
            }
        }
    }

    // P2: size equals the number of real nodes reachable from root.
    #[test]
    fn p2_size_matches_reachable_count(keys in small_key_set()) {
        let t: Bst<i32, i32> = keys.iter().map(|&k| (k, k)).collect();
        let reachable = t.dfs(DfsOrder::In, TraversalOptions::new()).len();
        prop_assert_eq!(t.size(), reachable);
    }

    // P3: DFS(in) and BFS each visit every real node exactly once.
    #[test]
    fn p3_traversal_totality(keys in small_key_set()) {
        let t: Bst<i32, i32> = keys.iter().map(|&k| (k, k)).collect();
        let dfs_keys: std::collections::BTreeSet<i32> =
            t.dfs(DfsOrder::In, TraversalOptions::new()).into_iter().map(|n| *n.key()).collect();
        let bfs_keys: std::collections::BTreeSet<i32> =
            t.bfs(TraversalOptions::new()).into_iter().map(|n| *n.key()).collect();
        let expected: std::collections::BTreeSet<i32> = keys.iter().copied().collect();
        prop_assert_eq!(&dfs_keys, &expected);
        prop_assert_eq!(&bfs_keys, &expected);
        prop_assert_eq!(t.dfs(DfsOrder::In, TraversalOptions::new()).len(), t.size());
        prop_assert_eq!(t.bfs(TraversalOptions::new()).len(), t.size());
    }

    // P4: clone is a fully independent copy with equivalent in-order
    // traversal (this crate's resolution of the shared-store Open
    // Question — see DESIGN.md).
    #[test]
    fn p4_clone_equivalence_and_independence(keys in small_key_set()) {
        let mut t: Bst<i32, i32> = keys.iter().map(|&k| (k, k)).collect();
        let clone = t.clone();
        let before: Vec<i32> = t.iter().map(|(k, _)| *k).collect();
        let clone_keys: Vec<i32> = clone.iter().map(|(k, _)| *k).collect();
        prop_assert_eq!(&before, &clone_keys);

        t.add(10_000, 1);
        prop_assert_eq!(clone.size() + 1, t.size());
        prop_assert!(!clone.has(&10_000));
    }

    // P6: in-order traversal of a BST is strictly increasing.
    #[test]
    fn p6_bst_order(keys in small_key_set()) {
        let t: Bst<i32, i32> = keys.iter().map(|&k| (k, k)).collect();
        let ordered: Vec<i32> = t.iter().map(|(k, _)| *k).collect();
        prop_assert!(ordered.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(t.is_bst());
    }

    // P7: adding an existing key replaces the value and does not change size.
    #[test]
    fn p7_add_idempotence_on_key(keys in small_key_set()) {
        prop_assume!(!keys.is_empty());
        let mut t: Bst<i32, i32> = keys.iter().map(|&k| (k, k)).collect();
        let size_before = t.size();
        let k = keys[0];
        t.add(k, 999_999);
        prop_assert_eq!(t.size(), size_before);
        prop_assert_eq!(t.get(&k), Some(&999_999));
    }

    // P8: range search returns exactly the keys within [low, high].
    #[test]
    fn p8_range_pruning_correctness(keys in small_key_set(), a in -200i32..200, b in -200i32..200) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let t: Bst<i32, i32> = keys.iter().map(|&k| (k, k)).collect();
        let got: std::collections::BTreeSet<i32> =
            t.range_search(&low, &high, true, true).into_iter().map(|n| *n.key()).collect();
        let expected: std::collections::BTreeSet<i32> =
            keys.iter().copied().filter(|&k| k >= low && k <= high).collect();
        prop_assert_eq!(got, expected);
    }

    // P9: order-predicate navigation matches the brute-force definitions.
    #[test]
    fn p9_order_predicate_correctness(keys in small_key_set(), target in -200i32..200) {
        let t: Bst<i32, i32> = keys.iter().map(|&k| (k, k)).collect();
        let mut sorted: Vec<i32> = keys.iter().copied().collect();
        sorted.sort_unstable();
        sorted.dedup();

        let expected_ceiling = sorted.iter().copied().find(|&k| k >= target);
        let expected_higher = sorted.iter().copied().find(|&k| k > target);
        let expected_floor = sorted.iter().copied().rev().find(|&k| k <= target);
        let expected_lower = sorted.iter().copied().rev().find(|&k| k < target);

        prop_assert_eq!(t.ceiling(&target).map(|n| *n.key()), expected_ceiling);
        prop_assert_eq!(t.higher(&target).map(|n| *n.key()), expected_higher);
        prop_assert_eq!(t.floor(&target).map(|n| *n.key()), expected_floor);
        prop_assert_eq!(t.lower(&target).map(|n| *n.key()), expected_lower);
    }

    // P10: after perfectlyBalance(), height <= ceil(log2(size+1)).
    #[test]
    fn p10_perfect_balance_height_bound(keys in small_key_set()) {
        prop_assume!(!keys.is_empty());
        let mut t: Bst<i32, i32> = keys.iter().map(|&k| (k, k)).collect();
        t.perfectly_balance();
        let size = t.size();
        let bound = ((size + 1) as f64).log2().ceil() as i32;
        prop_assert!(t.get_height(ordered_tree::IterationType::Iterative) <= bound);
    }

    // P11: after every add/delete, |bf(n)| <= 1 for all n.
    #[test]
    fn p11_avl_balance_factor_invariant(keys in small_key_set()) {
        let mut t: AvlTree<i32, i32> = AvlTree::new();
        for &k in &keys {
            t.add(k, k);
            prop_assert!(t.is_avl_balanced());
        }
        let mut seen = std::collections::BTreeSet::new();
        for &k in &keys {
            if seen.insert(k) {
                t.delete(&k);
                prop_assert!(t.is_avl_balanced());
            }
        }
    }

    // Family position is a pure function of parent/child presence (§4.1):
    // the root is never MalNode, and every non-root reachable node has a
    // determinate left/right position.
    #[test]
    fn family_position_never_malformed_on_a_well_formed_tree(keys in small_key_set()) {
        let t: Bst<i32, i32> = keys.iter().map(|&k| (k, k)).collect();
        for &k in &keys {
            if let Some(pos) = t.family_position(&k) {
                prop_assert_ne!(pos, FamilyPosition::MalNode);
            }
        }
    }
}
