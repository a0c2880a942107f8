//! Integration tests for the concrete scenarios spec §8 seeds the suite
//! with.

use ordered_tree::{AvlTree, Bst};

#[test]
fn scenario_a_bst_basic_insert_order() {
    let mut t = Bst::new();
    for k in [11, 3, 15, 1, 8, 13, 16, 2, 6, 9, 12, 14, 4, 7, 10, 5] {
        t.add(k, k);
    }
    assert_eq!(t.size(), 16);
    let keys: Vec<i32> = t.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, (1..=16).collect::<Vec<_>>());
    assert!(t.has(&11));
    assert!(!t.has(&100));
}

#[test]
fn scenario_b_bst_delete_cases() {
    let mut t = Bst::new();
    for k in [11, 3, 15, 1, 8, 13, 16, 2, 6, 9, 12, 14, 4, 7, 10, 5] {
        t.add(k, k);
    }
    let mut size = t.size();
    for k in [1, 2, 3] {
        assert!(!t.delete(&k).is_empty());
        assert!(!t.has(&k));
        size -= 1;
        assert_eq!(t.size(), size);
        let keys: Vec<i32> = t.iter().map(|(k, _)| *k).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn scenario_c_range_search() {
    let mut t = AvlTree::new();
    for minute in 0..30 {
        t.add(minute, format!("reading@{minute}"));
    }
    let results = t.range_search(&5, &15, true, true);
    assert_eq!(results.len(), 11);
    let keys: Vec<i32> = results.into_iter().map(|n| *n.key()).collect();
    assert_eq!(keys, (5..=15).collect::<Vec<_>>());
}

#[test]
fn scenario_d_avl_balance_after_adversarial_insert() {
    let mut t = AvlTree::new();
    for k in 1..=7 {
        t.add(k, k);
        assert!(t.is_avl_balanced(), "unbalanced after inserting {k}");
    }
    assert_eq!(t.get_height(ordered_tree::IterationType::Iterative), 2);
}

#[test]
fn scenario_e_order_predicate_navigation() {
    let mut t = Bst::new();
    for k in [10, 20, 30, 40, 50] {
        t.add(k, k);
    }
    assert_eq!(t.ceiling(&25).map(|n| *n.key()), Some(30));
    assert_eq!(t.higher(&30).map(|n| *n.key()), Some(40));
    assert_eq!(t.floor(&25).map(|n| *n.key()), Some(20));
    assert_eq!(t.lower(&30).map(|n| *n.key()), Some(20));
    assert_eq!(t.ceiling(&50).map(|n| *n.key()), Some(50));
    assert_eq!(t.higher(&50).map(|n| *n.key()), None);
}

#[test]
fn scenario_f_clone_and_filter() {
    let mut t = Bst::new();
    for k in 1..=10 {
        t.add(k, k * 10);
    }
    let filtered = t.filter(|k, _| k % 2 == 0);
    assert_eq!(filtered.size(), 5);
    let keys: Vec<i32> = filtered.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![2, 4, 6, 8, 10]);
    // source unchanged
    assert_eq!(t.size(), 10);
    t.add(11, 110);
    assert_eq!(filtered.size(), 5);
}
