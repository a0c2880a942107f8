//! Ordered map core: a binary tree substrate with a plain [`BinaryTree`],
//! an unbalanced [`Bst`], a height-balanced [`AvlTree`], and a
//! [`RedBlackTree`], plus the [`TreeMultiMap`]/[`TreeMultiSet`]/[`TreeSet`]
//! adapters built on top of them. Every variant shares one node arena
//! substrate ([`NodeId`]-addressed, no `Rc<RefCell<_>>`, no `unsafe`), a
//! pluggable ordering ([`Comparator`]), a storage-mode switch between a
//! boxed value kept on the node and an external map (§3.3), and the same
//! traversal surface (`dfs`, `bfs`, `listLevels`, `morris`, ASCII
//! `toVisual`/`print`).
//!
//! # Stack depth
//!
//! Every traversal entry point accepts an [`iteration::IterationType`]
//! override. Recursive variants are simpler but their stack depth is
//! proportional to tree height — unbounded on an unbalanced [`Bst`] or
//! [`BinaryTree`], `O(log n)` on [`AvlTree`]/[`RedBlackTree`]. Callers with
//! bounded stack space should pass `IterationType::Iterative` explicitly
//! rather than rely on the tree's configured default.
//!
//! # Concurrency
//!
//! The core is single-threaded and synchronous: no operation blocks,
//! awaits, or yields. A tree is not safe for concurrent mutation; readers
//! sharing an immutable instance across threads must synchronize
//! externally (see `TreeCore`'s internals — there is no internal locking).

pub mod arena;
pub mod avl;
pub mod binary_tree;
pub mod bst;
pub mod comparator;
mod core;
pub mod error;
pub mod iteration;
pub mod multi;
pub mod node;
pub mod options;
pub mod redblack;
mod visual;

pub use arena::NodeId;
pub use avl::AvlTree;
pub use binary_tree::BinaryTree;
pub use bst::Bst;
pub use comparator::Comparator;
pub use error::{Result, TreeError};
pub use iteration::{DfsOrder, IterationType, TraversalOptions};
pub use multi::{TreeMultiMap, TreeMultiSet, TreeSet};
pub use node::{ChildSlot, Color, FamilyPosition, Node};
pub use options::{OrderedOptions, TreeOptions};
pub use redblack::RedBlackTree;
pub use visual::VisualOptions;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bst_basic_insert_get_delete() {
        let mut t = Bst::new();
        for (k, v) in [(5, "e"), (3, "c"), (8, "h"), (1, "a"), (4, "d")] {
            assert!(t.add(k, v));
        }
        assert_eq!(t.size(), 5);
        assert_eq!(t.get(&3), Some(&"c"));
        assert!(t.delete(&3).len() == 1);
        assert_eq!(t.get(&3), None);
        assert_eq!(t.size(), 4);
    }

    #[test]
    fn in_order_iteration_is_sorted() {
        let t: Bst<i32, i32> = [5, 3, 8, 1, 4, 9, 2].into_iter().map(|k| (k, k)).collect();
        let keys: Vec<i32> = t.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 2, 3, 4, 5, 8, 9]);
    }

    #[test]
    fn binary_tree_level_order_insert() {
        let mut t = BinaryTree::new();
        for i in 0..7 {
            t.add(i, i);
        }
        // level-order bag insert: root is the first key added
        assert_eq!(t.root().unwrap().key(), &0);
        assert_eq!(t.size(), 7);
    }

    #[test]
    fn clone_is_independent_and_equivalent() {
        let mut t: Bst<i32, i32> = (0..20).map(|i| (i, i)).collect();
        let clone = t.clone();
        t.add(100, 100);
        assert_eq!(clone.size(), 20);
        assert_eq!(t.size(), 21);
        assert_eq!(
            clone.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            (0..20).collect::<Vec<_>>()
        );
    }

    #[test]
    fn tree_set_and_multi_set_membership() {
        let mut set: TreeSet<i32> = [1, 2, 3].into_iter().collect();
        assert!(set.contains(&2));
        assert!(set.delete(&2));
        assert!(!set.contains(&2));

        let mut multi = TreeMultiSet::new();
        multi.add(7);
        multi.add(7);
        multi.add(7);
        assert_eq!(multi.count_of(&7), 3);
        multi.delete(&7);
        assert_eq!(multi.count_of(&7), 2);
        assert!(multi.has(&7));
    }
}
